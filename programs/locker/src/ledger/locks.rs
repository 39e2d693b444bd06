//! Lock creation, expiry processing, kicks and the shutdown exit.

use anchor_lang::prelude::*;
use std::convert::TryFrom;

use super::env::{Delegates, Env, Host};
use super::events::{KickReward, LockerEvent, Staked, Withdrawn};
use crate::account::{LockedBalance, Locker, UserLedger};
use crate::constants::DENOMINATOR;
use crate::error::ErrorCode;

/// Outcome of scanning a user's locks from the front.
struct Release {
    amount: u64,
    kick_reward: u64,
    locks: Vec<LockedBalance>,
}

impl Locker {
    /// Pulls `amount` from the caller and locks it for the ledger's owner.
    pub fn lock<D: Delegates, H: Host>(
        &mut self,
        env: &Env,
        user: &mut UserLedger,
        amount: u64,
        delegates: &mut D,
        host: &mut H,
    ) -> Result<()> {
        require!(amount > 0, ErrorCode::ZeroAmount);
        require!(!self.is_shutdown, ErrorCode::IsShutdown);
        self.check_depositor(env, &user.owner)?;

        self.catch_up_to(env.now);
        let staking_mint = self.staking_mint;
        host.transfer_in(&staking_mint, &env.sender, amount)?;

        self.update_reward(Some(&mut *user), env.now)?;
        self.lock_for(user, amount, env.now, delegates, host)
    }

    /// Books a new lock. Rewards for `user` must already be settled.
    fn lock_for<D: Delegates, H: Host>(
        &mut self,
        user: &mut UserLedger,
        amount: u64,
        now: u64,
        delegates: &mut D,
        host: &mut H,
    ) -> Result<()> {
        require!(amount > 0, ErrorCode::ZeroAmount);
        require!(!self.is_shutdown, ErrorCode::IsShutdown);

        let unlock_epoch = self.unlock_epoch_for(now);
        let locked_supply = self
            .locked_supply
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        let snapshot = self.catch_up_to(now);
        snapshot.supply = snapshot
            .supply
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;

        user.locked = user.locked.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
        match user.locks.last_mut() {
            // locks made in the same epoch share one entry
            Some(last) if last.unlock_epoch == unlock_epoch => {
                last.amount = last.amount.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
            }
            _ => user.locks.push(LockedBalance { amount, unlock_epoch }),
        }
        self.locked_supply = locked_supply;

        if let Some(delegate) = user.delegate {
            let ledger = delegates.ledger(&delegate)?;
            ledger.schedule_unlock(unlock_epoch, amount)?;
            self.checkpoint_delegate(ledger, amount, 0, now, host)?;
        }

        host.emit(LockerEvent::Staked(Staked {
            user: user.owner,
            amount,
            unlock_epoch,
        }));
        Ok(())
    }

    /// Withdraws, or relocks, the caller's expired locks.
    pub fn process_expired_locks<D: Delegates, H: Host>(
        &mut self,
        env: &Env,
        user: &mut UserLedger,
        relock: bool,
        delegates: &mut D,
        host: &mut H,
    ) -> Result<()> {
        require!(user.owner == env.sender, ErrorCode::Unauthorized);
        self.process_expired(user, relock, env.sender, false, env.now, delegates, host)
    }

    /// Withdraws another account's overdue locks, paying the caller an incentive.
    pub fn kick_expired_locks<D: Delegates, H: Host>(
        &mut self,
        env: &Env,
        user: &mut UserLedger,
        delegates: &mut D,
        host: &mut H,
    ) -> Result<()> {
        self.process_expired(user, false, env.sender, true, env.now, delegates, host)
    }

    #[allow(clippy::too_many_arguments)]
    fn process_expired<D: Delegates, H: Host>(
        &mut self,
        user: &mut UserLedger,
        relock: bool,
        reward_to: Pubkey,
        kick: bool,
        now: u64,
        delegates: &mut D,
        host: &mut H,
    ) -> Result<()> {
        require!(!user.locks.is_empty(), ErrorCode::NoLocks);

        self.catch_up_to(now);
        self.update_reward(Some(&mut *user), now)?;

        let release = self.scan_expired(user, kick, now)?;
        require!(release.amount > 0, ErrorCode::NoExpiredLocks);

        self.locked_supply = self
            .locked_supply
            .checked_sub(release.amount)
            .ok_or(ErrorCode::MathOverflow)?;
        user.locked = user
            .locked
            .checked_sub(release.amount)
            .ok_or(ErrorCode::MathOverflow)?;

        if let Some(delegate) = user.delegate {
            let ledger = delegates.ledger(&delegate)?;
            self.release_delegated(ledger, &release.locks, now, host)?;
        }

        let account = user.owner;
        host.emit(LockerEvent::Withdrawn(Withdrawn {
            user: account,
            amount: release.amount,
            relocked: relock,
        }));

        let staking_mint = self.staking_mint;
        if release.kick_reward > 0 {
            host.transfer_out(&staking_mint, &reward_to, release.kick_reward)?;
            host.emit(LockerEvent::KickReward(KickReward {
                kicker: reward_to,
                user: account,
                reward: release.kick_reward,
            }));
        }

        let remainder = release.amount - release.kick_reward;
        if relock {
            self.lock_for(user, remainder, now, delegates, host)
        } else if remainder > 0 {
            host.transfer_out(&staking_mint, &account, remainder)
        } else {
            Ok(())
        }
    }

    /// Removes every lock that can be released now from the front of
    /// `user`'s locks and advances the cursor past them. After shutdown every
    /// remaining lock qualifies.
    fn scan_expired(&self, user: &mut UserLedger, kick: bool, now: u64) -> Result<Release> {
        let current = self.epoch_at(now);
        let cutoff = if kick {
            current.checked_sub(self.kick_reward_epoch_delay)
        } else {
            Some(current)
        };

        let mut release = Release {
            amount: 0,
            kick_reward: 0,
            locks: vec![],
        };
        for lock in &user.locks {
            let expired = cutoff.map_or(false, |c| lock.unlock_epoch <= c);
            if !expired && !self.is_shutdown {
                break;
            }
            release.amount = release
                .amount
                .checked_add(lock.amount)
                .ok_or(ErrorCode::MathOverflow)?;
            if let Some(cutoff) = cutoff.filter(|c| kick && lock.unlock_epoch <= *c) {
                let overdue = cutoff - lock.unlock_epoch + 1;
                let rate = std::cmp::min(self.kick_reward_per_epoch.saturating_mul(overdue), DENOMINATOR);
                let reward = (lock.amount as u128) * (rate as u128) / (DENOMINATOR as u128);
                release.kick_reward = release
                    .kick_reward
                    .checked_add(reward as u64)
                    .ok_or(ErrorCode::MathOverflow)?;
            }
            release.locks.push(*lock);
        }

        user.locks.drain(..release.locks.len());
        user.advance_cursor(release.locks.len())?;
        Ok(release)
    }

    /// Withdraws every remaining lock, expired or not, once shut down.
    pub fn emergency_withdraw<D: Delegates, H: Host>(
        &mut self,
        env: &Env,
        user: &mut UserLedger,
        delegates: &mut D,
        host: &mut H,
    ) -> Result<()> {
        require!(user.owner == env.sender, ErrorCode::Unauthorized);
        require!(self.is_shutdown, ErrorCode::NotShutdown);
        let locked = user.locked;
        require!(locked > 0, ErrorCode::NothingLocked);

        self.catch_up_to(env.now);
        self.update_reward(Some(&mut *user), env.now)?;

        self.locked_supply = self
            .locked_supply
            .checked_sub(locked)
            .ok_or(ErrorCode::MathOverflow)?;
        let remaining = std::mem::take(&mut user.locks);
        user.locked = 0;
        user.advance_cursor(remaining.len())?;

        if let Some(delegate) = user.delegate {
            let ledger = delegates.ledger(&delegate)?;
            self.release_delegated(ledger, &remaining, env.now, host)?;
        }

        host.emit(LockerEvent::Withdrawn(Withdrawn {
            user: env.sender,
            amount: locked,
            relocked: false,
        }));
        let staking_mint = self.staking_mint;
        host.transfer_out(&staking_mint, &env.sender, locked)
    }
}

impl UserLedger {
    fn advance_cursor(&mut self, processed: usize) -> Result<()> {
        let processed = u32::try_from(processed).map_err(|_| ErrorCode::MathOverflow)?;
        self.next_unlock_index = self
            .next_unlock_index
            .checked_add(processed)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }
}
