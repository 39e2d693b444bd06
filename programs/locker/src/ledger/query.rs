//! Read-only views. Clients evaluate these against deserialized `Locker`,
//! `UserLedger` and `DelegateLedger` accounts.

use anchor_lang::prelude::*;

use super::rewards::{earned, last_time_reward_applicable, reward_per_token};
use super::series;
use crate::account::{DelegateLedger, LockedBalance, Locker, UserLedger};
use crate::error::ErrorCode;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LockedBalances {
    /// Live locked balance, expired or not.
    pub total: u64,
    /// Expired and ready to process.
    pub unlockable: u64,
    /// Still locked.
    pub locked: u64,
    pub lock_data: Vec<LockedBalance>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EarnedData {
    pub token: Pubkey,
    pub amount: u64,
}

impl Locker {
    /// Locks of `user` counting during `epoch`: made before it, unlocking after it.
    /// Processed locks no longer count.
    pub fn balance_at_epoch_of(&self, user: &UserLedger, epoch: u64, now: u64) -> Result<u64> {
        self.require_started(epoch, now)?;
        let mut amount: u64 = 0;
        for lock in user.locks.iter().rev() {
            if lock.unlock_epoch <= epoch {
                break;
            }
            if lock.unlock_epoch.saturating_sub(self.lock_epochs) < epoch {
                amount = amount.checked_add(lock.amount).ok_or(ErrorCode::MathOverflow)?;
            }
        }
        Ok(amount)
    }

    pub fn locked_balances(&self, user: &UserLedger, now: u64) -> LockedBalances {
        let current = self.epoch_at(now);
        let mut balances = LockedBalances {
            total: user.locked,
            ..LockedBalances::default()
        };
        for lock in &user.locks {
            if lock.unlock_epoch > current {
                balances.locked += lock.amount;
                balances.lock_data.push(*lock);
            } else {
                balances.unlockable += lock.amount;
            }
        }
        balances
    }

    /// Supply counting during the current epoch.
    pub fn total_supply(&self, now: u64) -> Result<u64> {
        self.total_supply_at_epoch(self.epoch_at(now), now)
    }

    /// Sum of everything locked in the `lock_epochs` epochs before `epoch`.
    pub fn total_supply_at_epoch(&self, epoch: u64, now: u64) -> Result<u64> {
        self.require_started(epoch, now)?;
        let after = epoch.saturating_sub(self.lock_epochs);
        require!(after + 1 >= self.history_start, ErrorCode::EpochPruned);
        let through = match epoch.checked_sub(1) {
            Some(e) => e,
            None => return Ok(0),
        };
        series::range(&self.epochs, after, through)
            .iter()
            .try_fold(0u64, |sum, e| sum.checked_add(e.supply))
            .ok_or_else(|| ErrorCode::MathOverflow.into())
    }

    pub fn get_past_total_supply(&self, timestamp: u64, now: u64) -> Result<u64> {
        require!(timestamp < now, ErrorCode::FutureLookup);
        self.total_supply_at_epoch(self.epoch_at(timestamp), now)
    }

    pub fn epoch_count(&self) -> usize {
        self.epochs.len()
    }

    pub fn get_votes(&self, ledger: &DelegateLedger, now: u64) -> Result<u64> {
        self.get_past_votes(ledger, now, now)
    }

    /// Votes delegated to the ledger's delegate during the epoch containing
    /// `timestamp`.
    pub fn get_past_votes(&self, ledger: &DelegateLedger, timestamp: u64, now: u64) -> Result<u64> {
        require!(timestamp <= now, ErrorCode::FutureLookup);
        let epoch = self.epoch_at(timestamp);
        let ckpt = match series::latest_at(&ledger.checkpoints, epoch) {
            Some(c) => c,
            None => return Ok(0),
        };
        if ckpt.votes == 0 || ckpt.epoch == epoch {
            return Ok(ckpt.votes);
        }

        // only unlocks after the last checkpoint are still scheduled
        let unlocked = series::range(&ledger.unlocks, ckpt.epoch, epoch)
            .iter()
            .try_fold(0u64, |sum, u| sum.checked_add(u.amount))
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(ckpt.votes.checked_sub(unlocked).ok_or(ErrorCode::MathOverflow)?)
    }

    pub fn reward_per_token_of(&self, mint: &Pubkey, now: u64) -> Result<u128> {
        let index = self.reward_index(mint).ok_or(ErrorCode::RewardNotFound)?;
        reward_per_token(&self.reward_tokens[index], self.locked_supply, now)
    }

    pub fn last_time_reward_applicable_of(&self, mint: &Pubkey, now: u64) -> Result<u64> {
        let index = self.reward_index(mint).ok_or(ErrorCode::RewardNotFound)?;
        Ok(last_time_reward_applicable(self.reward_tokens[index].period_finish, now))
    }

    /// Amount a full period streams at the current rate.
    pub fn get_reward_for_duration(&self, mint: &Pubkey) -> Result<u64> {
        let index = self.reward_index(mint).ok_or(ErrorCode::RewardNotFound)?;
        Ok(self.reward_tokens[index]
            .reward_rate
            .checked_mul(self.epoch_duration)
            .ok_or(ErrorCode::MathOverflow)?)
    }

    pub fn claimable_rewards(&self, user: &UserLedger, now: u64) -> Result<Vec<EarnedData>> {
        self.reward_tokens
            .iter()
            .enumerate()
            .map(|(index, data)| -> Result<EarnedData> {
                let paid = user.rewards.get(index).copied().unwrap_or_default();
                let rpt = reward_per_token(data, self.locked_supply, now)?;
                Ok(EarnedData {
                    token: data.mint,
                    amount: earned(user.locked, rpt, &paid)?,
                })
            })
            .collect()
    }

    pub(crate) fn require_started(&self, epoch: u64, now: u64) -> Result<()> {
        require!(self.epoch_start_of(epoch) <= now, ErrorCode::EpochInFuture);
        Ok(())
    }
}
