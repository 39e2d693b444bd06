//! Reward streams: one Synthetix-style accumulator per registered token,
//! weighted by live locked balance.

use anchor_lang::prelude::*;
use std::convert::TryFrom;

use super::env::{Env, Host};
use super::events::{LockerEvent, RewardAdded, RewardPaid, RewardQueued};
use crate::account::{Locker, RewardData, UserLedger, UserReward};
use crate::constants::*;
use crate::error::ErrorCode;

/// Which reward tokens a claim pays out.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum RewardSelection {
    All,
    Only(Pubkey),
    /// One flag per registered token, `true` skips it.
    Skip(Vec<bool>),
}

impl RewardSelection {
    fn includes(&self, index: usize, mint: &Pubkey) -> bool {
        match self {
            RewardSelection::All => true,
            RewardSelection::Only(only) => only == mint,
            RewardSelection::Skip(skip) => !skip[index],
        }
    }
}

pub fn last_time_reward_applicable(period_finish: u64, now: u64) -> u64 {
    std::cmp::min(now, period_finish)
}

pub fn reward_per_token(data: &RewardData, locked_supply: u64, now: u64) -> Result<u128> {
    if locked_supply == 0 {
        return Ok(data.reward_per_token_stored);
    }

    let elapsed = last_time_reward_applicable(data.period_finish, now)
        .checked_sub(data.last_update_time)
        .ok_or(ErrorCode::MathOverflow)?;

    let accrued = (elapsed as u128)
        .checked_mul(data.reward_rate as u128)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_mul(PRECISION)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(locked_supply as u128)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(data
        .reward_per_token_stored
        .checked_add(accrued)
        .ok_or(ErrorCode::MathOverflow)?)
}

pub fn earned(balance: u64, reward_per_token: u128, user: &UserReward) -> Result<u64> {
    let delta = reward_per_token
        .checked_sub(user.reward_per_token_paid)
        .ok_or(ErrorCode::MathOverflow)?;

    let fresh = (balance as u128)
        .checked_mul(delta)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(PRECISION)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_add(user.rewards as u128)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(u64::try_from(fresh).map_err(|_| ErrorCode::MathOverflow)?)
}

impl Locker {
    pub fn reward_index(&self, mint: &Pubkey) -> Option<usize> {
        self.reward_tokens.iter().position(|r| r.mint == *mint)
    }

    /// Settles every stream up to `now` and, when given, `user`'s accrued
    /// rewards against its current (pre-mutation) locked balance.
    pub(crate) fn update_reward(&mut self, user: Option<&mut UserLedger>, now: u64) -> Result<()> {
        let locked_supply = self.locked_supply;
        let mut current = Vec::with_capacity(self.reward_tokens.len());
        for data in self.reward_tokens.iter_mut() {
            let rpt = reward_per_token(data, locked_supply, now)?;
            data.reward_per_token_stored = rpt;
            data.last_update_time = last_time_reward_applicable(data.period_finish, now);
            current.push(rpt);
        }

        if let Some(user) = user {
            let balance = user.locked;
            if user.rewards.len() < current.len() {
                user.rewards.resize(current.len(), UserReward::default());
            }
            for (slot, rpt) in user.rewards.iter_mut().zip(current) {
                slot.rewards = earned(balance, rpt, slot)?;
                slot.reward_per_token_paid = rpt;
            }
        }
        Ok(())
    }

    /// Tops up a stream. Only approved distributors may call.
    pub fn queue_new_rewards<H: Host>(
        &mut self,
        env: &Env,
        mint: Pubkey,
        amount: u64,
        host: &mut H,
    ) -> Result<()> {
        let index = self.reward_index(&mint).ok_or(ErrorCode::RewardNotFound)?;
        require!(
            self.reward_tokens[index].distributors.contains(&env.sender),
            ErrorCode::UnauthorizedDistributor
        );
        require!(amount > 0, ErrorCode::ZeroAmount);

        self.catch_up_to(env.now);
        host.transfer_in(&mint, &env.sender, amount)?;

        let data = &self.reward_tokens[index];
        let pending = amount
            .checked_add(data.queued_rewards)
            .ok_or(ErrorCode::MathOverflow)?;

        if env.now >= data.period_finish {
            self.notify_reward(index, pending, env.now, host)?;
            self.reward_tokens[index].queued_rewards = 0;
            return Ok(());
        }

        // only the new amount is weighed against the running stream
        let undistributed = ((data.period_finish - env.now) as u128)
            .checked_mul(data.reward_rate as u128)
            .ok_or(ErrorCode::MathOverflow)?;
        let folds = (amount as u128)
            .checked_mul(RATIO_DENOMINATOR)
            .ok_or(ErrorCode::MathOverflow)?
            > undistributed
                .checked_mul(NEW_REWARD_RATIO)
                .ok_or(ErrorCode::MathOverflow)?;

        if folds {
            self.notify_reward(index, pending, env.now, host)?;
            self.reward_tokens[index].queued_rewards = 0;
        } else {
            self.reward_tokens[index].queued_rewards = pending;
            host.emit(LockerEvent::RewardQueued(RewardQueued {
                token: mint,
                amount,
                queued_rewards: pending,
            }));
        }
        Ok(())
    }

    /// Restarts stream `index` for one full duration with `reward` plus
    /// whatever the running stream had left.
    fn notify_reward<H: Host>(&mut self, index: usize, reward: u64, now: u64, host: &mut H) -> Result<()> {
        self.update_reward(None, now)?;

        let duration = self.epoch_duration;
        let data = &mut self.reward_tokens[index];
        let total = if now >= data.period_finish {
            reward as u128
        } else {
            let leftover = ((data.period_finish - now) as u128)
                .checked_mul(data.reward_rate as u128)
                .ok_or(ErrorCode::MathOverflow)?;
            leftover
                .checked_add(reward as u128)
                .ok_or(ErrorCode::MathOverflow)?
        };

        data.reward_rate = u64::try_from(total / duration as u128).map_err(|_| ErrorCode::MathOverflow)?;
        data.last_update_time = now;
        data.period_finish = now.checked_add(duration).ok_or(ErrorCode::MathOverflow)?;

        host.emit(LockerEvent::RewardAdded(RewardAdded {
            token: data.mint,
            reward,
            reward_rate: data.reward_rate,
        }));
        Ok(())
    }

    /// Pays `user` its accrued rewards. Anyone may trigger the payout;
    /// compounding is honoured only when the owner itself calls.
    pub fn get_reward<H: Host>(
        &mut self,
        env: &Env,
        user: &mut UserLedger,
        selection: RewardSelection,
        compound: bool,
        host: &mut H,
    ) -> Result<()> {
        match &selection {
            RewardSelection::Skip(skip) => require!(
                skip.len() == self.reward_tokens.len(),
                ErrorCode::SkipListMismatch
            ),
            RewardSelection::Only(mint) => {
                self.reward_index(mint).ok_or(ErrorCode::RewardNotFound)?;
            }
            RewardSelection::All => {}
        }

        self.catch_up_to(env.now);
        self.update_reward(Some(&mut *user), env.now)?;

        let account = user.owner;
        let compound_into = match (self.compound_mint, self.compound_pool) {
            (Some(mint), Some(pool)) if compound && env.sender == account => Some((mint, pool)),
            _ => None,
        };

        for (index, data) in self.reward_tokens.iter().enumerate() {
            let mint = data.mint;
            if !selection.includes(index, &mint) {
                continue;
            }
            let reward = std::mem::take(&mut user.rewards[index].rewards);
            if reward == 0 {
                continue;
            }

            let compounded = match compound_into {
                Some((target, pool)) if target == mint => {
                    host.stake_for(&mint, &pool, &account, reward)?;
                    true
                }
                _ => {
                    host.transfer_out(&mint, &account, reward)?;
                    false
                }
            };
            host.emit(LockerEvent::RewardPaid(RewardPaid {
                user: account,
                token: mint,
                reward,
                compounded,
            }));
        }
        Ok(())
    }
}
