//! The locker's state machine. Nothing in here touches sysvars or CPIs:
//! time arrives through [`Env`], tokens move through [`Host`] and delegate
//! ledgers are fetched through [`Delegates`].

pub mod admin;
pub mod delegation;
pub mod env;
pub mod epoch;
pub mod events;
pub mod guard;
pub mod invariants;
pub mod locks;
pub mod query;
pub mod rewards;
pub mod series;

#[cfg(test)]
mod testing;

pub use env::{Delegates, Env, Host};
pub use events::LockerEvent;
pub use query::{EarnedData, LockedBalances};
pub use rewards::RewardSelection;

use anchor_lang::prelude::*;

use crate::account::{EpochSupply, Locker, UserLedger};
use crate::constants::*;
use crate::error::ErrorCode;

/// Deployment-time constants.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockerParams {
    pub epoch_duration: u64,
    pub lock_epochs: u64,
}

impl Default for LockerParams {
    fn default() -> Self {
        LockerParams {
            epoch_duration: EPOCH_DURATION,
            lock_epochs: LOCK_EPOCHS,
        }
    }
}

impl Locker {
    pub fn new(
        authority: Pubkey,
        nonce: u8,
        staking_mint: Pubkey,
        staking_vault: Pubkey,
        params: LockerParams,
        now: u64,
    ) -> Result<Locker> {
        require!(
            params.epoch_duration >= MIN_EPOCH_DURATION,
            ErrorCode::InvalidEpochDuration
        );
        // a one-epoch lock would unlock in the very epoch its votes start
        require!(
            params.lock_epochs >= 2 && params.lock_epochs <= MAX_LOCK_EPOCHS,
            ErrorCode::InvalidLockDuration
        );

        Ok(Locker {
            authority,
            nonce,
            staking_mint,
            staking_vault,
            epoch_duration: params.epoch_duration,
            lock_epochs: params.lock_epochs,
            is_shutdown: false,
            kick_reward_per_epoch: DEFAULT_KICK_REWARD_PER_EPOCH,
            kick_reward_epoch_delay: DEFAULT_KICK_REWARD_EPOCH_DELAY,
            locked_supply: 0,
            history_start: 0,
            compound_mint: None,
            compound_pool: None,
            reward_tokens: vec![],
            epochs: vec![EpochSupply {
                epoch: epoch::epoch_id(now, params.epoch_duration),
                supply: 0,
            }],
            blacklist: vec![],
            depositor_whitelist: vec![],
        })
    }

    /// Permissionless catch-up of the supply snapshots.
    pub fn checkpoint_epoch(&mut self, now: u64) {
        self.catch_up_to(now);
    }

    /// Forward-fills the supply snapshots through the epoch containing `now`,
    /// drops snapshots older than the retention window and returns the
    /// current epoch's snapshot. Idempotent within an epoch.
    pub(crate) fn catch_up_to(&mut self, now: u64) -> &mut EpochSupply {
        let current = self.epoch_at(now);
        if self.epochs.is_empty() {
            self.epochs.push(EpochSupply {
                epoch: current,
                supply: 0,
            });
        }
        series::catch_up_to(&mut self.epochs, current, |epoch| EpochSupply {
            epoch,
            supply: 0,
        });

        let keep_from = current.saturating_sub(self.lock_epochs + SUPPLY_HISTORY_EPOCHS);
        let stale = self.epochs.partition_point(|e| e.epoch < keep_from);
        if stale > 0 {
            self.epochs.drain(..stale);
            self.history_start = keep_from;
        }

        let last = self.epochs.len() - 1;
        &mut self.epochs[last]
    }

    pub(crate) fn only_authority(&self, env: &Env) -> Result<()> {
        require!(env.sender == self.authority, ErrorCode::Unauthorized);
        Ok(())
    }

    /// Closes an empty ledger. Rewards are settled first; anything still
    /// owed must be claimed before the ledger can go.
    pub fn close_user_ledger(&mut self, env: &Env, user: &mut UserLedger) -> Result<()> {
        require!(user.owner == env.sender, ErrorCode::Unauthorized);
        self.update_reward(Some(&mut *user), env.now)?;
        require!(
            user.locked == 0 && user.locks.is_empty() && user.rewards.iter().all(|r| r.rewards == 0),
            ErrorCode::LedgerNotEmpty
        );
        Ok(())
    }
}

/// Inserts or removes `key` in a sorted set. Returns whether the set changed.
pub(crate) fn set_membership(set: &mut Vec<Pubkey>, key: Pubkey, member: bool) -> bool {
    match (set.binary_search(&key), member) {
        (Err(i), true) => {
            set.insert(i, key);
            true
        }
        (Ok(i), false) => {
            set.remove(i);
            true
        }
        _ => false,
    }
}
