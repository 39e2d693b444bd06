use anchor_lang::prelude::*;

/// Borsh size of an account's current state, discriminator included.
pub trait Footprint {
    fn space(&self) -> usize;
}

#[account]
pub struct Locker {
    /// Priviledged account.
    pub authority: Pubkey,
    /// Nonce to derive the program-derived address owning the vaults.
    pub nonce: u8,
    /// Mint of the token that can be locked.
    pub staking_mint: Pubkey,
    /// Vault to store locked tokens.
    pub staking_vault: Pubkey,
    /// Width of an epoch in seconds. Also the reward streaming period.
    pub epoch_duration: u64,
    /// Number of epochs a deposit stays locked.
    pub lock_epochs: u64,
    /// One-way shutdown flag.
    pub is_shutdown: bool,
    /// Kick incentive in basis points per overdue epoch.
    pub kick_reward_per_epoch: u64,
    /// Epochs past unlock before anyone may kick a lock.
    pub kick_reward_epoch_delay: u64,
    /// Sum of every user's live locked balance.
    pub locked_supply: u64,
    /// Supply snapshots before this epoch have been pruned.
    pub history_start: u64,
    /// Reward token that can be compounded into its own pool on claim.
    pub compound_mint: Option<Pubkey>,
    /// Token account of the pool receiving compounded rewards.
    pub compound_pool: Option<Pubkey>,
    /// Registered reward streams, in registration order.
    pub reward_tokens: Vec<RewardData>,
    /// Amount newly locked in each retained epoch, one entry per epoch, no gaps.
    pub epochs: Vec<EpochSupply>,
    /// Programs barred from locking, sorted.
    pub blacklist: Vec<Pubkey>,
    /// Programs allowed to lock on behalf of others, sorted.
    pub depositor_whitelist: Vec<Pubkey>,
}

impl Locker {
    const FIXED: usize = 8 + 32 + 1 + 32 + 32 + 8 + 8 + 1 + 8 + 8 + 8 + 8 + 1 + 1 + 4 * 4;
    /// Size of a freshly initialized locker: one supply snapshot, room for
    /// the compounding target, nothing else.
    pub const SIZE: usize = Locker::FIXED + 2 * 32 + EpochSupply::SIZE;
}

impl Footprint for Locker {
    fn space(&self) -> usize {
        let rewards: usize = self
            .reward_tokens
            .iter()
            .map(|r| 84 + 32 * r.distributors.len())
            .sum();
        Locker::FIXED
            + 32 * (self.compound_mint.iter().count() + self.compound_pool.iter().count())
            + rewards
            + EpochSupply::SIZE * self.epochs.len()
            + 32 * (self.blacklist.len() + self.depositor_whitelist.len())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LockedBalance {
    pub amount: u64,
    /// First epoch in which the lock can be withdrawn.
    pub unlock_epoch: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EpochSupply {
    pub epoch: u64,
    /// Amount locked during this epoch.
    pub supply: u64,
}

impl EpochSupply {
    pub const SIZE: usize = 16;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Checkpoint {
    /// Epoch from which `votes` apply.
    pub epoch: u64,
    pub votes: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScheduledUnlock {
    pub epoch: u64,
    pub amount: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardData {
    /// Mint of the reward token.
    pub mint: Pubkey,
    /// Tokens streamed per second.
    pub reward_rate: u64,
    /// Last calculated reward per locked token.
    pub reward_per_token_stored: u128,
    /// The last time the stream state was updated.
    pub last_update_time: u64,
    /// The timestamp at which the current stream ends.
    pub period_finish: u64,
    /// Received but not yet streamed.
    pub queued_rewards: u64,
    /// Accounts allowed to queue new rewards.
    pub distributors: Vec<Pubkey>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserReward {
    pub reward_per_token_paid: u128,
    /// Settled but unclaimed rewards.
    pub rewards: u64,
}

/// One per owner and locker, at `[owner, locker]`.
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UserLedger {
    /// Locker this ledger belongs to.
    pub locker: Pubkey,
    /// The owner of this ledger.
    pub owner: Pubkey,
    /// Signer nonce.
    pub nonce: u8,
    /// Live locked balance.
    pub locked: u64,
    /// Number of locks processed so far. Never decreases.
    pub next_unlock_index: u32,
    /// Unprocessed locks, strictly ordered by unlock epoch.
    pub locks: Vec<LockedBalance>,
    pub delegate: Option<Pubkey>,
    /// Indexed like `Locker::reward_tokens`; missing entries are zero.
    pub rewards: Vec<UserReward>,
}

impl UserLedger {
    const FIXED: usize = 8 + 32 + 32 + 1 + 8 + 4 + 4 + 1 + 4;
    /// Room for the delegate, no locks and no rewards.
    pub const SIZE: usize = UserLedger::FIXED + 32;

    pub fn new(locker: Pubkey, owner: Pubkey, nonce: u8) -> Self {
        UserLedger {
            locker,
            owner,
            nonce,
            ..UserLedger::default()
        }
    }
}

impl Footprint for UserLedger {
    fn space(&self) -> usize {
        UserLedger::FIXED
            + 16 * self.locks.len()
            + self.delegate.map_or(0, |_| 32)
            + 24 * self.rewards.len()
    }
}

/// One per delegate and locker, at `["delegate", delegate, locker]`.
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DelegateLedger {
    /// Locker this ledger belongs to.
    pub locker: Pubkey,
    pub delegate: Pubkey,
    /// Signer nonce.
    pub nonce: u8,
    /// Strictly increasing by epoch.
    pub checkpoints: Vec<Checkpoint>,
    /// Delegated amounts keyed by the epoch they stop counting, sorted.
    /// Only epochs after the last checkpoint are kept.
    pub unlocks: Vec<ScheduledUnlock>,
}

impl DelegateLedger {
    pub const SIZE: usize = 8 + 32 + 32 + 1 + 4 + 4;

    pub fn new(locker: Pubkey, delegate: Pubkey, nonce: u8) -> Self {
        DelegateLedger {
            locker,
            delegate,
            nonce,
            ..DelegateLedger::default()
        }
    }
}

impl Footprint for DelegateLedger {
    fn space(&self) -> usize {
        DelegateLedger::SIZE + 16 * (self.checkpoints.len() + self.unlocks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialized_len<T: AnchorSerialize>(account: &T) -> usize {
        8 + account.try_to_vec().unwrap().len()
    }

    #[test]
    fn space_matches_serialized_length() {
        let mut locker = Locker {
            authority: Pubkey::new_unique(),
            nonce: 1,
            staking_mint: Pubkey::new_unique(),
            staking_vault: Pubkey::new_unique(),
            epoch_duration: 604_800,
            lock_epochs: 17,
            is_shutdown: false,
            kick_reward_per_epoch: 100,
            kick_reward_epoch_delay: 3,
            locked_supply: 0,
            history_start: 0,
            compound_mint: None,
            compound_pool: None,
            reward_tokens: vec![],
            epochs: vec![EpochSupply::default()],
            blacklist: vec![],
            depositor_whitelist: vec![],
        };
        assert_eq!(locker.space(), serialized_len(&locker));
        assert!(locker.space() <= Locker::SIZE);

        locker.compound_mint = Some(Pubkey::new_unique());
        locker.reward_tokens.push(RewardData {
            distributors: vec![Pubkey::new_unique(); 2],
            ..RewardData::default()
        });
        locker.blacklist.push(Pubkey::new_unique());
        assert_eq!(locker.space(), serialized_len(&locker));

        let mut user = UserLedger::new(Pubkey::new_unique(), Pubkey::new_unique(), 254);
        assert_eq!(user.space(), serialized_len(&user));
        assert!(user.space() <= UserLedger::SIZE);
        user.locks = vec![LockedBalance::default(); 3];
        user.delegate = Some(Pubkey::new_unique());
        user.rewards = vec![UserReward::default()];
        assert_eq!(user.space(), serialized_len(&user));
        assert_eq!(user.space() - UserLedger::SIZE, 3 * 16 + 24);

        let mut delegate = DelegateLedger::new(Pubkey::new_unique(), Pubkey::new_unique(), 253);
        assert_eq!(delegate.space(), DelegateLedger::SIZE);
        assert_eq!(delegate.space(), serialized_len(&delegate));
        delegate.checkpoints = vec![Checkpoint::default(); 2];
        delegate.unlocks = vec![ScheduledUnlock::default()];
        assert_eq!(delegate.space(), serialized_len(&delegate));
    }
}
