/// Width of one epoch in seconds (one week).
pub const EPOCH_DURATION: u64 = 7 * 86400;
/// Number of epochs a deposit stays locked.
pub const LOCK_EPOCHS: u64 = 17;
pub const MAX_LOCK_EPOCHS: u64 = 520;
/// Supply snapshots kept beyond the lock window for historical lookups.
pub const SUPPLY_HISTORY_EPOCHS: u64 = 104;

#[cfg(feature = "local-testing")]
pub const MIN_EPOCH_DURATION: u64 = 1;
#[cfg(not(feature = "local-testing"))]
pub const MIN_EPOCH_DURATION: u64 = 86400;

/// Scale of the reward-per-token accumulators.
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

pub const MAX_REWARD_TOKENS: usize = 5;

/// Basis-point denominator for the kick incentive.
pub const DENOMINATOR: u64 = 10_000;
pub const DEFAULT_KICK_REWARD_PER_EPOCH: u64 = 100;
pub const MAX_KICK_REWARD_PER_EPOCH: u64 = 500;
pub const DEFAULT_KICK_REWARD_EPOCH_DELAY: u64 = 3;
pub const MIN_KICK_REWARD_EPOCH_DELAY: u64 = 2;

/// A queued top-up is folded into the running stream only when it exceeds
/// NEW_REWARD_RATIO / RATIO_DENOMINATOR of what is still undistributed.
pub const NEW_REWARD_RATIO: u128 = 830;
pub const RATIO_DENOMINATOR: u128 = 1000;

/// Seed prefix of delegate ledger addresses; user ledgers are seeded by
/// owner and locker alone.
pub const DELEGATE_SEED: &[u8] = b"delegate";
