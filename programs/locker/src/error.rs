use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Caller is not the locker authority")]
    Unauthorized,
    #[msg("New authority cannot be the default address")]
    InvalidAuthority,
    #[msg("Caller is not an approved distributor for this reward")]
    UnauthorizedDistributor,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Must delegate to someone")]
    ZeroDelegatee,
    #[msg("Must choose a new delegatee")]
    SameDelegatee,
    #[msg("Nothing to delegate")]
    NothingToDelegate,
    #[msg("Account is blacklisted")]
    Blacklisted,
    #[msg("Contract callers may only lock for others once whitelisted")]
    DepositorNotWhitelisted,
    #[msg("Only program accounts can be blacklisted")]
    MustBeContract,
    #[msg("Locker is shut down")]
    IsShutdown,
    #[msg("Locker must be shut down")]
    NotShutdown,
    #[msg("Locker is already shut down")]
    AlreadyShutdown,
    #[msg("Nothing locked")]
    NothingLocked,
    #[msg("No locks")]
    NoLocks,
    #[msg("No expired locks")]
    NoExpiredLocks,
    #[msg("Skip list length must match the reward token count")]
    SkipListMismatch,
    #[msg("Max reward tokens reached")]
    MaxRewardTokens,
    #[msg("Reward already exists")]
    RewardExists,
    #[msg("Reward does not exist")]
    RewardNotFound,
    #[msg("Cannot add the staking token as a reward")]
    CannotAddStakingToken,
    #[msg("Cannot recover the staking token")]
    CannotRecoverStakingToken,
    #[msg("Cannot recover a reward token")]
    CannotRecoverRewardToken,
    #[msg("Kick reward rate over max")]
    KickRateTooHigh,
    #[msg("Kick reward delay under min")]
    KickDelayTooShort,
    #[msg("Timestamp not yet recorded")]
    FutureLookup,
    #[msg("Epoch is in the future")]
    EpochInFuture,
    #[msg("Supply history for this epoch has been pruned")]
    EpochPruned,
    #[msg("Epoch duration too short")]
    InvalidEpochDuration,
    #[msg("Lock duration must span at least two epochs")]
    InvalidLockDuration,
    #[msg("Ledger still holds locks or rewards")]
    LedgerNotEmpty,
    #[msg("Ledger belongs to another locker")]
    LedgerMismatch,
    #[msg("No ledger supplied for this delegate")]
    DelegateLedgerNotFound,
    #[msg("No token account supplied for this mint and owner")]
    TokenAccountNotFound,
    #[msg("Math overflow")]
    MathOverflow,
}
