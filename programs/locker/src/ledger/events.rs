use anchor_lang::prelude::*;

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staked {
    pub user: Pubkey,
    pub amount: u64,
    pub unlock_epoch: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawn {
    pub user: Pubkey,
    pub amount: u64,
    pub relocked: bool,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KickReward {
    pub kicker: Pubkey,
    pub user: Pubkey,
    pub reward: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardAdded {
    pub token: Pubkey,
    pub reward: u64,
    pub reward_rate: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardQueued {
    pub token: Pubkey,
    pub amount: u64,
    pub queued_rewards: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardPaid {
    pub user: Pubkey,
    pub token: Pubkey,
    pub reward: u64,
    pub compounded: bool,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateChanged {
    pub delegator: Pubkey,
    pub from_delegate: Option<Pubkey>,
    pub to_delegate: Pubkey,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateCheckpointed {
    pub delegate: Pubkey,
    pub epoch: u64,
    pub votes: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardTokenAdded {
    pub token: Pubkey,
    pub distributor: Pubkey,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributorApproved {
    pub token: Pubkey,
    pub distributor: Pubkey,
    pub approved: bool,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KickIncentiveSet {
    pub rate: u64,
    pub delay: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistModified {
    pub account: Pubkey,
    pub blacklisted: bool,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositorWhitelisted {
    pub account: Pubkey,
    pub whitelisted: bool,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundTargetSet {
    pub mint: Option<Pubkey>,
    pub pool: Option<Pubkey>,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered {
    pub token: Pubkey,
    pub amount: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shutdown {
    pub timestamp: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipTransferred {
    pub previous: Pubkey,
    pub authority: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockerEvent {
    Staked(Staked),
    Withdrawn(Withdrawn),
    KickReward(KickReward),
    RewardAdded(RewardAdded),
    RewardQueued(RewardQueued),
    RewardPaid(RewardPaid),
    DelegateChanged(DelegateChanged),
    DelegateCheckpointed(DelegateCheckpointed),
    RewardTokenAdded(RewardTokenAdded),
    DistributorApproved(DistributorApproved),
    KickIncentiveSet(KickIncentiveSet),
    BlacklistModified(BlacklistModified),
    DepositorWhitelisted(DepositorWhitelisted),
    CompoundTargetSet(CompoundTargetSet),
    Recovered(Recovered),
    Shutdown(Shutdown),
    OwnershipTransferred(OwnershipTransferred),
}

impl LockerEvent {
    /// Writes the event to the program log.
    pub fn emit(self) {
        match self {
            LockerEvent::Staked(e) => emit!(e),
            LockerEvent::Withdrawn(e) => emit!(e),
            LockerEvent::KickReward(e) => emit!(e),
            LockerEvent::RewardAdded(e) => emit!(e),
            LockerEvent::RewardQueued(e) => emit!(e),
            LockerEvent::RewardPaid(e) => emit!(e),
            LockerEvent::DelegateChanged(e) => emit!(e),
            LockerEvent::DelegateCheckpointed(e) => emit!(e),
            LockerEvent::RewardTokenAdded(e) => emit!(e),
            LockerEvent::DistributorApproved(e) => emit!(e),
            LockerEvent::KickIncentiveSet(e) => emit!(e),
            LockerEvent::BlacklistModified(e) => emit!(e),
            LockerEvent::DepositorWhitelisted(e) => emit!(e),
            LockerEvent::CompoundTargetSet(e) => emit!(e),
            LockerEvent::Recovered(e) => emit!(e),
            LockerEvent::Shutdown(e) => emit!(e),
            LockerEvent::OwnershipTransferred(e) => emit!(e),
        }
    }
}
