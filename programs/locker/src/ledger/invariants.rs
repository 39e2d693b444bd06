//! Executable form of the ledger's global invariants.

use super::series;
use crate::account::{DelegateLedger, Locker, UserLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantViolation(pub &'static str);

/// Checks every invariant over a locker and all of its ledgers. Returns the
/// first one violated.
pub fn check_invariants<'a, U, D>(locker: &Locker, users: U, delegates: D) -> Result<(), InvariantViolation>
where
    U: IntoIterator<Item = &'a UserLedger>,
    D: IntoIterator<Item = &'a DelegateLedger>,
{
    // SupplySnapshotsContiguous
    if !locker.epochs.windows(2).all(|w| w[1].epoch == w[0].epoch + 1) {
        return Err(InvariantViolation("SupplySnapshotsContiguous"));
    }
    // HistoryStartsAtFirstSnapshot
    if locker.epochs.first().map_or(false, |e| e.epoch < locker.history_start) {
        return Err(InvariantViolation("HistoryStartsAtFirstSnapshot"));
    }

    let mut total: u128 = 0;
    for user in users {
        total += user.locked as u128;
        // LiveLocksCoverBalance
        let live: u128 = user.locks.iter().map(|l| l.amount as u128).sum();
        if live != user.locked as u128 {
            return Err(InvariantViolation("LiveLocksCoverBalance"));
        }
        // LocksStrictlyOrderedByUnlock
        if !user.locks.windows(2).all(|w| w[0].unlock_epoch < w[1].unlock_epoch) {
            return Err(InvariantViolation("LocksStrictlyOrderedByUnlock"));
        }
    }
    // LockedSupplyIsSumOfBalances
    if total != locker.locked_supply as u128 {
        return Err(InvariantViolation("LockedSupplyIsSumOfBalances"));
    }

    for ledger in delegates {
        // CheckpointsStrictlyIncreasing
        if !series::is_strictly_increasing(&ledger.checkpoints) {
            return Err(InvariantViolation("CheckpointsStrictlyIncreasing"));
        }
        if !series::is_strictly_increasing(&ledger.unlocks) {
            return Err(InvariantViolation("UnlocksStrictlyIncreasing"));
        }
        // ScheduledUnlocksMatchVotes: everything scheduled is still counted
        // by the last checkpoint, and nothing else is.
        let scheduled: u128 = ledger.unlocks.iter().map(|u| u.amount as u128).sum();
        let (last_epoch, votes) = ledger
            .checkpoints
            .last()
            .map_or((None, 0), |c| (Some(c.epoch), c.votes as u128));
        if scheduled != votes {
            return Err(InvariantViolation("ScheduledUnlocksMatchVotes"));
        }
        if let (Some(last), Some(first)) = (last_epoch, ledger.unlocks.first()) {
            if first.epoch <= last {
                return Err(InvariantViolation("UnlocksAfterLastCheckpoint"));
            }
        }
    }

    Ok(())
}
