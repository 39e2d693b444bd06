//! Vote delegation and per-delegate checkpoints.
//!
//! A delegate's checkpoint for epoch `E` holds the votes effective during `E`:
//! everything delegated to it whose unlock epoch is after `E`. Writes always
//! target the upcoming epoch, so a balance change never affects the epoch in
//! which it happens. Amounts are also scheduled under their unlock epoch so
//! that votes can be rolled forward without touching individual locks. Rolling
//! forward turns every passed unlock into a checkpoint of its own and drops it
//! from the schedule.

use anchor_lang::prelude::*;

use super::env::{Delegates, Env, Host};
use super::events::{DelegateChanged, DelegateCheckpointed, LockerEvent};
use super::series;
use crate::account::{Checkpoint, DelegateLedger, LockedBalance, Locker, ScheduledUnlock, UserLedger};
use crate::error::ErrorCode;

impl Locker {
    /// Moves the caller's future voting weight to `to`.
    pub fn delegate<D: Delegates, H: Host>(
        &mut self,
        env: &Env,
        user: &mut UserLedger,
        to: Pubkey,
        delegates: &mut D,
        host: &mut H,
    ) -> Result<()> {
        require!(user.owner == env.sender, ErrorCode::Unauthorized);
        require!(to != Pubkey::default(), ErrorCode::ZeroDelegatee);
        let previous = user.delegate;
        require!(previous != Some(to), ErrorCode::SameDelegatee);
        require!(user.locked > 0 || previous.is_some(), ErrorCode::NothingToDelegate);

        self.catch_up_to(env.now);
        let upcoming = self.epoch_at(env.now) + 1;

        user.delegate = Some(to);
        let moving: Vec<LockedBalance> = user
            .locks
            .iter()
            .filter(|lock| lock.unlock_epoch > upcoming)
            .copied()
            .collect();

        host.emit(LockerEvent::DelegateChanged(DelegateChanged {
            delegator: env.sender,
            from_delegate: previous,
            to_delegate: to,
        }));

        let mut weight: u64 = 0;
        for lock in &moving {
            weight = weight.checked_add(lock.amount).ok_or(ErrorCode::MathOverflow)?;
        }

        if let Some(previous) = previous {
            let ledger = delegates.ledger(&previous)?;
            for lock in &moving {
                ledger.unschedule_unlock(lock.unlock_epoch, lock.amount)?;
            }
            self.checkpoint_delegate(ledger, 0, weight, env.now, host)?;
        }

        let ledger = delegates.ledger(&to)?;
        for lock in &moving {
            ledger.schedule_unlock(lock.unlock_epoch, lock.amount)?;
        }
        self.checkpoint_delegate(ledger, weight, 0, env.now, host)
    }

    /// Rolls the delegate's votes forward to the upcoming epoch, recording a
    /// checkpoint at every unlock passed on the way, then applies the
    /// adjustment. Repeated calls within one epoch overwrite a single entry.
    pub(crate) fn checkpoint_delegate<H: Host>(
        &self,
        ledger: &mut DelegateLedger,
        addition: u64,
        deduction: u64,
        now: u64,
        host: &mut H,
    ) -> Result<()> {
        let upcoming = self.epoch_at(now) + 1;

        let mut votes = ledger.checkpoints.last().map_or(0, |prev| prev.votes);
        let due = ledger.unlocks.partition_point(|u| u.epoch <= upcoming);
        let passed: Vec<ScheduledUnlock> = ledger.unlocks.drain(..due).collect();
        for unlock in passed {
            votes = votes.checked_sub(unlock.amount).ok_or(ErrorCode::MathOverflow)?;
            if unlock.epoch < upcoming {
                series::record(
                    &mut ledger.checkpoints,
                    Checkpoint {
                        epoch: unlock.epoch,
                        votes,
                    },
                );
            }
        }

        let votes = votes
            .checked_add(addition)
            .ok_or(ErrorCode::MathOverflow)?
            .checked_sub(deduction)
            .ok_or(ErrorCode::MathOverflow)?;
        series::record(
            &mut ledger.checkpoints,
            Checkpoint {
                epoch: upcoming,
                votes,
            },
        );

        host.emit(LockerEvent::DelegateCheckpointed(DelegateCheckpointed {
            delegate: ledger.delegate,
            epoch: upcoming,
            votes,
        }));
        Ok(())
    }

    /// Drops released locks from the delegate's schedule and checkpoints the
    /// loss of any weight that would still have counted next epoch.
    pub(crate) fn release_delegated<H: Host>(
        &self,
        ledger: &mut DelegateLedger,
        released: &[LockedBalance],
        now: u64,
        host: &mut H,
    ) -> Result<()> {
        let upcoming = self.epoch_at(now) + 1;
        let mut deduction: u64 = 0;
        for lock in released.iter().filter(|lock| lock.unlock_epoch > upcoming) {
            ledger.unschedule_unlock(lock.unlock_epoch, lock.amount)?;
            deduction = deduction.checked_add(lock.amount).ok_or(ErrorCode::MathOverflow)?;
        }
        self.checkpoint_delegate(ledger, 0, deduction, now, host)
    }
}

impl DelegateLedger {
    pub(crate) fn schedule_unlock(&mut self, epoch: u64, amount: u64) -> Result<()> {
        match self.unlocks.binary_search_by_key(&epoch, |u| u.epoch) {
            Ok(i) => {
                self.unlocks[i].amount = self.unlocks[i]
                    .amount
                    .checked_add(amount)
                    .ok_or(ErrorCode::MathOverflow)?;
            }
            Err(i) => self.unlocks.insert(i, ScheduledUnlock { epoch, amount }),
        }
        Ok(())
    }

    pub(crate) fn unschedule_unlock(&mut self, epoch: u64, amount: u64) -> Result<()> {
        let i = self
            .unlocks
            .binary_search_by_key(&epoch, |u| u.epoch)
            .map_err(|_| ErrorCode::MathOverflow)?;
        let left = self.unlocks[i]
            .amount
            .checked_sub(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        if left == 0 {
            self.unlocks.remove(i);
        } else {
            self.unlocks[i].amount = left;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::testing::{Fixture, MockHost};

    #[test]
    fn rolling_forward_records_each_passed_unlock() {
        let f = Fixture::new();
        let mut host = MockHost::default();
        let mut ledger = DelegateLedger::new(Pubkey::new_unique(), Pubkey::new_unique(), 255);
        let start = f.epoch();
        ledger.checkpoints.push(Checkpoint { epoch: start, votes: 60 });
        for (offset, amount) in [(2, 10), (4, 20), (9, 30)] {
            ledger.schedule_unlock(start + offset, amount).unwrap();
        }

        let now = f.now + 5 * f.locker.epoch_duration;
        f.locker.checkpoint_delegate(&mut ledger, 0, 0, now, &mut host).unwrap();

        let epochs: Vec<(u64, u64)> = ledger.checkpoints.iter().map(|c| (c.epoch - start, c.votes)).collect();
        assert_eq!(epochs, vec![(0, 60), (2, 50), (4, 30), (6, 30)]);
        assert_eq!(ledger.unlocks, vec![ScheduledUnlock { epoch: start + 9, amount: 30 }]);
    }
}
