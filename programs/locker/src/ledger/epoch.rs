//! Mapping from wall-clock seconds to epoch ids.

use crate::account::Locker;

pub fn epoch_id(timestamp: u64, epoch_duration: u64) -> u64 {
    timestamp / epoch_duration
}

impl Locker {
    pub fn epoch_at(&self, timestamp: u64) -> u64 {
        epoch_id(timestamp, self.epoch_duration)
    }

    /// Timestamp at which `epoch` begins.
    pub fn epoch_start_of(&self, epoch: u64) -> u64 {
        epoch.saturating_mul(self.epoch_duration)
    }

    /// Epoch id a deposit made at `timestamp` unlocks in.
    pub fn unlock_epoch_for(&self, timestamp: u64) -> u64 {
        self.epoch_at(timestamp) + self.lock_epochs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_boundaries() {
        let week = 604_800;
        assert_eq!(epoch_id(0, week), 0);
        assert_eq!(epoch_id(week - 1, week), 0);
        assert_eq!(epoch_id(week, week), 1);
    }
}
