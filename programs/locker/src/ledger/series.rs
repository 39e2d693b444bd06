//! Epoch-indexed sequences shared by the supply snapshots and the delegate
//! checkpoints. Entries are strictly increasing by epoch; at most one entry
//! exists per epoch.

use crate::account::{Checkpoint, EpochSupply, ScheduledUnlock};

pub trait EpochEntry {
    fn epoch(&self) -> u64;
}

impl EpochEntry for EpochSupply {
    fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl EpochEntry for Checkpoint {
    fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl EpochEntry for ScheduledUnlock {
    fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Appends `entry`, or overwrites the last entry if it belongs to the same epoch.
pub fn record<T: EpochEntry>(series: &mut Vec<T>, entry: T) {
    match series.last_mut() {
        Some(last) if last.epoch() == entry.epoch() => *last = entry,
        _ => {
            debug_assert!(series.last().map_or(true, |l| l.epoch() < entry.epoch()));
            series.push(entry)
        }
    }
}

/// Grows a non-empty series one epoch at a time until its last entry is
/// `epoch`. Returns how many entries were appended; zero when already caught up.
pub fn catch_up_to<T, F>(series: &mut Vec<T>, epoch: u64, mut fill: F) -> usize
where
    T: EpochEntry,
    F: FnMut(u64) -> T,
{
    let mut appended = 0;
    while let Some(next) = series
        .last()
        .map(|last| last.epoch() + 1)
        .filter(|next| *next <= epoch)
    {
        series.push(fill(next));
        appended += 1;
    }
    appended
}

/// Latest entry whose epoch is `<= epoch`.
pub fn latest_at<T: EpochEntry>(series: &[T], epoch: u64) -> Option<&T> {
    let upper = series.partition_point(|entry| entry.epoch() <= epoch);
    upper.checked_sub(1).map(|i| &series[i])
}

/// Entries with `after < epoch <= through`.
pub fn range<T: EpochEntry>(series: &[T], after: u64, through: u64) -> &[T] {
    let lo = series.partition_point(|entry| entry.epoch() <= after);
    let hi = series.partition_point(|entry| entry.epoch() <= through);
    &series[lo..hi.max(lo)]
}

pub fn is_strictly_increasing<T: EpochEntry>(series: &[T]) -> bool {
    series.windows(2).all(|w| w[0].epoch() < w[1].epoch())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ckpt(epoch: u64, votes: u64) -> Checkpoint {
        Checkpoint { epoch, votes }
    }

    #[test]
    fn record_coalesces_same_epoch() {
        let mut series = vec![];
        record(&mut series, ckpt(3, 10));
        record(&mut series, ckpt(3, 25));
        record(&mut series, ckpt(4, 5));
        assert_eq!(series, vec![ckpt(3, 25), ckpt(4, 5)]);
    }

    #[test]
    fn catch_up_fills_every_gap_once() {
        let mut series = vec![EpochSupply { epoch: 10, supply: 7 }];
        assert_eq!(catch_up_to(&mut series, 13, |epoch| EpochSupply { epoch, supply: 0 }), 3);
        assert_eq!(catch_up_to(&mut series, 13, |epoch| EpochSupply { epoch, supply: 0 }), 0);
        let epochs: Vec<u64> = series.iter().map(|e| e.epoch).collect();
        assert_eq!(epochs, vec![10, 11, 12, 13]);
        assert!(is_strictly_increasing(&series));
    }

    #[test]
    fn lookup_and_range() {
        let series = vec![ckpt(2, 1), ckpt(5, 2), ckpt(9, 3)];
        assert_eq!(latest_at(&series, 1), None);
        assert_eq!(latest_at(&series, 2), Some(&ckpt(2, 1)));
        assert_eq!(latest_at(&series, 8), Some(&ckpt(5, 2)));
        assert_eq!(latest_at(&series, 100), Some(&ckpt(9, 3)));
        assert_eq!(range(&series, 2, 9), &[ckpt(5, 2), ckpt(9, 3)]);
        assert!(range(&series, 9, 4).is_empty());
    }
}
