//! Append-only snapshot-indexed time series.
//!
//! [`SnapshotHistory`] stores a value's evolution over snapshot ids as two
//! parallel vectors with strictly increasing ids. Entries are never removed
//! or reordered, so a growable array with binary-search lookup is sufficient;
//! no pointer graph is needed.

use serde::{Deserialize, Serialize};

use crate::{LedgerError, SnapshotId};

/// Sparse history of a single value across snapshot ids.
///
/// Used both for per-account balances and for total supply. Absence of an
/// entry for a queried id means "the value of the most recent entry at or
/// before that id, or the type's default if none exists".
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotHistory<T> {
    ids: Vec<SnapshotId>,
    values: Vec<T>,
}

impl<T: Clone + Default + PartialEq> SnapshotHistory<T> {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Record `value` under `id`, keeping storage sparse.
    ///
    /// When the last entry already carries `id` (several mutations landing in
    /// the same still-open snapshot window) it is overwritten in place rather
    /// than appended again. When `value` equals the latest recorded value
    /// (the default when the history is empty) nothing is written.
    pub fn record(&mut self, id: SnapshotId, value: T) {
        if let Some(&last) = self.ids.last() {
            debug_assert!(last <= id, "snapshot ids must not go backwards");
            if last == id {
                if let Some(slot) = self.values.last_mut() {
                    *slot = value;
                }
                return;
            }
        }
        let unchanged = match self.values.last() {
            Some(latest) => *latest == value,
            None => value == T::default(),
        };
        if unchanged {
            return;
        }
        self.ids.push(id);
        self.values.push(value);
    }

    /// Value at or before `id`, where `last_issued` is the counter's last
    /// issued snapshot id.
    ///
    /// Lookup is a binary search over the ordered id sequence; histories may
    /// grow unboundedly, so a linear scan is not acceptable here.
    pub fn value_at(&self, id: SnapshotId, last_issued: SnapshotId) -> Result<T, LedgerError> {
        if id == 0 {
            return Err(LedgerError::InvalidSnapshotId);
        }
        if id > last_issued {
            return Err(LedgerError::SnapshotNotFound {
                id,
                last: last_issued,
            });
        }
        let idx = self.ids.partition_point(|&recorded| recorded <= id);
        if idx == 0 {
            Ok(T::default())
        } else {
            Ok(self.values[idx - 1].clone())
        }
    }

    /// Most recent recorded value, or the default if the history is empty.
    pub fn latest(&self) -> T {
        self.values.last().cloned().unwrap_or_default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Amount;

    #[test]
    fn empty_history_reads_default() {
        let history = SnapshotHistory::<Amount>::new();
        assert_eq!(history.latest(), 0);
        assert_eq!(history.value_at(1, 5).unwrap(), 0);
        assert_eq!(history.value_at(5, 5).unwrap(), 0);
    }

    #[test]
    fn rejects_reserved_id_zero() {
        let history = SnapshotHistory::<Amount>::new();
        assert_eq!(
            history.value_at(0, 10).unwrap_err(),
            LedgerError::InvalidSnapshotId
        );
    }

    #[test]
    fn rejects_unissued_ids() {
        let mut history = SnapshotHistory::<Amount>::new();
        history.record(1, 100);
        assert_eq!(
            history.value_at(3, 2).unwrap_err(),
            LedgerError::SnapshotNotFound { id: 3, last: 2 }
        );
    }

    #[test]
    fn lookup_returns_latest_entry_at_or_before_id() {
        let mut history = SnapshotHistory::<Amount>::new();
        history.record(2, 10);
        history.record(5, 30);
        history.record(9, 20);
        assert_eq!(history.value_at(1, 20).unwrap(), 0);
        assert_eq!(history.value_at(2, 20).unwrap(), 10);
        assert_eq!(history.value_at(4, 20).unwrap(), 10);
        assert_eq!(history.value_at(5, 20).unwrap(), 30);
        assert_eq!(history.value_at(8, 20).unwrap(), 30);
        assert_eq!(history.value_at(9, 20).unwrap(), 20);
        assert_eq!(history.value_at(20, 20).unwrap(), 20);
    }

    #[test]
    fn lookup_scales_over_long_histories() {
        let mut history = SnapshotHistory::<Amount>::new();
        for id in 1..=1_000u64 {
            history.record(id, id as Amount * 7);
        }
        assert_eq!(history.value_at(1, 1_000).unwrap(), 7);
        assert_eq!(history.value_at(500, 1_000).unwrap(), 3_500);
        assert_eq!(history.value_at(1_000, 1_000).unwrap(), 7_000);
    }

    #[test]
    fn same_window_overwrites_in_place() {
        let mut history = SnapshotHistory::<Amount>::new();
        history.record(3, 10);
        history.record(3, 25);
        history.record(3, 40);
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest(), 40);
        assert_eq!(history.value_at(3, 3).unwrap(), 40);
    }

    #[test]
    fn unchanged_values_are_not_appended() {
        let mut history = SnapshotHistory::<Amount>::new();
        history.record(1, 0); // default on empty history, skipped
        assert!(history.is_empty());
        history.record(2, 50);
        history.record(4, 50); // unchanged, skipped
        assert_eq!(history.len(), 1);
        history.record(6, 60);
        assert_eq!(history.len(), 2);
        assert_eq!(history.value_at(5, 10).unwrap(), 50);
    }

    #[test]
    fn serde_round_trip() {
        let mut history = SnapshotHistory::<Amount>::new();
        history.record(1, 5);
        history.record(4, 9);
        let json = serde_json::to_string(&history).unwrap();
        let restored: SnapshotHistory<Amount> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, history);
    }
}
