//! Bounded, deduplicated FIFO windows.
//!
//! Invariants held by [`WindowStore`] after every call:
//! - `len() <= capacity()`
//! - no value appears twice
//! - eviction always removes the oldest surviving value
//!
//! The only mutation is [`WindowStore::merge`].

mod average;

pub use average::Average;

use std::collections::{HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{WindowError, WindowResult};

/// Values that can live in a window and be averaged exactly.
pub trait WindowValue: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    fn to_wide(self) -> i128;
}

macro_rules! impl_window_value {
    ($($ty:ty),*) => {
        $(
            impl WindowValue for $ty {
                fn to_wide(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

impl_window_value!(i8, i16, i32, i64, u8, u16, u32, u64);

/// Outcome of a single [`WindowStore::merge`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeResult<T> {
    /// Window contents before the merge.
    pub prev_state: Vec<T>,
    /// Window contents after the merge.
    pub curr_state: Vec<T>,
    /// Values pushed out of the front of the window, oldest first.
    pub evicted: Vec<T>,
    pub average: Average,
}

#[derive(Debug, Clone)]
pub struct WindowStore<T> {
    numbers: VecDeque<T>,
    members: HashSet<T>,
    capacity: usize,
    last_updated: Option<DateTime<Utc>>,
}

impl<T: WindowValue> WindowStore<T> {
    pub const DEFAULT_CAPACITY: usize = 10;

    pub fn new(capacity: usize) -> WindowResult<Self> {
        if capacity == 0 {
            return Err(WindowError::ZeroCapacity);
        }
        Ok(Self {
            numbers: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
            capacity,
            last_updated: None,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.members.contains(value)
    }

    /// Time of the most recent merge, `None` before the first one.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Values in insertion order, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.numbers.iter().copied().collect()
    }

    pub fn average(&self) -> Average {
        Average::of(self.numbers.iter())
    }

    /// Merge an incoming batch in order.
    ///
    /// Values already in the window (including ones added earlier in the
    /// same batch) are skipped without reordering. A new value evicts the
    /// oldest one when the window is full. The timestamp is refreshed on
    /// every call, even when nothing new was added.
    pub fn merge(&mut self, incoming: &[T]) -> MergeResult<T> {
        let prev_state = self.snapshot();
        let mut evicted = Vec::new();

        for &value in incoming {
            if self.members.contains(&value) {
                continue;
            }
            if self.numbers.len() >= self.capacity {
                if let Some(oldest) = self.numbers.pop_front() {
                    self.members.remove(&oldest);
                    evicted.push(oldest);
                }
            }
            self.numbers.push_back(value);
            self.members.insert(value);
        }

        self.last_updated = Some(Utc::now());

        MergeResult {
            prev_state,
            curr_state: self.snapshot(),
            evicted,
            average: self.average(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store(capacity: usize) -> WindowStore<i64> {
        WindowStore::new(capacity).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            WindowStore::<i64>::new(0).unwrap_err(),
            WindowError::ZeroCapacity
        );
    }

    #[test]
    fn test_fill_then_evict_fifo() {
        let mut window = store(5);
        let first = window.merge(&[2, 3, 5, 7, 11]);
        assert_eq!(first.prev_state, Vec::<i64>::new());
        assert_eq!(first.curr_state, vec![2, 3, 5, 7, 11]);
        assert!(first.evicted.is_empty());

        let second = window.merge(&[13, 17]);
        assert_eq!(second.prev_state, vec![2, 3, 5, 7, 11]);
        assert_eq!(second.curr_state, vec![5, 7, 11, 13, 17]);
        assert_eq!(second.evicted, vec![2, 3]);
        assert_eq!(second.average.to_string(), "10.60");
    }

    #[test]
    fn test_duplicates_within_batch_are_dropped() {
        let mut window = store(5);
        let result = window.merge(&[2, 2, 3]);
        assert_eq!(result.curr_state, vec![2, 3]);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_existing_value_is_not_reordered() {
        let mut window = store(10);
        window.merge(&[2, 3, 5]);
        let result = window.merge(&[3, 9]);
        assert_eq!(result.curr_state, vec![2, 3, 5, 9]);
    }

    #[test]
    fn test_existing_value_does_not_evict() {
        let mut window = store(3);
        window.merge(&[1, 2, 3]);
        let result = window.merge(&[1, 2, 3]);
        assert_eq!(result.curr_state, vec![1, 2, 3]);
        assert!(result.evicted.is_empty());
    }

    #[test]
    fn test_evicted_value_can_return_at_the_back() {
        let mut window = store(3);
        window.merge(&[1, 2, 3]);
        window.merge(&[4]);
        assert!(!window.contains(&1));
        let result = window.merge(&[1]);
        assert_eq!(result.curr_state, vec![3, 4, 1]);
        assert_eq!(result.evicted, vec![2]);
    }

    #[test]
    fn test_oversized_batch_keeps_newest() {
        let mut window = store(5);
        let batch: Vec<i64> = (1..=11).collect();
        let result = window.merge(&batch);
        assert_eq!(result.curr_state, vec![7, 8, 9, 10, 11]);
        assert_eq!(result.evicted, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_empty_merge_is_noop_but_touches_timestamp() {
        let mut window = store(5);
        window.merge(&[4, 8]);
        let stamped = window.last_updated().unwrap();

        let result = window.merge(&[]);
        assert_eq!(result.prev_state, result.curr_state);
        assert_eq!(result.curr_state, vec![4, 8]);
        assert!(window.last_updated().unwrap() >= stamped);
    }

    #[test]
    fn test_fresh_store_is_empty_and_unstamped() {
        let window = store(10);
        assert!(window.is_empty());
        assert_eq!(window.capacity(), 10);
        assert!(window.last_updated().is_none());
        assert_eq!(window.average(), Average::ZERO);
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let mut window = store(4);
        window.merge(&[9, 8, 7]);
        let before = window.last_updated();
        assert_eq!(window.snapshot(), vec![9, 8, 7]);
        assert_eq!(window.snapshot(), vec![9, 8, 7]);
        assert_eq!(window.last_updated(), before);
    }
}
