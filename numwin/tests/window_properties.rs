use std::collections::HashSet;

use numwin::{Average, WindowStore};
use proptest::prelude::*;

/// Straightforward Vec-based model of the window merge.
fn model_merge(window: &mut Vec<i64>, capacity: usize, incoming: &[i64]) {
    for &value in incoming {
        if window.contains(&value) {
            continue;
        }
        if window.len() >= capacity {
            window.remove(0);
        }
        window.push(value);
    }
}

proptest! {
    #[test]
    fn merge_keeps_window_bounded_and_unique(
        capacity in 1usize..16,
        batches in prop::collection::vec(prop::collection::vec(-20i64..20, 0..12), 0..20),
    ) {
        let mut store = WindowStore::<i64>::new(capacity).unwrap();
        for batch in &batches {
            let result = store.merge(batch);
            prop_assert!(result.curr_state.len() <= capacity);
            let unique: HashSet<_> = result.curr_state.iter().collect();
            prop_assert_eq!(unique.len(), result.curr_state.len());
        }
    }

    #[test]
    fn merge_matches_fifo_model(
        capacity in 1usize..10,
        batches in prop::collection::vec(prop::collection::vec(0i64..30, 0..8), 0..15),
    ) {
        let mut store = WindowStore::<i64>::new(capacity).unwrap();
        let mut model = Vec::new();
        for batch in &batches {
            let result = store.merge(batch);
            prop_assert_eq!(&result.prev_state, &model);
            model_merge(&mut model, capacity, batch);
            prop_assert_eq!(&result.curr_state, &model);
        }
    }

    #[test]
    fn evictions_come_from_the_front(
        capacity in 1usize..8,
        batches in prop::collection::vec(prop::collection::vec(0i64..25, 0..10), 1..12),
    ) {
        let mut store = WindowStore::<i64>::new(capacity).unwrap();
        for batch in &batches {
            let result = store.merge(batch);
            let k = result.evicted.len().min(result.prev_state.len());
            prop_assert_eq!(&result.evicted[..k], &result.prev_state[..k]);
        }
    }

    #[test]
    fn empty_merge_never_changes_contents(
        capacity in 1usize..8,
        seed in prop::collection::vec(0i64..50, 0..20),
    ) {
        let mut store = WindowStore::<i64>::new(capacity).unwrap();
        store.merge(&seed);
        let result = store.merge(&[]);
        prop_assert_eq!(result.prev_state, result.curr_state);
        prop_assert!(result.evicted.is_empty());
    }

    #[test]
    fn average_matches_exact_rational(values in prop::collection::vec(-1_000_000i64..1_000_000, 1..40)) {
        let sum: i128 = values.iter().map(|v| *v as i128).sum();
        let n = values.len() as i128;
        let avg = Average::of(&values).hundredths();
        // |avg/100 - sum/n| <= 1/200
        prop_assert!((avg * 2 * n - sum * 200).abs() <= n);
    }
}
