//! Per-generator 12-bit sequence for same-millisecond bursts.

use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::SEQ_MASK;

#[derive(Debug, Default)]
struct SequenceState {
    last_ms: Option<u64>,
    counter: u16,
}

/// Hands out the `seq` field for each generated ID.
///
/// Within one millisecond the counter increments and wraps modulo 4096;
/// a different millisecond resets it to 0. Past 4096 IDs per millisecond,
/// uniqueness rests on the random field.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    state: Mutex<SequenceState>,
}

impl SequenceGenerator {
    /// Creates a generator that has not seen any millisecond yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sequence value for an ID stamped with `ms`.
    ///
    /// `ms` is the already-bucketed, epoch-shifted timestamp.
    pub fn next(&self, ms: u64) -> u16 {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.last_ms == Some(ms) {
            state.counter = (state.counter + 1) & SEQ_MASK;
            if state.counter == 0 {
                trace!(ms, "sequence wrapped within millisecond");
            }
        } else {
            state.last_ms = Some(ms);
            state.counter = 0;
        }
        state.counter
    }

    /// Returns the last millisecond and counter handed out.
    pub fn snapshot(&self) -> (Option<u64>, u16) {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        (state.last_ms, state.counter)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_increments_within_millisecond() {
        let seq = SequenceGenerator::new();
        assert_eq!(seq.next(10), 0);
        assert_eq!(seq.next(10), 1);
        assert_eq!(seq.next(10), 2);
        assert_eq!(seq.snapshot(), (Some(10), 2));
    }

    #[test]
    fn test_resets_on_new_millisecond() {
        let seq = SequenceGenerator::new();
        seq.next(10);
        seq.next(10);
        assert_eq!(seq.next(11), 0);
        // Going backwards is still a different millisecond
        assert_eq!(seq.next(10), 0);
    }

    #[test]
    fn test_wraps_at_4096() {
        let seq = SequenceGenerator::new();
        assert_eq!(seq.next(5), 0);
        for expected in 1..=SEQ_MASK {
            assert_eq!(seq.next(5), expected);
        }
        assert_eq!(seq.next(5), 0);
        assert_eq!(seq.next(5), 1);
    }

    #[test]
    fn test_first_call_starts_at_zero() {
        let seq = SequenceGenerator::new();
        assert_eq!(seq.snapshot(), (None, 0));
        assert_eq!(seq.next(0), 0);
        assert_eq!(seq.next(0), 1);
    }

    #[test]
    fn test_concurrent_callers_get_distinct_values() {
        let seq = Arc::new(SequenceGenerator::new());
        seq.next(42);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seq = Arc::clone(&seq);
                std::thread::spawn(move || (0..100).map(|_| seq.next(42)).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "duplicate sequence {value}");
            }
        }
        assert_eq!(seen.len(), 800);
        assert_eq!(seq.snapshot(), (Some(42), 800));
    }
}
