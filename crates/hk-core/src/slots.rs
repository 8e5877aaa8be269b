//! Index-addressed result buffer shared by the tasks of one run.
//!
//! Every invocation owns exactly one slot index, so tasks never contend on
//! the same cell. Each cell is write-once: a second write to an index is
//! reported as [`CoreError::SlotTaken`] and the first value is kept. No task
//! reads a slot; the buffer is only read back after every task has joined.
use std::sync::OnceLock;

use hk_model::Outcome;

use crate::error::CoreError;

pub struct SlotBuffer {
    slots: Box<[OnceLock<Outcome>]>,
}

impl SlotBuffer {
    /// Allocate `len` empty slots. The buffer is never resized.
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Write the outcome of the invocation owning `index`.
    pub fn fill(&self, index: usize, outcome: Outcome) -> Result<(), CoreError> {
        let slot = self.slots.get(index).ok_or(CoreError::SlotOutOfRange {
            index,
            len: self.slots.len(),
        })?;
        slot.set(outcome)
            .map_err(|_| CoreError::SlotTaken { index })
    }

    /// Number of slots written so far.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.get().is_some()).count()
    }

    /// Consume the buffer; `missing` supplies an outcome for any empty slot.
    pub fn into_outcomes(self, mut missing: impl FnMut(usize) -> Outcome) -> Vec<Outcome> {
        self.slots
            .into_vec()
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.into_inner().unwrap_or_else(|| missing(i)))
            .collect()
    }

    /// Like [`into_outcomes`](Self::into_outcomes) but through a shared reference.
    pub fn snapshot(&self, mut missing: impl FnMut(usize) -> Outcome) -> Vec<Outcome> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| slot.get().cloned().unwrap_or_else(|| missing(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hk_model::{InvocationError, InvocationResult};
    use std::sync::Arc;

    fn ok(end: f64) -> Outcome {
        Ok(InvocationResult::new(0.0, end))
    }

    #[test]
    fn fills_each_slot_once() {
        let buf = SlotBuffer::new(3);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.filled(), 0);

        buf.fill(1, ok(1.0)).unwrap();
        assert_eq!(buf.filled(), 1);

        let err = buf.fill(1, ok(99.0)).unwrap_err();
        assert!(matches!(err, CoreError::SlotTaken { index: 1 }));

        let out = buf.into_outcomes(|_| Err(InvocationError::Aborted("missing".into())));
        assert_eq!(out[1], ok(1.0));
        assert!(out[0].is_err());
        assert!(out[2].is_err());
    }

    #[test]
    fn out_of_range_is_an_error() {
        let buf = SlotBuffer::new(2);
        let err = buf.fill(2, ok(0.0)).unwrap_err();
        assert!(matches!(err, CoreError::SlotOutOfRange { index: 2, len: 2 }));
        assert_eq!(buf.filled(), 0);
    }

    #[test]
    fn disjoint_writers_from_many_threads() {
        let buf = Arc::new(SlotBuffer::new(64));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let buf = Arc::clone(&buf);
                std::thread::spawn(move || {
                    for i in (t..64).step_by(8) {
                        buf.fill(i, ok(i as f64)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(buf.filled(), 64);
        let out = buf.snapshot(|_| unreachable!());
        for (i, o) in out.iter().enumerate() {
            assert_eq!(o, &ok(i as f64));
        }
    }
}
