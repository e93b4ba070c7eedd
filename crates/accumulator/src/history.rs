//! Fixed-capacity ring of recent roots.
//!
//! Proofs are generated against whatever root a prover saw, which may be a
//! few insertions stale by the time it is checked. The ring keeps the last
//! `capacity` roots so those proofs still verify.

use ark_ff::PrimeField;

use crate::error::{AccumulatorError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootHistory<F> {
    /// `None` = slot never written
    slots: Vec<Option<F>>,
    current: usize,
}

impl<F: PrimeField> RootHistory<F> {
    /// New ring with slot 0 holding `empty_root`.
    pub fn new(capacity: usize, empty_root: F) -> Self {
        assert!(capacity > 0, "root history capacity must be positive");

        let mut slots = vec![None; capacity];
        slots[0] = Some(empty_root);
        Self { slots, current: 0 }
    }

    /// Rebuild a ring from persisted slots. The caller guarantees `current`
    /// is in range and its slot is written.
    pub(crate) fn from_parts(slots: Vec<Option<F>>, current: usize) -> Self {
        Self { slots, current }
    }

    pub(crate) fn slots(&self) -> &[Option<F>] {
        &self.slots
    }

    /// Record a new root, overwriting the oldest slot once the ring wraps.
    pub fn push(&mut self, root: F) {
        self.current = (self.current + 1) % self.slots.len();
        self.slots[self.current] = Some(root);
    }

    /// Most recently written root.
    pub fn current(&self) -> F {
        // The current slot is always written: seeded at construction, then
        // set by every push.
        self.slots[self.current].unwrap_or_default()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of written slots, at most `capacity`.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root written `offset` pushes before the current one.
    ///
    /// `Ok(None)` when that far back was never written; `OutOfRange` when
    /// `offset` reaches past the ring itself.
    pub fn at_offset(&self, offset: usize) -> Result<Option<F>> {
        let capacity = self.slots.len();
        if offset >= capacity {
            return Err(AccumulatorError::out_of_range("history offset", offset, capacity));
        }
        let slot = (self.current + capacity - offset) % capacity;
        Ok(self.slots[slot])
    }

    /// Whether `candidate` is any root still held in the ring. Zero is never
    /// a known root.
    pub fn is_known(&self, candidate: &F) -> bool {
        if candidate.is_zero() {
            return false;
        }
        self.iter_recent().any(|root| root == *candidate)
    }

    /// Written roots, newest first.
    pub fn iter_recent(&self) -> impl Iterator<Item = F> + '_ {
        let capacity = self.slots.len();
        (0..capacity).map_while(move |offset| {
            let slot = (self.current + capacity - offset) % capacity;
            self.slots[slot]
        })
    }
}
