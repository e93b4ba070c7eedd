//! Maximum-leaves bound checked before every insertion.

use crate::error::{AccumulatorError, Result};

/// Number of leaves a tree of `depth` levels holds.
pub fn capacity_for_depth(depth: usize) -> u64 {
    1u64 << depth
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityGuard {
    capacity: u64,
}

impl CapacityGuard {
    pub fn for_depth(depth: usize) -> Self {
        Self {
            capacity: capacity_for_depth(depth),
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Fails with `TreeFull` when no slot is left for the leaf at `next_index`.
    pub fn check(&self, next_index: u64) -> Result<()> {
        self.check_batch(next_index, 1)
    }

    /// Fails with `TreeFull` unless `count` more leaves fit after `next_index`.
    pub fn check_batch(&self, next_index: u64, count: u64) -> Result<()> {
        let fits = next_index
            .checked_add(count)
            .is_some_and(|end| end <= self.capacity);
        if fits {
            Ok(())
        } else {
            Err(AccumulatorError::TreeFull {
                capacity: self.capacity,
            })
        }
    }

    pub fn remaining(&self, next_index: u64) -> u64 {
        self.capacity.saturating_sub(next_index)
    }
}
