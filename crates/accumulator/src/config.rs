//! Construction parameters for a tree instance.

use serde::{Deserialize, Serialize};

use crate::error::{AccumulatorError, Result};

/// Default tree depth (20 levels = 1,048,576 leaves)
pub const DEFAULT_DEPTH: usize = 20;

/// Default number of roots kept valid for late proofs
pub const DEFAULT_ROOT_HISTORY_SIZE: usize = 30;

/// Deepest supported tree; leaf indices must fit a `u64` with room to spare.
pub const MAX_DEPTH: usize = 32;

/// Longest supported root history; snapshots store the length as a `u32`.
pub const MAX_ROOT_HISTORY_SIZE: usize = u32::MAX as usize;

/// Seed hashed into the empty-leaf value.
pub const DEFAULT_ZERO_SEED: &str = "tornado";

/// Parameters fixed for the lifetime of a tree. Changing any of them means
/// building a new tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Number of levels below the root; capacity is `2^depth` leaves.
    pub depth: usize,
    /// Length of the root history window.
    pub roots_size: usize,
    /// Domain string the zero leaf is derived from.
    pub zero_seed: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            roots_size: DEFAULT_ROOT_HISTORY_SIZE,
            zero_seed: DEFAULT_ZERO_SEED.to_string(),
        }
    }
}

impl TreeConfig {
    pub fn new(depth: usize, roots_size: usize) -> Self {
        Self {
            depth,
            roots_size,
            ..Self::default()
        }
    }

    pub fn with_zero_seed(mut self, seed: impl Into<String>) -> Self {
        self.zero_seed = seed.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(AccumulatorError::InvalidConfig(format!(
                "depth must be within [1..{}], got {}",
                MAX_DEPTH, self.depth
            )));
        }
        if self.roots_size == 0 || self.roots_size > MAX_ROOT_HISTORY_SIZE {
            return Err(AccumulatorError::InvalidConfig(format!(
                "roots_size must be within [1..{}], got {}",
                MAX_ROOT_HISTORY_SIZE, self.roots_size
            )));
        }
        Ok(())
    }
}
