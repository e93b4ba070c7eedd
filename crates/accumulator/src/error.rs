//! Errors surfaced by the accumulator.

use thiserror::Error;

/// Errors that can occur while building, mutating or restoring a tree.
///
/// An unknown root is not an error: [`crate::MerkleTreeWithHistory::is_known_root`]
/// simply answers `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccumulatorError {
    /// Every leaf slot is taken. The tree state is unchanged.
    #[error("Merkle tree is full. No more leaves can be added (capacity {capacity})")]
    TreeFull { capacity: u64 },

    /// A level or history offset outside its valid range.
    #[error("{kind} {index} is out of range (expected < {bound})")]
    OutOfRange {
        kind: &'static str,
        index: usize,
        bound: usize,
    },

    #[error("Invalid tree configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl AccumulatorError {
    pub(crate) fn out_of_range(kind: &'static str, index: usize, bound: usize) -> Self {
        Self::OutOfRange { kind, index, bound }
    }
}

pub type Result<T> = std::result::Result<T, AccumulatorError>;
