//! Per-level hashes of empty subtrees.
//!
//! `zeros[0]` is the empty leaf and `zeros[i] = H(zeros[i-1], zeros[i-1])`,
//! so `zeros[depth]` is the root of a tree with no leaves.

use ark_ff::PrimeField;
use tiny_keccak::{Hasher, Keccak};

use crate::error::{AccumulatorError, Result};
use crate::hasher::CompressionFunction;

/// Derive the empty-leaf value: `keccak256(seed)` read big-endian, reduced
/// into the field.
pub fn zero_value_from_seed<F: PrimeField>(seed: &[u8]) -> F {
    let mut keccak = Keccak::v256();
    keccak.update(seed);
    let mut digest = [0u8; 32];
    keccak.finalize(&mut digest);
    F::from_be_bytes_mod_order(&digest)
}

/// Immutable table of empty-subtree hashes for one tree depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroHashes<F> {
    /// Level 0 = empty leaf, level `depth` = empty root
    levels: Vec<F>,
}

impl<F: PrimeField> ZeroHashes<F> {
    /// Compute `depth + 1` zero hashes starting from `zero_value`.
    pub fn build<H>(hasher: &H, depth: usize, zero_value: F) -> Self
    where
        H: CompressionFunction<Field = F>,
    {
        let mut levels = Vec::with_capacity(depth + 1);
        let mut current = zero_value;
        levels.push(current);

        for _ in 0..depth {
            current = hasher.combine2(current, current);
            levels.push(current);
        }

        Self { levels }
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// The empty leaf.
    pub fn zero_value(&self) -> F {
        self.levels[0]
    }

    /// Empty subtree hash at `level`, for `level` in `[0, depth]`.
    pub fn get(&self, level: usize) -> Result<F> {
        self.levels
            .get(level)
            .copied()
            .ok_or_else(|| AccumulatorError::out_of_range("zero level", level, self.levels.len()))
    }

    /// Root of a tree with no leaves.
    pub fn empty_root(&self) -> F {
        self.levels[self.levels.len() - 1]
    }

    pub fn as_slice(&self) -> &[F] {
        &self.levels
    }
}
