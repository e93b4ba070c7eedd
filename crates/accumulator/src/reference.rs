//! Client-side Merkle tree that keeps every leaf.
//!
//! Where [`crate::MerkleTreeWithHistory`] stores only a frontier, this tree
//! stores the filled prefix of every layer. Nodes past the prefix read as the
//! zero hash of their level. Clients use it to build membership paths for
//! roots the accumulator reports as known, and tests use it as an oracle.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::capacity::CapacityGuard;
use crate::config::MAX_DEPTH;
use crate::error::{AccumulatorError, Result};
use crate::hasher::CompressionFunction;
use crate::proof::MerklePath;
use crate::zeros::ZeroHashes;

#[derive(Clone, Debug)]
pub struct FixedMerkleTree<H: CompressionFunction> {
    hasher: H,
    zeros: ZeroHashes<H::Field>,
    /// layers[0] = leaves, layers[depth] = root (once a leaf exists)
    layers: Vec<Vec<H::Field>>,
    guard: CapacityGuard,
}

impl<H: CompressionFunction> FixedMerkleTree<H> {
    pub fn new(hasher: H, depth: usize, zero_value: H::Field) -> Result<Self> {
        if depth == 0 || depth > MAX_DEPTH {
            return Err(AccumulatorError::InvalidConfig(format!(
                "depth must be within [1..{}], got {}",
                MAX_DEPTH, depth
            )));
        }
        let zeros = ZeroHashes::build(&hasher, depth, zero_value);

        Ok(Self {
            hasher,
            zeros,
            layers: vec![Vec::new(); depth + 1],
            guard: CapacityGuard::for_depth(depth),
        })
    }

    /// Build a tree over `leaves` in one pass, layer by layer.
    pub fn from_leaves(
        hasher: H,
        depth: usize,
        zero_value: H::Field,
        leaves: &[H::Field],
    ) -> Result<Self> {
        let mut tree = Self::new(hasher, depth, zero_value)?;
        tree.guard.check_batch(0, leaves.len() as u64)?;
        tree.layers[0] = leaves.to_vec();
        tree.rebuild();
        Ok(tree)
    }

    fn rebuild(&mut self) {
        for level in 1..self.layers.len() {
            let zero = self.zeros.as_slice()[level - 1];
            let parents = hash_layer(&self.hasher, &self.layers[level - 1], zero);
            self.layers[level] = parents;
        }
    }

    /// Append a leaf and update its path. Returns the leaf index.
    pub fn insert(&mut self, leaf: H::Field) -> Result<u64> {
        let index = self.layers[0].len() as u64;
        self.guard.check(index)?;
        self.layers[0].push(leaf);

        let mut position = index as usize;
        for level in 0..self.depth() {
            let parent = position / 2;
            let hash = self
                .hasher
                .combine2(self.node(level, parent * 2), self.node(level, parent * 2 + 1));

            let layer = &mut self.layers[level + 1];
            if parent < layer.len() {
                layer[parent] = hash;
            } else {
                layer.push(hash);
            }
            position = parent;
        }

        Ok(index)
    }

    fn node(&self, level: usize, index: usize) -> H::Field {
        self.layers[level]
            .get(index)
            .copied()
            .unwrap_or(self.zeros.as_slice()[level])
    }

    pub fn root(&self) -> H::Field {
        self.node(self.depth(), 0)
    }

    /// Membership path for the leaf at `index`.
    pub fn path(&self, index: u64) -> Result<MerklePath<H::Field>> {
        let len = self.layers[0].len();
        if index >= len as u64 {
            return Err(AccumulatorError::out_of_range("leaf index", index as usize, len));
        }

        let depth = self.depth();
        let mut siblings = Vec::with_capacity(depth);
        let mut indices = Vec::with_capacity(depth);

        let mut position = index as usize;
        for level in 0..depth {
            siblings.push(self.node(level, position ^ 1));
            indices.push(position & 1 == 1);
            position >>= 1;
        }

        Ok(MerklePath::new(siblings, indices))
    }

    pub fn leaves(&self) -> &[H::Field] {
        &self.layers[0]
    }

    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn zero_hashes(&self) -> &ZeroHashes<H::Field> {
        &self.zeros
    }
}

/// Parents of `children`, pairing an unmatched last child with `zero`.
fn hash_layer<H: CompressionFunction>(hasher: &H, children: &[H::Field], zero: H::Field) -> Vec<H::Field> {
    let pair = |chunk: &[H::Field]| hasher.combine2(chunk[0], chunk.get(1).copied().unwrap_or(zero));

    #[cfg(feature = "parallel")]
    {
        children.par_chunks(2).map(pair).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        children.chunks(2).map(pair).collect()
    }
}
