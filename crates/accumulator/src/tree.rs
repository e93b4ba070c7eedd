//! Incremental Merkle tree with root history.
//!
//! Only the frontier is stored: one "filled subtree" per level holding the
//! most recent completed left child at that level. That is enough to extend
//! the tree by one leaf with exactly `depth` hash calls, and the resulting
//! root always equals the root of the full tree over every inserted leaf
//! padded with zero hashes.

use tracing::{debug, trace};

use crate::capacity::CapacityGuard;
use crate::config::TreeConfig;
use crate::error::{AccumulatorError, Result};
use crate::hasher::CompressionFunction;
use crate::history::RootHistory;
use crate::snapshot::TreeSnapshot;
use crate::zeros::{zero_value_from_seed, ZeroHashes};

/// Outcome of a successful insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insertion<F> {
    /// Position of the leaf in the tree
    pub index: u64,
    /// Root after the leaf was added
    pub root: F,
}

/// Append-only Merkle accumulator that remembers its recent roots.
///
/// Mutation goes through `&mut self`, so a shared instance needs a single
/// writer (e.g. behind a `RwLock`). Every query takes `&self` and sees the
/// frontier, leaf count and latest root of the same committed insertion.
#[derive(Clone, Debug)]
pub struct MerkleTreeWithHistory<H: CompressionFunction> {
    hasher: H,
    depth: usize,
    zeros: ZeroHashes<H::Field>,
    filled_subtrees: Vec<H::Field>,
    next_index: u64,
    roots: RootHistory<H::Field>,
    guard: CapacityGuard,
}

impl<H: CompressionFunction> MerkleTreeWithHistory<H> {
    /// Create an empty tree whose zero leaf is derived from `config.zero_seed`.
    pub fn new(hasher: H, config: &TreeConfig) -> Result<Self> {
        let zero_value = zero_value_from_seed(config.zero_seed.as_bytes());
        Self::with_zero_value(hasher, config, zero_value)
    }

    /// Create an empty tree with an explicit zero leaf. `config.zero_seed`
    /// is ignored.
    pub fn with_zero_value(hasher: H, config: &TreeConfig, zero_value: H::Field) -> Result<Self> {
        config.validate()?;

        let zeros = ZeroHashes::build(&hasher, config.depth, zero_value);
        let filled_subtrees = zeros.as_slice()[..config.depth].to_vec();
        let roots = RootHistory::new(config.roots_size, zeros.empty_root());

        Ok(Self {
            hasher,
            depth: config.depth,
            zeros,
            filled_subtrees,
            next_index: 0,
            roots,
            guard: CapacityGuard::for_depth(config.depth),
        })
    }

    /// Resume a tree from a snapshot taken with [`Self::snapshot`].
    ///
    /// `hasher` must be the one the snapshot was produced with. While the
    /// empty root is still in the history window that is checked; otherwise
    /// only the snapshot's internal consistency can be.
    pub fn restore(hasher: H, snapshot: TreeSnapshot<H::Field>) -> Result<Self> {
        snapshot.check_consistency()?;

        let depth = snapshot.depth as usize;
        let current = snapshot.current_root_index();
        let zeros = ZeroHashes::build(&hasher, depth, snapshot.zero_value);

        if snapshot.next_index < u64::from(snapshot.roots_size)
            && snapshot.roots[0] != Some(zeros.empty_root())
        {
            return Err(AccumulatorError::InvalidSnapshot(
                "empty root does not match this hasher and zero value".to_string(),
            ));
        }

        debug!(
            depth,
            roots_size = snapshot.roots_size,
            next_index = snapshot.next_index,
            "restored merkle tree"
        );

        Ok(Self {
            hasher,
            depth,
            zeros,
            filled_subtrees: snapshot.filled_subtrees,
            next_index: snapshot.next_index,
            roots: RootHistory::from_parts(snapshot.roots, current),
            guard: CapacityGuard::for_depth(depth),
        })
    }

    /// Capture the state needed to resume this tree exactly.
    pub fn snapshot(&self) -> TreeSnapshot<H::Field> {
        TreeSnapshot {
            depth: self.depth as u32,
            roots_size: self.roots.capacity() as u32,
            zero_value: self.zeros.zero_value(),
            next_index: self.next_index,
            filled_subtrees: self.filled_subtrees.clone(),
            roots: self.roots.slots().to_vec(),
        }
    }

    /// Append `leaf` and return its index and the new root.
    ///
    /// Fails with `TreeFull` once `2^depth` leaves are in; the tree is left
    /// untouched in that case.
    pub fn insert(&mut self, leaf: H::Field) -> Result<Insertion<H::Field>> {
        if let Err(e) = self.guard.check(self.next_index) {
            debug!(next_index = self.next_index, "rejected insertion into full tree");
            return Err(e);
        }
        Ok(self.append(leaf))
    }

    /// Append several leaves in order. Either all of them go in or, when they
    /// do not fit, none do.
    pub fn insert_batch(&mut self, leaves: &[H::Field]) -> Result<Vec<Insertion<H::Field>>> {
        if let Err(e) = self.guard.check_batch(self.next_index, leaves.len() as u64) {
            debug!(
                next_index = self.next_index,
                batch = leaves.len(),
                "rejected batch that does not fit"
            );
            return Err(e);
        }
        Ok(leaves.iter().map(|leaf| self.append(*leaf)).collect())
    }

    // Capacity has been checked, nothing below can fail.
    fn append(&mut self, leaf: H::Field) -> Insertion<H::Field> {
        let index = self.next_index;
        let mut current_index = index;
        let mut current_hash = leaf;
        let mut frontier = self.filled_subtrees.clone();

        for (level, filled) in frontier.iter_mut().enumerate() {
            let (left, right) = if current_index % 2 == 0 {
                *filled = current_hash;
                (current_hash, self.zeros.as_slice()[level])
            } else {
                (*filled, current_hash)
            };
            current_hash = self.hasher.combine2(left, right);
            current_index /= 2;
        }

        self.filled_subtrees = frontier;
        self.roots.push(current_hash);
        self.next_index += 1;

        trace!(index, root = %current_hash, "leaf inserted");

        Insertion {
            index,
            root: current_hash,
        }
    }

    /// Root after the most recent insertion, or the empty root.
    pub fn last_root(&self) -> H::Field {
        self.roots.current()
    }

    /// Whether `root` is one of the last `roots_size` roots. Zero never is.
    pub fn is_known_root(&self, root: &H::Field) -> bool {
        self.roots.is_known(root)
    }

    /// Root written `offset` insertions ago; `None` if the tree is younger
    /// than that.
    pub fn root_at_offset(&self, offset: usize) -> Result<Option<H::Field>> {
        self.roots.at_offset(offset)
    }

    /// Number of roots currently held in the history window, counting the
    /// empty root while it is still there.
    pub fn root_history_length(&self) -> usize {
        self.roots.len()
    }

    /// Ring slot of the latest root (`leaf_count mod roots_size`).
    pub fn current_root_index(&self) -> usize {
        self.roots.current_index()
    }

    /// Roots in the history window, newest first.
    pub fn recent_roots(&self) -> impl Iterator<Item = H::Field> + '_ {
        self.roots.iter_recent()
    }

    /// Stored left sibling at `level`, for `level` in `[0, depth)`.
    pub fn filled_subtree_at(&self, level: usize) -> Result<H::Field> {
        self.filled_subtrees
            .get(level)
            .copied()
            .ok_or_else(|| AccumulatorError::out_of_range("level", level, self.depth))
    }

    /// Empty subtree hash at `level`, for `level` in `[0, depth]`; level
    /// `depth` is the empty root.
    pub fn zero_at(&self, level: usize) -> Result<H::Field> {
        self.zeros.get(level)
    }

    pub fn zero_value(&self) -> H::Field {
        self.zeros.zero_value()
    }

    pub fn zero_hashes(&self) -> &ZeroHashes<H::Field> {
        &self.zeros
    }

    /// Parent hash of two nodes, as the tree computes it.
    pub fn hash_left_right(&self, left: H::Field, right: H::Field) -> H::Field {
        self.hasher.combine2(left, right)
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn leaf_count(&self) -> u64 {
        self.next_index
    }

    pub fn capacity(&self) -> u64 {
        self.guard.capacity()
    }

    pub fn is_full(&self) -> bool {
        self.guard.remaining(self.next_index) == 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn roots_size(&self) -> usize {
        self.roots.capacity()
    }
}
