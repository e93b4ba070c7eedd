//! Incremental fixed-depth Merkle accumulator with root history.
//!
//! This crate provides:
//! - `MerkleTreeWithHistory`: append-only tree storing only its frontier,
//!   with a ring of recent roots for verifying slightly stale proofs
//! - `PoseidonCompression`: BN254 Poseidon node hash
//! - `FixedMerkleTree` / `MerklePath`: full client-side tree and membership paths
//! - `TreeSnapshot`: state needed to resume a tree exactly

pub mod capacity;
pub mod config;
pub mod error;
pub mod hasher;
pub mod history;
pub mod poseidon;
pub mod proof;
pub mod reference;
pub mod snapshot;
pub mod tree;
pub mod zeros;


pub use capacity::{capacity_for_depth, CapacityGuard};
pub use config::{
    TreeConfig, DEFAULT_DEPTH, DEFAULT_ROOT_HISTORY_SIZE, DEFAULT_ZERO_SEED, MAX_DEPTH,
    MAX_ROOT_HISTORY_SIZE,
};
pub use error::{AccumulatorError, Result};
pub use hasher::{AdditiveCompression, CompressionFunction};
pub use history::RootHistory;
pub use poseidon::PoseidonCompression;
pub use proof::MerklePath;
pub use reference::FixedMerkleTree;
pub use snapshot::TreeSnapshot;
pub use tree::{Insertion, MerkleTreeWithHistory};
pub use zeros::{zero_value_from_seed, ZeroHashes};

use ark_bn254::Fr;

/// Field the production tree works over
pub type ConstraintF = Fr;

/// Tree over BN254 with Poseidon node hashing
pub type PoseidonMerkleTree = MerkleTreeWithHistory<PoseidonCompression>;
