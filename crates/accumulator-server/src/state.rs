//! Shared tree state and its on-disk snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use merkle_accumulator::{
    zero_value_from_seed, ConstraintF, Insertion, PoseidonCompression, PoseidonMerkleTree,
    TreeConfig, TreeSnapshot,
};
use tokio::sync::RwLock;

use crate::error::ApiError;

/// Single writer, many readers. Inserts hold the write lock until the new
/// state is both persisted and swapped in.
pub type SharedState = Arc<RwLock<AppState>>;

/// Application state shared across handlers
pub struct AppState {
    pub tree: PoseidonMerkleTree,
    pub snapshot_path: Option<PathBuf>,
}

impl AppState {
    /// Resume from `snapshot_path` when the file exists, else start empty.
    ///
    /// A snapshot built with a different depth, history size or zero seed
    /// than `config` is refused.
    pub fn load_or_create(config: &TreeConfig, snapshot_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let tree = match snapshot_path.as_deref() {
            Some(path) if path.exists() => {
                let snapshot = TreeSnapshot::<ConstraintF>::from_bytes(&std::fs::read(path)?)?;
                let tree = PoseidonMerkleTree::restore(PoseidonCompression::new(), snapshot)?;
                check_matches_config(&tree, config)?;
                tracing::info!(?path, leaves = tree.leaf_count(), "loaded tree snapshot");
                tree
            }
            _ => PoseidonMerkleTree::new(PoseidonCompression::new(), config)?,
        };

        Ok(Self {
            tree,
            snapshot_path,
        })
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Insert into a copy, persist the copy, then commit it. A failed write
    /// leaves the served tree untouched.
    pub fn insert(&mut self, leaf: ConstraintF) -> Result<Insertion<ConstraintF>, ApiError> {
        let mut next = self.tree.clone();
        let insertion = next.insert(leaf)?;

        if let Some(path) = &self.snapshot_path {
            write_snapshot(path, &next)?;
        }

        self.tree = next;
        Ok(insertion)
    }
}

fn check_matches_config(tree: &PoseidonMerkleTree, config: &TreeConfig) -> Result<(), ApiError> {
    let mismatch = |field, found: String, configured: String| ApiError::ConfigMismatch {
        field,
        found,
        configured,
    };

    if tree.depth() != config.depth {
        return Err(mismatch("depth", tree.depth().to_string(), config.depth.to_string()));
    }
    if tree.roots_size() != config.roots_size {
        return Err(mismatch(
            "roots_size",
            tree.roots_size().to_string(),
            config.roots_size.to_string(),
        ));
    }
    let zero_value: ConstraintF = zero_value_from_seed(config.zero_seed.as_bytes());
    if tree.zero_value() != zero_value {
        return Err(mismatch(
            "zero value",
            tree.zero_value().to_string(),
            format!("{} (seed {:?})", zero_value, config.zero_seed),
        ));
    }
    Ok(())
}

/// Write to a sibling temp file and rename over the target.
fn write_snapshot(path: &Path, tree: &PoseidonMerkleTree) -> Result<(), ApiError> {
    let bytes = tree.snapshot().to_bytes()?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
