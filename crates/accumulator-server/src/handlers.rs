//! HTTP request handlers for the accumulator.

use ark_ff::{BigInteger, PrimeField};
use ark_serialize::CanonicalDeserialize;
use axum::{
    extract::{Path, State},
    Json,
};
use merkle_accumulator::ConstraintF;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::SharedState;

/// Parse a `0x`-prefixed 32-byte big-endian hex string. Values at or above
/// the field modulus are rejected rather than reduced.
pub fn parse_field(hex_str: &str) -> Result<ConstraintF, ApiError> {
    let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let mut bytes = hex::decode(digits).map_err(|e| ApiError::InvalidField(format!("invalid hex: {}", e)))?;

    if bytes.len() != 32 {
        return Err(ApiError::InvalidField(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }

    bytes.reverse();
    ConstraintF::deserialize_compressed(&bytes[..])
        .map_err(|_| ApiError::InvalidField("value is not below the field modulus".to_string()))
}

/// Serialize a field element as `0x`-prefixed 32-byte big-endian hex.
pub fn format_field(value: &ConstraintF) -> String {
    format!("0x{}", hex::encode(value.into_bigint().to_bytes_be()))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ============ Tree info ============

#[derive(Serialize, Deserialize)]
pub struct TreeInfoResponse {
    pub depth: usize,
    pub roots_size: usize,
    pub leaf_count: u64,
    pub capacity: u64,
    pub history_length: usize,
    pub last_root: String,
}

pub async fn tree_info(State(state): State<SharedState>) -> Json<TreeInfoResponse> {
    let state = state.read().await;
    let tree = &state.tree;

    Json(TreeInfoResponse {
        depth: tree.depth(),
        roots_size: tree.roots_size(),
        leaf_count: tree.leaf_count(),
        capacity: tree.capacity(),
        history_length: tree.root_history_length(),
        last_root: format_field(&tree.last_root()),
    })
}

// ============ Insert ============

#[derive(Deserialize)]
pub struct InsertRequest {
    pub leaf: String,
}

#[derive(Serialize, Deserialize)]
pub struct InsertResponse {
    pub index: u64,
    pub root: String,
}

pub async fn insert_leaf(
    State(state): State<SharedState>,
    Json(req): Json<InsertRequest>,
) -> Result<Json<InsertResponse>, ApiError> {
    let leaf = parse_field(&req.leaf)?;

    let mut state = state.write().await;
    let insertion = state.insert(leaf)?;
    tracing::info!(index = insertion.index, "leaf appended");

    Ok(Json(InsertResponse {
        index: insertion.index,
        root: format_field(&insertion.root),
    }))
}

// ============ Roots ============

#[derive(Serialize, Deserialize)]
pub struct RootResponse {
    pub root: String,
}

pub async fn last_root(State(state): State<SharedState>) -> Json<RootResponse> {
    let state = state.read().await;
    Json(RootResponse {
        root: format_field(&state.tree.last_root()),
    })
}

#[derive(Serialize, Deserialize)]
pub struct RootAtOffsetResponse {
    pub offset: usize,
    /// `None` when the tree has fewer roots than `offset + 1`
    pub root: Option<String>,
}

pub async fn root_at_offset(
    State(state): State<SharedState>,
    Path(offset): Path<usize>,
) -> Result<Json<RootAtOffsetResponse>, ApiError> {
    let state = state.read().await;
    let root = state.tree.root_at_offset(offset)?;

    Ok(Json(RootAtOffsetResponse {
        offset,
        root: root.as_ref().map(format_field),
    }))
}

#[derive(Deserialize)]
pub struct KnownRootRequest {
    pub root: String,
}

#[derive(Serialize, Deserialize)]
pub struct KnownRootResponse {
    pub known: bool,
}

pub async fn is_known_root(
    State(state): State<SharedState>,
    Json(req): Json<KnownRootRequest>,
) -> Result<Json<KnownRootResponse>, ApiError> {
    let root = parse_field(&req.root)?;
    let state = state.read().await;

    Ok(Json(KnownRootResponse {
        known: state.tree.is_known_root(&root),
    }))
}

// ============ Levels ============

#[derive(Serialize, Deserialize)]
pub struct LevelResponse {
    pub level: usize,
    pub zero: String,
    pub filled_subtree: String,
}

pub async fn level(
    State(state): State<SharedState>,
    Path(level): Path<usize>,
) -> Result<Json<LevelResponse>, ApiError> {
    let state = state.read().await;
    let filled_subtree = state.tree.filled_subtree_at(level)?;
    let zero = state.tree.zero_at(level)?;

    Ok(Json(LevelResponse {
        level,
        zero: format_field(&zero),
        filled_subtree: format_field(&filled_subtree),
    }))
}
