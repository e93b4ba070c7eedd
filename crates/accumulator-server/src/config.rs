//! Server configuration from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use merkle_accumulator::TreeConfig;
use thiserror::Error;

/// Default listen address
pub const DEFAULT_ADDR: &str = "0.0.0.0:3002";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub tree: TreeConfig,
    /// Where the tree state is persisted; in-memory only when unset
    pub snapshot_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let addr_value = lookup("ACCUMULATOR_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .parse::<SocketAddr>()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                key: "ACCUMULATOR_ADDR",
                value: addr_value.clone(),
                reason: e.to_string(),
            })?;

        let mut tree = TreeConfig::default();
        if let Some(depth) = parse_usize(&lookup, "ACCUMULATOR_DEPTH")? {
            tree.depth = depth;
        }
        if let Some(roots_size) = parse_usize(&lookup, "ACCUMULATOR_ROOTS_SIZE")? {
            tree.roots_size = roots_size;
        }
        if let Some(seed) = lookup("ACCUMULATOR_ZERO_SEED") {
            tree.zero_seed = seed;
        }

        Ok(Self {
            addr,
            tree,
            snapshot_path: lookup("ACCUMULATOR_SNAPSHOT").map(PathBuf::from),
        })
    }
}

fn parse_usize<L>(lookup: &L, key: &'static str) -> Result<Option<usize>, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value.parse::<usize>().map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                key,
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR.parse().unwrap());
        assert_eq!(config.tree, TreeConfig::default());
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("ACCUMULATOR_ADDR", "127.0.0.1:9000"),
            ("ACCUMULATOR_DEPTH", "16"),
            ("ACCUMULATOR_ROOTS_SIZE", "100"),
            ("ACCUMULATOR_ZERO_SEED", "pool-a"),
            ("ACCUMULATOR_SNAPSHOT", "/tmp/tree.bin"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.tree.depth, 16);
        assert_eq!(config.tree.roots_size, 100);
        assert_eq!(config.tree.zero_seed, "pool-a");
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/tree.bin")));
    }

    #[test]
    fn test_bad_number_reported() {
        let err = ServerConfig::from_lookup(lookup_from(&[("ACCUMULATOR_DEPTH", "deep")]))
            .unwrap_err();
        assert!(err.to_string().contains("ACCUMULATOR_DEPTH"));
    }
}
