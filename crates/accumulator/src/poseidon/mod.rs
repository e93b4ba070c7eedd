//! Poseidon hash over BN254, the production node compression function.
//!
//! Built on the arkworks Poseidon sponge with rate 2, so each parent hash
//! costs a single permutation inside a circuit.

mod config;
mod native;


pub use config::{poseidon_config, ALPHA, CAPACITY, FULL_ROUNDS, PARTIAL_ROUNDS, RATE};
pub use native::PoseidonCompression;
