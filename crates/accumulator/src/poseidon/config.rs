//! Poseidon parameters over the BN254 scalar field.
//!
//! Width 3 (rate 2, capacity 1) so a single permutation absorbs one
//! left/right pair of tree nodes.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{find_poseidon_ark_and_mds, PoseidonConfig};
use ark_ff::PrimeField;

/// Full rounds, split evenly before and after the partial rounds.
pub const FULL_ROUNDS: usize = 8;

/// Partial rounds (S-box on the first state element only).
pub const PARTIAL_ROUNDS: usize = 57;

/// S-box exponent.
pub const ALPHA: u64 = 5;

/// Elements absorbed per permutation.
pub const RATE: usize = 2;

/// Hidden state elements.
pub const CAPACITY: usize = 1;

/// Build the sponge configuration used by [`super::PoseidonCompression`].
///
/// Round constants and the MDS matrix come from the Grain LFSR of the
/// Poseidon paper, seeded with the field size and round counts, so they are
/// reproducible by any implementation using the same parameters.
pub fn poseidon_config() -> PoseidonConfig<Fr> {
    let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
        u64::from(Fr::MODULUS_BIT_SIZE),
        RATE,
        FULL_ROUNDS as u64,
        PARTIAL_ROUNDS as u64,
        0,
    );

    PoseidonConfig {
        full_rounds: FULL_ROUNDS,
        partial_rounds: PARTIAL_ROUNDS,
        alpha: ALPHA,
        ark,
        mds,
        rate: RATE,
        capacity: CAPACITY,
    }
}
