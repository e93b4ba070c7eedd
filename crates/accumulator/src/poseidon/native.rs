//! Native Poseidon compression for tree nodes.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::CryptographicSponge;

use super::config::poseidon_config;
use crate::hasher::CompressionFunction;

/// Poseidon sponge over BN254 used as the tree's node hash.
///
/// The parameters are built once here and shared by every call.
#[derive(Clone, Debug)]
pub struct PoseidonCompression {
    config: PoseidonConfig<Fr>,
}

impl PoseidonCompression {
    pub fn new() -> Self {
        Self {
            config: poseidon_config(),
        }
    }

    /// Absorb `inputs` in order and squeeze a single element.
    pub fn hash_elements(&self, inputs: &[Fr]) -> Fr {
        let mut sponge = PoseidonSponge::new(&self.config);
        for input in inputs {
            sponge.absorb(input);
        }
        sponge.squeeze_field_elements::<Fr>(1)[0]
    }

    pub fn config(&self) -> &PoseidonConfig<Fr> {
        &self.config
    }
}

impl Default for PoseidonCompression {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionFunction for PoseidonCompression {
    type Field = Fr;

    fn combine2(&self, left: Fr, right: Fr) -> Fr {
        self.hash_elements(&[left, right])
    }

    fn combine3(&self, a: Fr, b: Fr, c: Fr) -> Fr {
        self.hash_elements(&[a, b, c])
    }
}
