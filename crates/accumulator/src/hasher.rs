//! Hash adapter seam between the tree engine and the node compression function.
//!
//! The engine never calls a concrete hash. It only sees [`CompressionFunction`],
//! so the production Poseidon adapter and cheap test stand-ins are
//! interchangeable without touching insertion logic.

use std::fmt;
use std::marker::PhantomData;

use ark_ff::PrimeField;

/// Two-to-one and three-to-one compression over a prime field.
///
/// Implementations must be pure and deterministic: the same inputs always
/// produce the same output, and no call has side effects.
pub trait CompressionFunction: Send + Sync {
    /// Field that leaves, nodes and roots live in.
    type Field: PrimeField;

    /// Parent of a `left` and `right` child.
    fn combine2(&self, left: Self::Field, right: Self::Field) -> Self::Field;

    /// Compress three elements into one.
    fn combine3(&self, a: Self::Field, b: Self::Field, c: Self::Field) -> Self::Field;
}

/// Field addition standing in for a real permutation.
///
/// Not collision resistant. Useful for brute-force cross-checks where only the
/// shape of the tree matters.
pub struct AdditiveCompression<F> {
    _field: PhantomData<F>,
}

impl<F> AdditiveCompression<F> {
    pub fn new() -> Self {
        Self {
            _field: PhantomData,
        }
    }
}

impl<F> Default for AdditiveCompression<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Clone for AdditiveCompression<F> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for AdditiveCompression<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdditiveCompression")
    }
}

impl<F: PrimeField> CompressionFunction for AdditiveCompression<F> {
    type Field = F;

    fn combine2(&self, left: F, right: F) -> F {
        left + right
    }

    fn combine3(&self, a: F, b: F, c: F) -> F {
        a + b + c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn test_additive_combine() {
        let hasher = AdditiveCompression::<Fr>::new();
        assert_eq!(hasher.combine2(Fr::from(2u64), Fr::from(3u64)), Fr::from(5u64));
        assert_eq!(
            hasher.combine3(Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)),
            Fr::from(6u64)
        );
    }

    #[test]
    fn test_additive_wraps_modulus() {
        let hasher = AdditiveCompression::<Fr>::new();
        let minus_one = -Fr::from(1u64);
        assert_eq!(hasher.combine2(minus_one, Fr::from(1u64)), Fr::from(0u64));
    }
}
