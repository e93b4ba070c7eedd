//! Membership path for a single leaf.

use ark_ff::PrimeField;

use crate::hasher::CompressionFunction;

/// Sibling hashes from the leaf level up to just below the root, plus the
/// side the path node sits on at each level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerklePath<F: PrimeField> {
    /// Sibling hashes from leaf level (0) to root level (depth-1)
    siblings: Vec<F>,

    /// Direction at each level: true = current node is right child
    indices: Vec<bool>,
}

impl<F: PrimeField> MerklePath<F> {
    pub fn new(siblings: Vec<F>, indices: Vec<bool>) -> Self {
        assert_eq!(
            siblings.len(),
            indices.len(),
            "Siblings and indices must have same length"
        );
        Self { siblings, indices }
    }

    pub fn siblings(&self) -> &[F] {
        &self.siblings
    }

    pub fn indices(&self) -> &[bool] {
        &self.indices
    }

    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Leaf position encoded by the direction bits.
    pub fn leaf_index(&self) -> u64 {
        self.indices
            .iter()
            .enumerate()
            .filter(|(_, is_right)| **is_right)
            .fold(0u64, |acc, (level, _)| acc | (1u64 << level))
    }

    /// Fold `leaf` up the path.
    pub fn compute_root<H>(&self, hasher: &H, leaf: F) -> F
    where
        H: CompressionFunction<Field = F>,
    {
        self.siblings
            .iter()
            .zip(self.indices.iter())
            .fold(leaf, |current, (sibling, &is_right)| {
                if is_right {
                    hasher.combine2(*sibling, current)
                } else {
                    hasher.combine2(current, *sibling)
                }
            })
    }

    pub fn verify<H>(&self, hasher: &H, leaf: F, root: F) -> bool
    where
        H: CompressionFunction<Field = F>,
    {
        self.compute_root(hasher, leaf) == root
    }
}

#[cfg(test)]
mod proof_tests {
    use super::*;
    use crate::hasher::AdditiveCompression;
    use crate::poseidon::PoseidonCompression;
    use ark_bn254::Fr;

    #[test]
    fn test_path_structure() {
        let siblings = vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];
        let indices = vec![false, true, true];

        let path = MerklePath::new(siblings.clone(), indices.clone());

        assert_eq!(path.depth(), 3);
        assert_eq!(path.siblings(), &siblings);
        assert_eq!(path.indices(), &indices);
        assert_eq!(path.leaf_index(), 6);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_mismatched_lengths_panic() {
        MerklePath::new(vec![Fr::from(1u64)], vec![]);
    }

    #[test]
    fn test_compute_root_additive() {
        let hasher = AdditiveCompression::<Fr>::new();
        let path = MerklePath::new(vec![Fr::from(1u64), Fr::from(2u64)], vec![false, true]);
        assert_eq!(path.compute_root(&hasher, Fr::from(10u64)), Fr::from(13u64));
    }

    #[test]
    fn test_direction_changes_root() {
        let hasher = PoseidonCompression::new();
        let siblings = vec![Fr::from(1u64), Fr::from(2u64)];
        let left = MerklePath::new(siblings.clone(), vec![false, false]);
        let right = MerklePath::new(siblings, vec![true, false]);

        let leaf = Fr::from(100u64);
        assert_ne!(left.compute_root(&hasher, leaf), right.compute_root(&hasher, leaf));
        assert!(left.verify(&hasher, leaf, left.compute_root(&hasher, leaf)));
        assert!(!left.verify(&hasher, Fr::from(101u64), left.compute_root(&hasher, leaf)));
    }
}
