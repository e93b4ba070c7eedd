//! Everything needed to resume a tree exactly where it stopped.

use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::config::TreeConfig;
// The serialize derives spell out `Result<_, SerializationError>`, so the
// crate's one-argument alias stays out of scope here.
use crate::error::AccumulatorError;

/// Persisted tree state.
///
/// Zero hashes are not stored; they are rebuilt from `zero_value` and the
/// hasher on restore. The history ring's current slot is implied by
/// `next_index mod roots_size`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct TreeSnapshot<F: PrimeField> {
    pub depth: u32,
    pub roots_size: u32,
    pub zero_value: F,
    pub next_index: u64,
    /// Level 0 first
    pub filled_subtrees: Vec<F>,
    /// Ring slots in storage order
    pub roots: Vec<Option<F>>,
}

impl<F: PrimeField> TreeSnapshot<F> {
    /// Encode with the compressed canonical encoding.
    pub fn to_bytes(&self) -> crate::error::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.compressed_size());
        self.serialize_compressed(&mut bytes)
            .map_err(|e| AccumulatorError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> crate::error::Result<Self> {
        Self::deserialize_compressed(bytes)
            .map_err(|e| AccumulatorError::Serialization(e.to_string()))
    }

    /// Ring slot holding the latest root.
    pub fn current_root_index(&self) -> usize {
        (self.next_index % u64::from(self.roots_size.max(1))) as usize
    }

    /// Structural checks that do not need the hasher.
    pub(crate) fn check_consistency(&self) -> crate::error::Result<()> {
        let depth = self.depth as usize;
        let roots_size = self.roots_size as usize;

        TreeConfig::new(depth, roots_size)
            .validate()
            .map_err(|e| invalid(e.to_string()))?;

        if self.filled_subtrees.len() != depth {
            return Err(invalid(format!(
                "expected {} filled subtrees, found {}",
                depth,
                self.filled_subtrees.len()
            )));
        }
        if self.roots.len() != roots_size {
            return Err(invalid(format!(
                "expected {} history slots, found {}",
                roots_size,
                self.roots.len()
            )));
        }

        let capacity = crate::capacity::capacity_for_depth(depth);
        if self.next_index > capacity {
            return Err(invalid(format!(
                "next index {} exceeds capacity {}",
                self.next_index, capacity
            )));
        }

        // Written slots must be exactly the run ending at the current slot.
        let expected = (self.next_index + 1).min(roots_size as u64) as usize;
        let current = self.current_root_index();
        for back in 0..roots_size {
            let slot = (current + roots_size - back) % roots_size;
            let written = self.roots[slot].is_some();
            if written != (back < expected) {
                return Err(invalid(format!(
                    "history slot {} is {}, expected {} written slots ending at slot {}",
                    slot,
                    if written { "written" } else { "empty" },
                    expected,
                    current
                )));
            }
        }

        Ok(())
    }
}

fn invalid(reason: String) -> AccumulatorError {
    AccumulatorError::InvalidSnapshot(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    fn sample() -> TreeSnapshot<Fr> {
        TreeSnapshot {
            depth: 2,
            roots_size: 3,
            zero_value: Fr::from(9u64),
            next_index: 1,
            filled_subtrees: vec![Fr::from(5u64), Fr::from(18u64)],
            roots: vec![Some(Fr::from(36u64)), Some(Fr::from(41u64)), None],
        }
    }

    #[test]
    fn test_bytes_survive_decode() {
        let snapshot = sample();
        let bytes = snapshot.to_bytes().unwrap();
        assert_eq!(TreeSnapshot::<Fr>::from_bytes(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_truncated_bytes_rejected() {
        let bytes = sample().to_bytes().unwrap();
        let err = TreeSnapshot::<Fr>::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, AccumulatorError::Serialization(_)));
    }

    #[test]
    fn test_consistency_checks() {
        assert!(sample().check_consistency().is_ok());

        let mut wrong_levels = sample();
        wrong_levels.filled_subtrees.pop();
        assert!(wrong_levels.check_consistency().is_err());

        let mut wrong_slots = sample();
        wrong_slots.roots[2] = Some(Fr::from(1u64));
        assert!(wrong_slots.check_consistency().is_err());

        // right count, but not contiguous with the current slot
        let mut gapped = TreeSnapshot {
            depth: 3,
            roots_size: 5,
            zero_value: Fr::from(9u64),
            next_index: 2,
            filled_subtrees: vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)],
            roots: vec![
                Some(Fr::from(40u64)),
                None,
                Some(Fr::from(41u64)),
                Some(Fr::from(42u64)),
                None,
            ],
        };
        assert!(matches!(
            gapped.check_consistency(),
            Err(AccumulatorError::InvalidSnapshot(_))
        ));
        gapped.roots = vec![
            Some(Fr::from(40u64)),
            Some(Fr::from(41u64)),
            Some(Fr::from(42u64)),
            None,
            None,
        ];
        assert!(gapped.check_consistency().is_ok());

        // wrapped past the end of the ring, every slot written
        let mut wrapped = gapped.clone();
        wrapped.next_index = 6;
        wrapped.roots = vec![
            Some(Fr::from(50u64)),
            Some(Fr::from(51u64)),
            Some(Fr::from(52u64)),
            Some(Fr::from(53u64)),
            Some(Fr::from(54u64)),
        ];
        assert!(wrapped.check_consistency().is_ok());

        let mut overfull = sample();
        overfull.next_index = 5;
        assert!(overfull.check_consistency().is_err());
    }
}
