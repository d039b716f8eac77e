//! Per-item vector normalization applied before pairs are scored.
//!
//! Normalizers change values only; the key set of every vector is kept, so
//! common-user counts and admissibility are unaffected.

use crate::config::NormalizationKind;
use vectors::SparseVector;

/// Adjusts one item's rating vector
pub trait VectorNormalizer: Send + Sync {
    fn name(&self) -> &str;

    fn normalize(&self, ratings: &SparseVector) -> SparseVector;
}

impl NormalizationKind {
    pub fn strategy(self) -> Box<dyn VectorNormalizer> {
        match self {
            NormalizationKind::None => Box::new(IdentityNormalizer),
            NormalizationKind::MeanCentering => Box::new(MeanCenteringNormalizer),
        }
    }
}

/// Leaves ratings untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityNormalizer;

impl VectorNormalizer for IdentityNormalizer {
    fn name(&self) -> &str {
        "identity"
    }

    fn normalize(&self, ratings: &SparseVector) -> SparseVector {
        ratings.clone()
    }
}

/// Subtracts the item's mean rating from each of its ratings
///
/// Combined with cosine this gives the adjusted-cosine measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeanCenteringNormalizer;

impl VectorNormalizer for MeanCenteringNormalizer {
    fn name(&self) -> &str {
        "mean_centering"
    }

    fn normalize(&self, ratings: &SparseVector) -> SparseVector {
        match ratings.mean() {
            Some(mean) => ratings.map_values(|value| value - mean),
            None => SparseVector::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_centering() {
        let ratings = SparseVector::from_pairs(vec![(1, 5.0), (2, 3.0), (3, 4.0)]).unwrap();
        let centered = MeanCenteringNormalizer.normalize(&ratings);
        assert_eq!(centered.keys(), ratings.keys());
        assert_eq!(centered.values(), &[1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_mean_centering_empty_vector() {
        assert!(MeanCenteringNormalizer.normalize(&SparseVector::new()).is_empty());
    }

    #[test]
    fn test_identity() {
        let ratings = SparseVector::from_pairs(vec![(4, 2.0)]).unwrap();
        assert_eq!(IdentityNormalizer.normalize(&ratings), ratings);
        assert_eq!(NormalizationKind::None.strategy().name(), "identity");
    }
}
