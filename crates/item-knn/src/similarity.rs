//! Similarity measures for admitted item pairs.
//!
//! Measures only ever see pairs that passed the common-user threshold, and
//! receive the precomputed [`Overlap`] so they can work on the values
//! restricted to the shared users without repeating the merge.
//!
//! A measure that cannot produce a number (zero norm, zero variance) returns
//! a non-finite value; the builder records that as
//! [`UNDEFINED_SCORE`](vectors::UNDEFINED_SCORE) and keeps the candidate.

use crate::config::SimilarityKind;
use vectors::{Overlap, SparseVector, UNDEFINED_SCORE};

/// Scores the similarity of two item rating vectors
///
/// ## Design Note
/// `Send + Sync` lets one instance be shared by every worker of a build.
pub trait VectorSimilarity: Send + Sync {
    /// Returns the name of this measure (for logging)
    fn name(&self) -> &str;

    /// Similarity of `left` to `right`
    ///
    /// `overlap` is `left.overlap(right)` and is never empty.
    fn similarity(&self, left: &SparseVector, right: &SparseVector, overlap: &Overlap) -> f64;

    /// Whether `similarity(a, b) == similarity(b, a)` for all inputs
    ///
    /// Symmetric measures are evaluated once per unordered pair and the
    /// score is recorded in both directions.
    fn is_symmetric(&self) -> bool {
        true
    }
}

impl<S: VectorSimilarity + ?Sized> VectorSimilarity for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn similarity(&self, left: &SparseVector, right: &SparseVector, overlap: &Overlap) -> f64 {
        (**self).similarity(left, right, overlap)
    }

    fn is_symmetric(&self) -> bool {
        (**self).is_symmetric()
    }
}

impl SimilarityKind {
    /// Default-parameterised measure for this kind
    pub fn strategy(self) -> Box<dyn VectorSimilarity> {
        match self {
            SimilarityKind::Cosine => Box::new(CosineSimilarity::new()),
            SimilarityKind::Pearson => Box::new(PearsonCorrelation),
            SimilarityKind::ConditionalProbability => Box::new(ConditionalProbability),
        }
    }
}

fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

/// Cosine of the two vectors restricted to their common users
///
/// `damping` is added to the denominator, shrinking scores of pairs with
/// small norms towards zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CosineSimilarity {
    damping: f64,
}

impl CosineSimilarity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the denominator damping (default: 0.0)
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }
}

impl VectorSimilarity for CosineSimilarity {
    fn name(&self) -> &str {
        "cosine"
    }

    fn similarity(&self, _left: &SparseVector, _right: &SparseVector, overlap: &Overlap) -> f64 {
        let dot: f64 = overlap.iter().map(|(_, l, r)| l * r).sum();
        let denominator = sum_of_squares(overlap.left()).sqrt()
            * sum_of_squares(overlap.right()).sqrt()
            + self.damping;

        if denominator == 0.0 {
            UNDEFINED_SCORE
        } else {
            dot / denominator
        }
    }
}

/// Pearson correlation over the common users
///
/// Each side is centered on its own mean over the common users only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PearsonCorrelation;

impl VectorSimilarity for PearsonCorrelation {
    fn name(&self) -> &str {
        "pearson"
    }

    fn similarity(&self, _left: &SparseVector, _right: &SparseVector, overlap: &Overlap) -> f64 {
        let n = overlap.len() as f64;
        let left_mean = overlap.left().iter().sum::<f64>() / n;
        let right_mean = overlap.right().iter().sum::<f64>() / n;

        let (mut covariance, mut left_variance, mut right_variance) = (0.0, 0.0, 0.0);
        for (_, l, r) in overlap.iter() {
            let dl = l - left_mean;
            let dr = r - right_mean;
            covariance += dl * dr;
            left_variance += dl * dl;
            right_variance += dr * dr;
        }

        let denominator = left_variance.sqrt() * right_variance.sqrt();
        if denominator == 0.0 {
            UNDEFINED_SCORE
        } else {
            covariance / denominator
        }
    }
}

/// Fraction of the left item's raters who also rated the right item
///
/// Asymmetric: a niche item bought by fans of a blockbuster scores high
/// towards the blockbuster, not the other way round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionalProbability;

impl VectorSimilarity for ConditionalProbability {
    fn name(&self) -> &str {
        "conditional_probability"
    }

    fn similarity(&self, left: &SparseVector, _right: &SparseVector, overlap: &Overlap) -> f64 {
        overlap.len() as f64 / left.len() as f64
    }

    fn is_symmetric(&self) -> bool {
        false
    }
}
