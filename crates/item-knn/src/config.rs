//! Build-time configuration.
//!
//! All parameters are fixed for the duration of one build. A `BuildConfig`
//! can be constructed in code with the `with_*` setters or parsed from JSON:
//!
//! ```
//! use item_knn::{BuildConfig, SimilarityKind};
//!
//! let config = BuildConfig::from_json(
//!     r#"{ "min_common_users": 2, "neighborhood_size": 30, "similarity": "pearson" }"#,
//! ).unwrap();
//! assert_eq!(config.min_common_users, 2);
//! assert_eq!(config.similarity, SimilarityKind::Pearson);
//! ```

use crate::error::{BuildError, Result};
use serde::{Deserialize, Serialize};

/// Default minimum number of common raters for a pair to be scored
pub const DEFAULT_MIN_COMMON_USERS: usize = 0;

/// Default maximum number of neighbors kept per item
pub const DEFAULT_NEIGHBORHOOD_SIZE: usize = 20;

/// Which similarity measure scores admitted pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKind {
    /// Cosine over the common users
    #[default]
    Cosine,
    /// Pearson correlation over the common users
    Pearson,
    /// Share of the left item's raters who also rated the right item
    ConditionalProbability,
}

/// How item vectors are adjusted before pairs are scored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationKind {
    #[default]
    None,
    /// Subtract each item's mean rating
    MeanCentering,
}

/// Parameters for one similarity build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Pairs with fewer common raters than this are never scored
    pub min_common_users: usize,

    /// Maximum neighbors retained per item; must be positive
    pub neighborhood_size: usize,

    /// Run on a dedicated pool of this many threads instead of the global one
    pub worker_threads: Option<usize>,

    pub similarity: SimilarityKind,

    pub normalization: NormalizationKind,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            min_common_users: DEFAULT_MIN_COMMON_USERS,
            neighborhood_size: DEFAULT_NEIGHBORHOOD_SIZE,
            worker_threads: None,
            similarity: SimilarityKind::default(),
            normalization: NormalizationKind::default(),
        }
    }
}

impl BuildConfig {
    /// Configuration with the given neighborhood size and defaults elsewhere
    pub fn new(neighborhood_size: usize) -> Self {
        Self {
            neighborhood_size,
            ..Self::default()
        }
    }

    /// Configure the minimum number of common raters (default: 0)
    pub fn with_min_common_users(mut self, min_common_users: usize) -> Self {
        self.min_common_users = min_common_users;
        self
    }

    /// Configure the number of neighbors kept per item (default: 20)
    pub fn with_neighborhood_size(mut self, neighborhood_size: usize) -> Self {
        self.neighborhood_size = neighborhood_size;
        self
    }

    /// Run the build on a dedicated pool of `threads` workers
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn with_similarity(mut self, similarity: SimilarityKind) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn with_normalization(mut self, normalization: NormalizationKind) -> Self {
        self.normalization = normalization;
        self
    }

    /// Parse and validate a JSON configuration document
    ///
    /// Missing fields take their defaults. Unknown fields and negative
    /// numbers are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BuildConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in range
    pub fn validate(&self) -> Result<()> {
        if self.neighborhood_size == 0 {
            return Err(BuildError::InvalidConfig {
                field: "neighborhood_size",
                reason: "must be positive".to_string(),
            });
        }
        if self.worker_threads == Some(0) {
            return Err(BuildError::InvalidConfig {
                field: "worker_threads",
                reason: "must be positive when set".to_string(),
            });
        }
        Ok(())
    }

    /// Whether a pair with `common_users` shared raters gets scored
    ///
    /// A pair without any shared rater is never admissible, whatever the
    /// threshold.
    pub fn is_admissible(&self, common_users: usize) -> bool {
        common_users > 0 && common_users >= self.min_common_users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.min_common_users, 0);
        assert_eq!(config.neighborhood_size, 20);
        assert_eq!(config.worker_threads, None);
        assert_eq!(config.similarity, SimilarityKind::Cosine);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_neighborhood_is_rejected() {
        let err = BuildConfig::new(0).validate().unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidConfig {
                field: "neighborhood_size",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_worker_threads_is_rejected() {
        let config = BuildConfig::new(5).with_worker_threads(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = BuildConfig::from_json(r#"{ "neighborhood_size": 7 }"#).unwrap();
        assert_eq!(config, BuildConfig::new(7));
    }

    #[test]
    fn test_from_json_reads_strategies() {
        let config = BuildConfig::from_json(
            r#"{ "similarity": "conditional_probability", "normalization": "mean_centering" }"#,
        )
        .unwrap();
        assert_eq!(config.similarity, SimilarityKind::ConditionalProbability);
        assert_eq!(config.normalization, NormalizationKind::MeanCentering);
    }

    #[test]
    fn test_from_json_rejects_negative_threshold() {
        let err = BuildConfig::from_json(r#"{ "min_common_users": -1 }"#).unwrap_err();
        assert!(matches!(err, BuildError::ConfigParse(_)));
    }

    #[test]
    fn test_from_json_rejects_unknown_field() {
        assert!(BuildConfig::from_json(r#"{ "min_users": 3 }"#).is_err());
    }

    #[test]
    fn test_from_json_validates() {
        let err = BuildConfig::from_json(r#"{ "neighborhood_size": 0 }"#).unwrap_err();
        assert!(matches!(err, BuildError::InvalidConfig { .. }));
    }

    #[test]
    fn test_admissibility_threshold() {
        let config = BuildConfig::default().with_min_common_users(3);
        assert!(!config.is_admissible(2));
        assert!(config.is_admissible(3));
        assert!(config.is_admissible(10));
    }

    #[test]
    fn test_zero_common_users_never_admissible() {
        for threshold in 0..4 {
            let config = BuildConfig::default().with_min_common_users(threshold);
            assert!(!config.is_admissible(0));
        }
    }

    #[test]
    fn test_threshold_monotonicity() {
        // a pair admissible at k stays admissible at every lower threshold
        for common in 0..6 {
            for k in 0..8 {
                let at_k = BuildConfig::default().with_min_common_users(k).is_admissible(common);
                if at_k {
                    for lower in 0..=k {
                        assert!(
                            BuildConfig::default()
                                .with_min_common_users(lower)
                                .is_admissible(common)
                        );
                    }
                }
                if k > common {
                    assert!(!at_k);
                }
            }
        }
    }
}
