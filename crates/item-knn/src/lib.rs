//! # Item-KNN Crate
//!
//! Builds the item-to-item similarity model behind neighborhood-based
//! recommendations: every item is mapped to its most similar items, ranked
//! and capped at a fixed neighborhood size.
//!
//! ## Components
//!
//! - **ratings**: `RatingMatrix`, the read-only item → user-rating vectors
//! - **config**: `BuildConfig` with the common-user threshold and
//!   neighborhood size
//! - **similarity** / **normalize**: pluggable scoring and pre-processing
//! - **accumulate**: parallel pair enumeration with the admission threshold
//! - **truncate**: deterministic ranking and top-K cut
//! - **builder**: `SimilarityBuilder`, which runs one build end to end
//! - **model**: the finalized, immutable `SimilarityModel`
//!
//! ## Example Usage
//!
//! ```
//! use item_knn::{build_model, BuildConfig, Rating, RatingMatrix};
//!
//! let ratings = RatingMatrix::from_ratings(vec![
//!     Rating::new(1, 100, 5.0),
//!     Rating::new(2, 100, 3.0),
//!     Rating::new(1, 200, 4.0),
//!     Rating::new(2, 200, 2.0),
//! ]).unwrap();
//!
//! let model = build_model(&ratings, BuildConfig::new(10)).unwrap();
//! for (neighbor, score) in model.neighbors(100) {
//!     println!("{neighbor}: {score:.3}");
//! }
//! ```

pub mod accumulate;
pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod ratings;
pub mod similarity;
pub mod truncate;

// Re-export commonly used types
pub use accumulate::{CandidateSet, PairStats, accumulate_candidates};
pub use builder::{BuildState, CancelToken, SimilarityBuilder, build_model};
pub use config::{BuildConfig, NormalizationKind, SimilarityKind};
pub use error::{BuildError, Result};
pub use model::SimilarityModel;
pub use normalize::{IdentityNormalizer, MeanCenteringNormalizer, VectorNormalizer};
pub use ratings::{Rating, RatingMatrix};
pub use similarity::{
    ConditionalProbability, CosineSimilarity, PearsonCorrelation, VectorSimilarity,
};
pub use truncate::{compare_candidates, truncate_all, truncate_neighborhood};

pub use vectors::{Id, ScoredIdList, SparseVector, UNDEFINED_SCORE, is_undefined};
