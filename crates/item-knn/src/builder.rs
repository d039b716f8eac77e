//! The similarity builder and its lifecycle.
//!
//! A [`SimilarityBuilder`] runs exactly one build and moves through
//!
//! ```text
//! Initialized -> AccumulatingPairs -> Truncating -> Finalized
//!        \               |                 |
//!         +--------------+-----------------+--> Discarded
//! ```
//!
//! Any error (bad configuration, cancellation) ends in `Discarded` and
//! nothing is returned; only `Finalized` hands out a model.

use crate::accumulate::accumulate_candidates;
use crate::config::BuildConfig;
use crate::error::{BuildError, Result};
use crate::model::SimilarityModel;
use crate::normalize::VectorNormalizer;
use crate::ratings::RatingMatrix;
use crate::similarity::VectorSimilarity;
use crate::truncate::truncate_all;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Lifecycle state of a [`SimilarityBuilder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Holds configuration only
    Initialized,
    /// Scoring item pairs into candidate lists
    AccumulatingPairs,
    /// Ranking and cutting candidate lists
    Truncating,
    /// A model was published
    Finalized,
    /// The build failed or was cancelled; no model was published
    Discarded,
}

/// Shared flag used to abort a running build
///
/// Clones observe the same flag, so a clone can be handed to another thread
/// and cancelled from there.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Builds a [`SimilarityModel`] from a [`RatingMatrix`]
///
/// ## Usage
/// ```
/// use item_knn::{BuildConfig, Rating, RatingMatrix, SimilarityBuilder};
///
/// let ratings = RatingMatrix::from_ratings(vec![
///     Rating::new(1, 10, 5.0),
///     Rating::new(1, 20, 4.0),
///     Rating::new(2, 10, 3.0),
///     Rating::new(2, 20, 2.0),
/// ]).unwrap();
///
/// let mut builder = SimilarityBuilder::new(BuildConfig::new(5).with_min_common_users(2));
/// let model = builder.build(&ratings).unwrap();
/// assert_eq!(model.neighbors(10).ids(), &[20]);
/// ```
pub struct SimilarityBuilder {
    config: BuildConfig,
    similarity: Box<dyn VectorSimilarity>,
    normalizer: Box<dyn VectorNormalizer>,
    state: BuildState,
    cancel: CancelToken,
}

impl SimilarityBuilder {
    /// Create a builder using the strategies named in `config`
    pub fn new(config: BuildConfig) -> Self {
        Self {
            similarity: config.similarity.strategy(),
            normalizer: config.normalization.strategy(),
            config,
            state: BuildState::Initialized,
            cancel: CancelToken::new(),
        }
    }

    /// Replace the similarity measure (builder pattern)
    pub fn with_similarity(mut self, similarity: impl VectorSimilarity + 'static) -> Self {
        self.similarity = Box::new(similarity);
        self
    }

    /// Replace the vector normalizer (builder pattern)
    pub fn with_normalizer(mut self, normalizer: impl VectorNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Token that aborts this builder's run when cancelled
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the build over `ratings`
    ///
    /// The configuration is validated first, before any pair is processed.
    /// A builder runs once: calling `build` again fails with
    /// [`BuildError::InvalidState`].
    #[instrument(
        skip_all,
        fields(
            items = ratings.len(),
            min_common_users = self.config.min_common_users,
            neighborhood_size = self.config.neighborhood_size,
        )
    )]
    pub fn build(&mut self, ratings: &RatingMatrix) -> Result<SimilarityModel> {
        if self.state != BuildState::Initialized {
            return Err(BuildError::InvalidState {
                expected: BuildState::Initialized,
                found: self.state,
            });
        }

        match self.run(ratings) {
            Ok(model) => {
                self.state = BuildState::Finalized;
                Ok(model)
            }
            Err(error) => {
                warn!("Discarding similarity build in {:?}: {}", self.state, error);
                self.state = BuildState::Discarded;
                Err(error)
            }
        }
    }

    fn run(&mut self, ratings: &RatingMatrix) -> Result<SimilarityModel> {
        self.config.validate()?;

        match self.config.worker_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| self.run_phases(ratings))
            }
            None => self.run_phases(ratings),
        }
    }

    fn run_phases(&mut self, ratings: &RatingMatrix) -> Result<SimilarityModel> {
        let start = Instant::now();

        self.state = BuildState::AccumulatingPairs;
        info!(
            "Accumulating pairs over {} items ({} ratings) with {} similarity",
            ratings.len(),
            ratings.num_ratings(),
            self.similarity.name()
        );
        let normalizer = self.normalizer.as_ref();
        let normalized = ratings.map_vectors(|vector| normalizer.normalize(vector));
        let candidates = accumulate_candidates(
            &normalized,
            &self.config,
            self.similarity.as_ref(),
            &self.cancel,
        )?;
        let stats = candidates.stats();
        info!(
            "Admitted {} of {} co-rated pairs, {} candidates",
            stats.pairs_admitted,
            stats.pairs_examined,
            candidates.num_candidates()
        );

        self.state = BuildState::Truncating;
        let model = truncate_all(candidates, self.config.neighborhood_size);
        if self.cancel.is_cancelled() {
            return Err(BuildError::Cancelled);
        }

        info!(
            "Built similarity model for {} items in {:?}",
            model.len(),
            start.elapsed()
        );
        Ok(model)
    }
}

/// Build a model with the strategies named in `config`
pub fn build_model(ratings: &RatingMatrix, config: BuildConfig) -> Result<SimilarityModel> {
    SimilarityBuilder::new(config).build(ratings)
}
