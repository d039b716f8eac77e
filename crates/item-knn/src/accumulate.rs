//! Pairwise candidate accumulation.
//!
//! ## Algorithm
//! 1. Build the inverted user → items index once.
//! 2. Split the sorted center items into contiguous partitions, one rayon
//!    task each.
//! 3. For each center item, collect the items that share at least one rater
//!    with it via the inverted index; pairs without a common rater are never
//!    looked at.
//! 4. For each such pair, count common raters with a linear merge. Pairs
//!    below `min_common_users` are dropped before any arithmetic.
//! 5. Score admitted pairs and record `(neighbor, score)` on the center's
//!    list, and on the neighbor's list too when the measure is symmetric.
//! 6. Merge the per-partition accumulators.
//!
//! With a symmetric measure a pair `(i, j)` is only processed by the
//! partition owning `min(i, j)`, so no pair is scored twice and no list gets
//! a duplicate entry.

use crate::builder::CancelToken;
use crate::config::BuildConfig;
use crate::error::{BuildError, Result};
use crate::ratings::RatingMatrix;
use crate::similarity::VectorSimilarity;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};
use vectors::{Id, ScoredIdList, UNDEFINED_SCORE};

/// Counters describing one accumulation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairStats {
    /// Co-rated pairs whose common-user count was computed
    pub pairs_examined: u64,
    /// Pairs that passed the threshold and were scored
    pub pairs_admitted: u64,
    /// Admitted pairs whose similarity was undefined
    pub undefined_scores: u64,
}

impl PairStats {
    fn merge(&mut self, other: PairStats) {
        self.pairs_examined += other.pairs_examined;
        self.pairs_admitted += other.pairs_admitted;
        self.undefined_scores += other.undefined_scores;
    }
}

/// Unsorted, untruncated candidate lists for every item of a build
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    lists: BTreeMap<Id, ScoredIdList>,
    stats: PairStats,
}

impl CandidateSet {
    /// Candidates accumulated for `item`
    pub fn candidates(&self, item: Id) -> Option<&ScoredIdList> {
        self.lists.get(&item)
    }

    pub fn stats(&self) -> PairStats {
        self.stats
    }

    /// Number of items (every input item has a list, possibly empty)
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Total number of candidate entries across all items
    pub fn num_candidates(&self) -> usize {
        self.lists.values().map(ScoredIdList::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id, &ScoredIdList)> + '_ {
        self.lists.iter().map(|(&item, list)| (item, list))
    }

    pub fn into_lists(self) -> BTreeMap<Id, ScoredIdList> {
        self.lists
    }
}

/// Candidates gathered by one partition
#[derive(Default)]
struct PartitionAccumulator {
    lists: HashMap<Id, ScoredIdList>,
    stats: PairStats,
}

/// Read-only inputs shared by every partition
struct PairContext<'a> {
    matrix: &'a RatingMatrix,
    user_items: &'a HashMap<Id, Vec<Id>>,
    config: &'a BuildConfig,
    similarity: &'a dyn VectorSimilarity,
    symmetric: bool,
}

impl PartitionAccumulator {
    fn record(&mut self, item: Id, neighbor: Id, score: f64) {
        self.lists.entry(item).or_default().push(neighbor, score);
    }

    fn merge(&mut self, other: PartitionAccumulator) {
        for (item, list) in other.lists {
            self.lists.entry(item).or_default().extend(&list);
        }
        self.stats.merge(other.stats);
    }

    /// Process every pair owned by `center`
    fn process_center(&mut self, center: Id, context: &PairContext<'_>, scratch: &mut Vec<Id>) {
        let Some(center_vector) = context.matrix.item_vector(center) else {
            return;
        };

        scratch.clear();
        for user in center_vector.keys() {
            let Some(items) = context.user_items.get(user) else {
                continue;
            };
            if context.symmetric {
                let start = items.partition_point(|&item| item <= center);
                scratch.extend_from_slice(&items[start..]);
            } else {
                scratch.extend(items.iter().copied().filter(|&item| item != center));
            }
        }
        scratch.sort_unstable();
        scratch.dedup();

        for &neighbor in scratch.iter() {
            let Some(neighbor_vector) = context.matrix.item_vector(neighbor) else {
                continue;
            };

            self.stats.pairs_examined += 1;
            let common_users = center_vector.common_count(neighbor_vector);
            if !context.config.is_admissible(common_users) {
                continue;
            }

            let overlap = center_vector.overlap(neighbor_vector);
            let mut score = context
                .similarity
                .similarity(center_vector, neighbor_vector, &overlap);
            if !score.is_finite() {
                score = UNDEFINED_SCORE;
                self.stats.undefined_scores += 1;
            }
            self.stats.pairs_admitted += 1;

            self.record(center, neighbor, score);
            if context.symmetric {
                self.record(neighbor, center, score);
            }
        }
    }
}

/// Number of centers per partition: a few partitions per worker thread
fn partition_size(num_items: usize, num_threads: usize) -> usize {
    let partitions = num_threads.max(1) * 4;
    num_items.div_ceil(partitions).max(1)
}

/// Accumulate candidate lists for every item in `matrix`
///
/// Runs on the current rayon pool. Checks `cancel` before every center item;
/// once cancelled all partial lists are dropped and
/// [`BuildError::Cancelled`] is returned.
#[instrument(skip_all, fields(items = matrix.len(), min_common_users = config.min_common_users))]
pub fn accumulate_candidates(
    matrix: &RatingMatrix,
    config: &BuildConfig,
    similarity: &dyn VectorSimilarity,
    cancel: &CancelToken,
) -> Result<CandidateSet> {
    let user_items = matrix.user_items();
    let centers: Vec<Id> = matrix.items().collect();
    let chunk_size = partition_size(centers.len(), rayon::current_num_threads());

    let context = PairContext {
        matrix,
        user_items: &user_items,
        config,
        similarity,
        symmetric: similarity.is_symmetric(),
    };

    debug!(
        "Scoring pairs with {} over {} partitions of up to {} items",
        similarity.name(),
        centers.len().div_ceil(chunk_size),
        chunk_size
    );

    let accumulator = centers
        .par_chunks(chunk_size)
        .map(|partition| {
            let mut accumulator = PartitionAccumulator::default();
            let mut scratch = Vec::new();
            for &center in partition {
                if cancel.is_cancelled() {
                    return Err(BuildError::Cancelled);
                }
                accumulator.process_center(center, &context, &mut scratch);
            }
            Ok(accumulator)
        })
        .try_reduce(PartitionAccumulator::default, |mut acc, partial| {
            acc.merge(partial);
            Ok(acc)
        })?;

    if cancel.is_cancelled() {
        return Err(BuildError::Cancelled);
    }

    let PartitionAccumulator { mut lists, stats } = accumulator;
    let lists: BTreeMap<Id, ScoredIdList> = centers
        .iter()
        .map(|&item| (item, lists.remove(&item).unwrap_or_default()))
        .collect();

    debug!(
        "Examined {} co-rated pairs, admitted {} ({} undefined)",
        stats.pairs_examined, stats.pairs_admitted, stats.undefined_scores
    );
    Ok(CandidateSet { lists, stats })
}
