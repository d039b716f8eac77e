//! Neighborhood truncation: rank each item's candidates and keep the top K.
//!
//! Ranking is fully deterministic:
//! 1. defined scores, highest first
//! 2. equal scores by ascending neighbor identifier
//! 3. undefined scores after every defined one, by ascending identifier
//!
//! If a candidate list names the same neighbor twice, only its best-ranked
//! entry is kept.

use crate::accumulate::CandidateSet;
use crate::model::SimilarityModel;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};
use vectors::{Id, ScoredIdList, is_undefined};

/// Ranking order of two `(neighbor, score)` candidates
pub fn compare_candidates(a: &(Id, f64), b: &(Id, f64)) -> Ordering {
    match (is_undefined(a.1), is_undefined(b.1)) {
        (false, false) => b
            .1
            .partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0)),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => a.0.cmp(&b.0),
    }
}

/// Rank `candidates` and keep at most `neighborhood_size` distinct neighbors
pub fn truncate_neighborhood(candidates: &ScoredIdList, neighborhood_size: usize) -> ScoredIdList {
    let mut ranked: Vec<(Id, f64)> = candidates.iter().collect();
    ranked.sort_unstable_by(compare_candidates);

    let mut seen: HashSet<Id> = HashSet::with_capacity(neighborhood_size.min(ranked.len()));
    let mut neighborhood = ScoredIdList::with_capacity(neighborhood_size.min(ranked.len()));
    for (neighbor, score) in ranked {
        if neighborhood.len() == neighborhood_size {
            break;
        }
        if seen.insert(neighbor) {
            neighborhood.push(neighbor, score);
        }
    }
    neighborhood
}

/// Truncate every candidate list and publish the model
#[instrument(skip_all, fields(items = candidates.len(), neighborhood_size = neighborhood_size))]
pub fn truncate_all(candidates: CandidateSet, neighborhood_size: usize) -> SimilarityModel {
    let neighborhoods: BTreeMap<Id, ScoredIdList> = candidates
        .into_lists()
        .into_par_iter()
        .map(|(item, list)| (item, truncate_neighborhood(&list, neighborhood_size)))
        .collect();

    let retained: usize = neighborhoods.values().map(ScoredIdList::len).sum();
    debug!("Retained {} neighbors across {} items", retained, neighborhoods.len());

    SimilarityModel::new(neighborhoods, neighborhood_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectors::UNDEFINED_SCORE;

    fn list(entries: &[(Id, f64)]) -> ScoredIdList {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let candidates = list(&[(1, 0.5), (2, 1.5), (3, 0.3), (4, 3.5), (5, 2.5)]);
        let top = truncate_neighborhood(&candidates, 3);
        assert_eq!(top.ids(), &[4, 5, 2]);
        assert_eq!(top.scores(), &[3.5, 2.5, 1.5]);
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        let candidates = list(&[(9, 1.0), (3, 1.0), (7, 2.0), (5, 1.0)]);
        let top = truncate_neighborhood(&candidates, 3);
        assert_eq!(top.ids(), &[7, 3, 5]);
    }

    #[test]
    fn test_undefined_scores_rank_last() {
        let candidates = list(&[(1, UNDEFINED_SCORE), (2, -0.9), (3, 0.4), (0, UNDEFINED_SCORE)]);
        let all = truncate_neighborhood(&candidates, 10);
        assert_eq!(all.ids(), &[3, 2, 0, 1]);
        assert!(is_undefined(all.score(2).unwrap()));

        let top = truncate_neighborhood(&candidates, 2);
        assert_eq!(top.ids(), &[3, 2]);
    }

    #[test]
    fn test_duplicate_neighbors_keep_best_entry() {
        let candidates = list(&[(4, 0.1), (4, 0.8), (2, 0.5)]);
        let top = truncate_neighborhood(&candidates, 5);
        assert_eq!(top.ids(), &[4, 2]);
        assert_eq!(top.score(0).unwrap(), 0.8);
    }

    #[test]
    fn test_empty_candidates() {
        let top = truncate_neighborhood(&ScoredIdList::new(), 5);
        assert!(top.is_empty());
    }

    #[test]
    fn test_truncation_matches_full_sort_prefix() {
        let candidates: ScoredIdList = (0..50u64)
            .map(|id| (id, ((id * 37) % 11) as f64 / 10.0))
            .collect();

        let mut full: Vec<(Id, f64)> = candidates.iter().collect();
        full.sort_by(compare_candidates);

        for k in [1, 5, 11, 50, 80] {
            let top = truncate_neighborhood(&candidates, k);
            assert_eq!(top.len(), k.min(50));
            let expected: Vec<(Id, f64)> = full.iter().copied().take(k).collect();
            assert_eq!(top.iter().collect::<Vec<_>>(), expected);
            assert!(top.scores().windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
