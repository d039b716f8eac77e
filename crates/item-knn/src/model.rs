//! The finalized item → neighborhood mapping.

use std::collections::BTreeMap;
use vectors::{Id, ScoredIdList};

/// Immutable item-to-item similarity model
///
/// Each item maps to its neighbors ranked by descending similarity, with no
/// neighbor listed twice. The model exposes no way to modify it once built.
#[derive(Debug, Clone, Default)]
pub struct SimilarityModel {
    neighborhoods: BTreeMap<Id, ScoredIdList>,
    neighborhood_size: usize,
    empty: ScoredIdList,
}

impl SimilarityModel {
    pub(crate) fn new(neighborhoods: BTreeMap<Id, ScoredIdList>, neighborhood_size: usize) -> Self {
        Self {
            neighborhoods,
            neighborhood_size,
            empty: ScoredIdList::new(),
        }
    }

    /// Ranked neighbors of `item`
    ///
    /// Items without neighbors, and items the model has never seen, get an
    /// empty list.
    pub fn neighbors(&self, item: Id) -> &ScoredIdList {
        self.neighborhoods.get(&item).unwrap_or(&self.empty)
    }

    /// Similarity of `neighbor` to `item`, if `neighbor` made the cut
    pub fn similarity(&self, item: Id, neighbor: Id) -> Option<f64> {
        self.neighbors(item)
            .iter()
            .find(|&(id, _)| id == neighbor)
            .map(|(_, score)| score)
    }

    pub fn contains_item(&self, item: Id) -> bool {
        self.neighborhoods.contains_key(&item)
    }

    /// Items in ascending order
    pub fn items(&self) -> impl Iterator<Item = Id> + '_ {
        self.neighborhoods.keys().copied()
    }

    /// `(item, neighbors)` in ascending item order
    pub fn iter(&self) -> impl Iterator<Item = (Id, &ScoredIdList)> + '_ {
        self.neighborhoods.iter().map(|(&item, list)| (item, list))
    }

    pub fn len(&self) -> usize {
        self.neighborhoods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighborhoods.is_empty()
    }

    /// Upper bound on the length of every neighbor list
    pub fn neighborhood_size(&self) -> usize {
        self.neighborhood_size
    }
}
