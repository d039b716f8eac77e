//! The read-only item → rating vector mapping a build runs over.

use crate::error::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use vectors::{Id, SparseVector, VectorError};

/// A single explicit rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user: Id,
    pub item: Id,
    pub value: f64,
}

impl Rating {
    pub fn new(user: Id, item: Id, value: f64) -> Self {
        Self { user, item, value }
    }
}

/// Rating vectors keyed by item, each vector keyed by user
///
/// Items are kept in ascending identifier order so every traversal, and
/// therefore every build, sees them in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingMatrix {
    items: BTreeMap<Id, SparseVector>,
}

impl RatingMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group ratings by item and build one vector per item
    ///
    /// A user rating the same item twice with different values is a
    /// [`VectorError::DuplicateKey`].
    pub fn from_ratings<I>(ratings: I) -> Result<Self>
    where
        I: IntoIterator<Item = Rating>,
    {
        let mut grouped: BTreeMap<Id, Vec<(Id, f64)>> = BTreeMap::new();
        for rating in ratings {
            grouped
                .entry(rating.item)
                .or_default()
                .push((rating.user, rating.value));
        }

        let items = grouped
            .into_par_iter()
            .map(|(item, pairs)| SparseVector::from_pairs(pairs).map(|vector| (item, vector)))
            .collect::<std::result::Result<BTreeMap<Id, SparseVector>, VectorError>>()?;

        let matrix = Self { items };
        debug!(
            "Built rating matrix with {} items and {} ratings",
            matrix.len(),
            matrix.num_ratings()
        );
        Ok(matrix)
    }

    /// Register an item with its rating vector, replacing any previous one
    ///
    /// An empty vector is allowed; the item then ends up with no neighbors.
    pub fn insert_item(&mut self, item: Id, ratings: SparseVector) -> Option<SparseVector> {
        self.items.insert(item, ratings)
    }

    pub fn item_vector(&self, item: Id) -> Option<&SparseVector> {
        self.items.get(&item)
    }

    pub fn contains_item(&self, item: Id) -> bool {
        self.items.contains_key(&item)
    }

    /// Item identifiers in ascending order
    pub fn items(&self) -> impl Iterator<Item = Id> + '_ {
        self.items.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id, &SparseVector)> + '_ {
        self.items.iter().map(|(&item, vector)| (item, vector))
    }

    /// Number of items (including items without ratings)
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn num_ratings(&self) -> usize {
        self.items.values().map(SparseVector::len).sum()
    }

    /// Inverted index from user to the items they rated
    ///
    /// Each item list is in ascending order.
    pub fn user_items(&self) -> HashMap<Id, Vec<Id>> {
        let mut index: HashMap<Id, Vec<Id>> = HashMap::new();
        for (&item, vector) in &self.items {
            for &user in vector.keys() {
                index.entry(user).or_default().push(item);
            }
        }
        index
    }

    /// Apply `f` to every item vector in parallel
    pub fn map_vectors<F>(&self, f: F) -> RatingMatrix
    where
        F: Fn(&SparseVector) -> SparseVector + Send + Sync,
    {
        let items = self
            .items
            .par_iter()
            .map(|(&item, vector)| (item, f(vector)))
            .collect();
        RatingMatrix { items }
    }
}
