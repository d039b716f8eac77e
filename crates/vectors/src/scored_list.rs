//! Identifier list with a parallel score per entry.
//!
//! [`ScoredIdList`] keeps insertion order (it is not sorted by identifier) and
//! may hold the same identifier more than once. Scores may be
//! [`UNDEFINED_SCORE`](crate::UNDEFINED_SCORE); such entries are ordinary
//! members of the list.
//!
//! Bulk transfers use `offset`/`length` windows over caller slices so that
//! neither side needs an exact-length intermediate buffer.

use crate::error::{Result, VectorError};
use crate::sparse_vector::SparseVector;
use crate::types::Id;
use std::iter::{Copied, Zip};
use std::slice;

/// Ordered list of identifiers with parallel scores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredIdList {
    ids: Vec<Id>,
    scores: Vec<f64>,
}

/// Borrowing iterator over `(id, score)` pairs
pub type Iter<'a> = Zip<Copied<slice::Iter<'a, Id>>, Copied<slice::Iter<'a, f64>>>;

/// Check that `offset..offset + length` fits in a slice of length `len`
fn check_window(offset: usize, length: usize, len: usize) -> Result<()> {
    match offset.checked_add(length) {
        Some(end) if end <= len => Ok(()),
        _ => Err(VectorError::RangeOutOfBounds {
            offset,
            length,
            len,
        }),
    }
}

impl ScoredIdList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            scores: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(VectorError::IndexOutOfBounds {
                index,
                len: self.len(),
            })
        }
    }

    fn check_insert_position(&self, index: usize) -> Result<()> {
        if index <= self.len() {
            Ok(())
        } else {
            Err(VectorError::IndexOutOfBounds {
                index,
                len: self.len(),
            })
        }
    }

    /// Append a scored identifier
    pub fn push(&mut self, id: Id, score: f64) {
        self.ids.push(id);
        self.scores.push(score);
    }

    /// Insert a scored identifier at `index`, shifting later entries right
    ///
    /// `index == len()` appends.
    pub fn insert(&mut self, index: usize, id: Id, score: f64) -> Result<()> {
        self.check_insert_position(index)?;
        self.ids.insert(index, id);
        self.scores.insert(index, score);
        Ok(())
    }

    /// Insert all of `ids` with their `scores` at `index`
    pub fn add_elements(&mut self, index: usize, ids: &[Id], scores: &[f64]) -> Result<()> {
        self.add_elements_range(index, ids, scores, 0, ids.len())
    }

    /// Insert `ids[offset..offset + length]` with the matching scores at `index`
    ///
    /// All arguments are validated before the list is touched.
    pub fn add_elements_range(
        &mut self,
        index: usize,
        ids: &[Id],
        scores: &[f64],
        offset: usize,
        length: usize,
    ) -> Result<()> {
        if ids.len() != scores.len() {
            return Err(VectorError::LengthMismatch {
                ids: ids.len(),
                scores: scores.len(),
            });
        }
        check_window(offset, length, ids.len())?;
        self.check_insert_position(index)?;

        let end = offset + length;
        self.ids
            .splice(index..index, ids[offset..end].iter().copied());
        self.scores
            .splice(index..index, scores[offset..end].iter().copied());
        Ok(())
    }

    /// Copy `length` entries starting at list position `from` into
    /// `ids[offset..]` and `scores[offset..]`
    pub fn get_elements(
        &self,
        from: usize,
        ids: &mut [Id],
        scores: &mut [f64],
        offset: usize,
        length: usize,
    ) -> Result<()> {
        if ids.len() != scores.len() {
            return Err(VectorError::LengthMismatch {
                ids: ids.len(),
                scores: scores.len(),
            });
        }
        check_window(offset, length, ids.len())?;
        check_window(from, length, self.len())?;

        ids[offset..offset + length].copy_from_slice(&self.ids[from..from + length]);
        scores[offset..offset + length].copy_from_slice(&self.scores[from..from + length]);
        Ok(())
    }

    /// Identifier at `index`
    pub fn id(&self, index: usize) -> Result<Id> {
        self.check_index(index)?;
        Ok(self.ids[index])
    }

    /// Score at `index`
    pub fn score(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        Ok(self.scores[index])
    }

    /// Replace the score at `index`, returning the previous score
    pub fn set_score(&mut self, index: usize, score: f64) -> Result<f64> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.scores[index], score))
    }

    pub fn iter(&self) -> Iter<'_> {
        self.ids.iter().copied().zip(self.scores.iter().copied())
    }

    /// Keep the first `len` entries
    pub fn truncate(&mut self, len: usize) {
        self.ids.truncate(len);
        self.scores.truncate(len);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.scores.clear();
    }

    /// Sparse vector from identifier to score
    ///
    /// The key set is exactly the set of distinct identifiers in the list.
    /// When an identifier occurs more than once, the entry closest to the end
    /// of the list wins. Undefined scores are kept as values, so their
    /// identifiers stay in the key set.
    pub fn score_vector(&self) -> SparseVector {
        let mut pairs: Vec<(Id, f64)> = self.iter().collect();
        // stable: equal ids keep list order, so the last one seen is the latest
        pairs.sort_by_key(|&(id, _)| id);

        let mut keys: Vec<Id> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (id, score) in pairs {
            if let (Some(&last), Some(value)) = (keys.last(), values.last_mut()) {
                if last == id {
                    *value = score;
                    continue;
                }
            }
            keys.push(id);
            values.push(score);
        }
        SparseVector::from_sorted_parts(keys, values)
    }
}

impl FromIterator<(Id, f64)> for ScoredIdList {
    fn from_iter<I: IntoIterator<Item = (Id, f64)>>(iter: I) -> Self {
        let mut list = ScoredIdList::new();
        list.extend(iter);
        list
    }
}

impl Extend<(Id, f64)> for ScoredIdList {
    fn extend<I: IntoIterator<Item = (Id, f64)>>(&mut self, iter: I) {
        for (id, score) in iter {
            self.push(id, score);
        }
    }
}

impl<'a> IntoIterator for &'a ScoredIdList {
    type Item = (Id, f64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
