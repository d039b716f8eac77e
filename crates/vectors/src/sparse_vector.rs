//! Sorted sparse vectors and the merge operations built on them.
//!
//! A [`SparseVector`] stores its keys as a strictly ascending, duplicate-free
//! `Vec<Id>` with a parallel `Vec<f64>` of values. Every binary operation
//! (common key count, overlap, dot product, restriction) walks both key
//! sequences in lockstep, so comparing two vectors costs O(n + m) and never
//! does a per-key lookup.

use crate::error::{Result, VectorError};
use crate::types::Id;
use std::cmp::Ordering;

/// Mapping from identifier to value, sorted by identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    keys: Vec<Id>,
    values: Vec<f64>,
}

/// Common entries of two vectors: the shared keys with both sides' values
///
/// `left()` holds the values from the receiver of
/// [`SparseVector::overlap`], `right()` those from its argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlap {
    keys: Vec<Id>,
    left: Vec<f64>,
    right: Vec<f64>,
}

/// Walk two ascending key slices and call `visit(i, j)` for every position
/// pair where `a[i] == b[j]`.
#[inline]
fn merge_join(a: &[Id], b: &[Id], mut visit: impl FnMut(usize, usize)) {
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                visit(i, j);
                i += 1;
                j += 1;
            }
        }
    }
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl SparseVector {
    /// Creates an empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from unordered `(key, value)` pairs
    ///
    /// Pairs are sorted by key. A key repeated with the same value collapses
    /// to one entry; a key repeated with a different value is rejected with
    /// [`VectorError::DuplicateKey`].
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Id, f64)>,
    {
        let mut pairs: Vec<(Id, f64)> = pairs.into_iter().collect();
        pairs.sort_by_key(|&(key, _)| key);

        let mut keys = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());

        for (key, value) in pairs {
            if let (Some(&last_key), Some(&last_value)) = (keys.last(), values.last()) {
                if last_key == key {
                    if same_value(last_value, value) {
                        continue;
                    }
                    return Err(VectorError::DuplicateKey {
                        key,
                        first: last_value,
                        second: value,
                    });
                }
            }
            keys.push(key);
            values.push(value);
        }

        Ok(Self { keys, values })
    }

    /// Wrap parts that are already strictly ascending and of equal length
    pub(crate) fn from_sorted_parts(keys: Vec<Id>, values: Vec<f64>) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        debug_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        Self { keys, values }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in ascending order
    pub fn keys(&self) -> &[Id] {
        &self.keys
    }

    /// Values, parallel to [`keys`](Self::keys)
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Look up the value stored for `key`
    pub fn get(&self, key: Id) -> Option<f64> {
        self.keys
            .binary_search(&key)
            .ok()
            .map(|position| self.values[position])
    }

    pub fn contains_key(&self, key: Id) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    /// Key stored at `position`
    pub fn key_at(&self, position: usize) -> Result<Id> {
        self.keys
            .get(position)
            .copied()
            .ok_or(VectorError::IndexOutOfBounds {
                index: position,
                len: self.len(),
            })
    }

    /// Value stored at `position`
    pub fn value_at(&self, position: usize) -> Result<f64> {
        self.values
            .get(position)
            .copied()
            .ok_or(VectorError::IndexOutOfBounds {
                index: position,
                len: self.len(),
            })
    }

    /// Iterate `(key, value)` pairs in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (Id, f64)> + '_ {
        self.keys.iter().copied().zip(self.values.iter().copied())
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Mean of the stored values, `None` for an empty vector
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.sum() / self.len() as f64)
        }
    }

    /// Euclidean norm of the stored values
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Apply `f` to every value, keeping the key set
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            keys: self.keys.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Number of keys present in both vectors
    ///
    /// Allocation-free; this is what admission checks call for every pair.
    pub fn common_count(&self, other: &SparseVector) -> usize {
        let mut count = 0;
        merge_join(&self.keys, &other.keys, |_, _| count += 1);
        count
    }

    /// Shared keys with the value from each side
    pub fn overlap(&self, other: &SparseVector) -> Overlap {
        let mut overlap = Overlap::default();
        merge_join(&self.keys, &other.keys, |i, j| {
            overlap.keys.push(self.keys[i]);
            overlap.left.push(self.values[i]);
            overlap.right.push(other.values[j]);
        });
        overlap
    }

    /// Dot product over the shared keys
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let mut dot = 0.0;
        merge_join(&self.keys, &other.keys, |i, j| {
            dot += self.values[i] * other.values[j];
        });
        dot
    }

    /// Sub-vector holding only the entries whose key appears in `keys`
    ///
    /// `keys` must be sorted ascending (for instance the keys of another
    /// vector or of an [`Overlap`]).
    pub fn restrict_to(&self, keys: &[Id]) -> SparseVector {
        debug_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        let mut restricted_keys = Vec::new();
        let mut restricted_values = Vec::new();
        merge_join(&self.keys, keys, |i, _| {
            restricted_keys.push(self.keys[i]);
            restricted_values.push(self.values[i]);
        });
        Self::from_sorted_parts(restricted_keys, restricted_values)
    }
}

impl Overlap {
    /// Number of shared keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[Id] {
        &self.keys
    }

    pub fn left(&self) -> &[f64] {
        &self.left
    }

    pub fn right(&self) -> &[f64] {
        &self.right
    }

    /// Iterate `(key, left, right)` triples in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (Id, f64, f64)> + '_ {
        self.keys
            .iter()
            .zip(self.left.iter().zip(self.right.iter()))
            .map(|(&key, (&left, &right))| (key, left, right))
    }

    /// Left side restricted to the shared keys
    pub fn left_vector(&self) -> SparseVector {
        SparseVector::from_sorted_parts(self.keys.clone(), self.left.clone())
    }

    /// Right side restricted to the shared keys
    pub fn right_vector(&self) -> SparseVector {
        SparseVector::from_sorted_parts(self.keys.clone(), self.right.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(pairs: &[(Id, f64)]) -> SparseVector {
        SparseVector::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_from_pairs_sorts_keys() {
        let v = vector(&[(7, 1.0), (2, 2.0), (5, 3.0)]);
        assert_eq!(v.keys(), &[2, 5, 7]);
        assert_eq!(v.values(), &[2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_from_pairs_collapses_identical_duplicates() {
        let v = vector(&[(3, 4.0), (1, 1.0), (3, 4.0)]);
        assert_eq!(v.len(), 2);
        assert_eq!(v.get(3), Some(4.0));
    }

    #[test]
    fn test_from_pairs_rejects_conflicting_duplicates() {
        let err = SparseVector::from_pairs(vec![(3, 4.0), (3, 2.0)]).unwrap_err();
        assert_eq!(
            err,
            VectorError::DuplicateKey {
                key: 3,
                first: 4.0,
                second: 2.0
            }
        );
    }

    #[test]
    fn test_empty_vector() {
        let v = SparseVector::new();
        assert!(v.is_empty());
        assert_eq!(v.norm(), 0.0);
        assert_eq!(v.mean(), None);
        assert_eq!(v.common_count(&vector(&[(1, 1.0)])), 0);
    }

    #[test]
    fn test_positional_access_is_bounds_checked() {
        let v = vector(&[(10, 1.5), (20, 2.5)]);
        assert_eq!(v.key_at(1).unwrap(), 20);
        assert_eq!(v.value_at(0).unwrap(), 1.5);
        assert_eq!(
            v.key_at(2).unwrap_err(),
            VectorError::IndexOutOfBounds { index: 2, len: 2 }
        );
        assert!(v.value_at(5).is_err());
    }

    #[test]
    fn test_overlap_of_co_rated_items() {
        // users 1..4, two items sharing users 1 and 2
        let i1 = vector(&[(1, 5.0), (2, 3.0), (3, 4.0)]);
        let i2 = vector(&[(1, 4.0), (2, 2.0), (4, 5.0)]);

        let overlap = i1.overlap(&i2);
        assert_eq!(overlap.keys(), &[1, 2]);
        assert_eq!(overlap.left(), &[5.0, 3.0]);
        assert_eq!(overlap.right(), &[4.0, 2.0]);
        assert_eq!(i1.common_count(&i2), 2);
    }

    #[test]
    fn test_common_count_is_symmetric() {
        let a = vector(&[(1, 1.0), (4, 1.0), (9, 1.0), (12, 1.0)]);
        let b = vector(&[(4, 2.0), (5, 2.0), (12, 2.0), (30, 2.0)]);
        assert_eq!(a.common_count(&b), b.common_count(&a));
        assert_eq!(a.common_count(&b), 2);
    }

    #[test]
    fn test_dot_and_norm() {
        let a = vector(&[(1, 3.0), (2, 4.0)]);
        let b = vector(&[(2, 2.0), (3, 7.0)]);
        assert_eq!(a.dot(&b), 8.0);
        assert!((a.norm() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_restrict_to_keys() {
        let a = vector(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0)]);
        let restricted = a.restrict_to(&[2, 4, 9]);
        assert_eq!(restricted.keys(), &[2, 4]);
        assert_eq!(restricted.values(), &[2.0, 4.0]);
    }

    #[test]
    fn test_overlap_side_vectors() {
        let a = vector(&[(1, 1.0), (2, 2.0)]);
        let b = vector(&[(2, 5.0), (3, 6.0)]);
        let overlap = a.overlap(&b);
        assert_eq!(overlap.left_vector(), vector(&[(2, 2.0)]));
        assert_eq!(overlap.right_vector(), vector(&[(2, 5.0)]));
        assert_eq!(overlap.iter().collect::<Vec<_>>(), vec![(2, 2.0, 5.0)]);
    }

    #[test]
    fn test_mean_and_map_values() {
        let a = vector(&[(1, 2.0), (2, 4.0)]);
        assert_eq!(a.mean(), Some(3.0));
        let centered = a.map_values(|v| v - 3.0);
        assert_eq!(centered.values(), &[-1.0, 1.0]);
        assert_eq!(centered.keys(), a.keys());
    }
}
