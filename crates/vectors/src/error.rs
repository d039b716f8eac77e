//! Error types for the vectors crate.
//!
//! Every positional or bulk operation on a [`SparseVector`](crate::SparseVector)
//! or [`ScoredIdList`](crate::ScoredIdList) validates its arguments before
//! touching any data, so an `Err` always means the container is unchanged.

use crate::types::Id;
use thiserror::Error;

/// Errors raised by sparse vectors and scored lists
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorError {
    /// A position was outside `0..len` (or `0..=len` for insertion)
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Identifier and score slices handed to a bulk operation differ in length
    #[error("Identifier slice has {ids} elements but score slice has {scores}")]
    LengthMismatch { ids: usize, scores: usize },

    /// An `offset`/`length` window does not fit inside a slice of length `len`
    #[error("Range {offset}..{offset}+{length} exceeds slice of length {len}")]
    RangeOutOfBounds {
        offset: usize,
        length: usize,
        len: usize,
    },

    /// The same key was supplied twice with different values
    ///
    /// Identical repeats collapse silently; conflicting ones are a data error
    /// and are never resolved by picking one side.
    #[error("Duplicate key {key} with conflicting values {first} and {second}")]
    DuplicateKey { key: Id, first: f64, second: f64 },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, VectorError>;
