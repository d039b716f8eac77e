//! # Vectors Crate
//!
//! Data structures shared by the item-neighborhood builder.
//!
//! ## Main Components
//!
//! - **sparse_vector**: `SparseVector`, a sorted identifier → value mapping
//!   whose binary operations are all linear merges
//! - **scored_list**: `ScoredIdList`, an insertion-ordered identifier list with
//!   parallel scores and bounds-checked bulk transfer
//! - **types**: the `Id` alias and the undefined-score sentinel
//! - **error**: `VectorError`
//!
//! ## Example Usage
//!
//! ```
//! use vectors::{ScoredIdList, SparseVector};
//!
//! let a = SparseVector::from_pairs(vec![(1, 5.0), (2, 3.0), (3, 4.0)]).unwrap();
//! let b = SparseVector::from_pairs(vec![(1, 4.0), (2, 2.0), (4, 5.0)]).unwrap();
//! assert_eq!(a.common_count(&b), 2);
//!
//! let mut neighbors = ScoredIdList::new();
//! neighbors.push(42, 0.8);
//! assert_eq!(neighbors.score_vector().get(42), Some(0.8));
//! ```

pub mod error;
pub mod scored_list;
pub mod sparse_vector;
pub mod types;

pub use error::{Result, VectorError};
pub use scored_list::ScoredIdList;
pub use sparse_vector::{Overlap, SparseVector};
pub use types::{Id, UNDEFINED_SCORE, is_undefined};
