//! Error types for the item-knn crate.

use crate::builder::BuildState;
use thiserror::Error;
use vectors::VectorError;

/// Errors that can occur while configuring or running a similarity build
#[derive(Error, Debug)]
pub enum BuildError {
    /// A configuration value is out of range
    ///
    /// Detected when the build starts, before any pair is processed.
    #[error("Invalid value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A JSON configuration document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The build was aborted through its cancel token; nothing was published
    #[error("Similarity build was cancelled")]
    Cancelled,

    /// An operation was attempted in the wrong builder state
    #[error("Builder is {found:?} but the operation requires {expected:?}")]
    InvalidState {
        expected: BuildState,
        found: BuildState,
    },

    /// Rating data could not be turned into vectors
    #[error("Vector error: {0}")]
    Vector(#[from] VectorError),

    /// A dedicated worker pool could not be started
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, BuildError>;
