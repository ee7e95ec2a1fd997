//! Batch-level errors.
//!
//! Only conditions that abort a whole run live here. A patient row that
//! cannot be encoded is not an error; it becomes a
//! [`RowFailure`](crate::RowFailure) inside the batch.

use std::path::PathBuf;

use apac_layout::LayoutError;
use apac_model::ModelError;
use apac_pool::PoolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    /// The pool ran dry before every row got a number.
    #[error(
        "authorization numbers exhausted after {generated} generated records ({pending} rows left)"
    )]
    NumbersExhausted { generated: usize, pending: usize },

    /// A record broke its layout contract.
    #[error("record layout violated: {0}")]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Period or layout version rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ModelError),

    #[error("failed to read profile {path}: {source}")]
    ProfileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile {path}: {source}")]
    ProfileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for batch operations.
pub type Result<T> = std::result::Result<T, BatchError>;
