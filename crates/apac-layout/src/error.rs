//! Error types for record encoding and batch emission.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::RecordKind;

/// Errors raised while encoding, writing or reading remittance records.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A finished record does not have its kind's exact byte length.
    ///
    /// This signals a broken field-width contract, never bad input data.
    #[error("{kind} record has {actual} bytes, expected {expected}")]
    RecordLength {
        kind: RecordKind,
        actual: usize,
        expected: usize,
    },

    /// A value was supplied for a field the record schema does not define.
    #[error("{kind} record has no field named '{field}'")]
    UnknownField { kind: RecordKind, field: String },

    /// A record reached the writer with a byte outside 0x00-0x7F.
    #[error("{kind} record contains non-ASCII characters")]
    NonAscii { kind: RecordKind },

    /// Writing to an in-memory or borrowed stream failed.
    #[error("failed to write record stream: {0}")]
    Stream(#[from] std::io::Error),

    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LayoutError {
    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
