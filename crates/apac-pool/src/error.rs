//! Pool error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing the number pool file.
#[derive(Debug, Error)]
pub enum PoolError {
    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The staged pool file could not be moved over the original.
    #[error("failed to replace {target_path} with {temp_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PoolError {
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

    /// Short explanation for the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {operation} the number pool at {}", path.display()),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the number pool to {}. Check disk space and permissions.",
                target_path.display()
            ),
        }
    }
}

/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
