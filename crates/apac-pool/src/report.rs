//! Interval report written beside a committed remittance.

use std::fs;
use std::path::{Path, PathBuf};

use apac_model::AuthorizationNumber;
use tracing::info;

use crate::error::{PoolError, Result};

/// `{output_stem}_intervalo.txt` next to `output_path`.
pub fn interval_report_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_path.with_file_name(format!("{stem}_intervalo.txt"))
}

/// Render the report body. Missing numbers render as empty values.
pub fn render_interval_report(
    first: Option<&AuthorizationNumber>,
    last: Option<&AuthorizationNumber>,
) -> String {
    let first = first.map(AuthorizationNumber::as_str).unwrap_or_default();
    let last = last.map(AuthorizationNumber::as_str).unwrap_or_default();
    format!("FIRST_NUMBER={first}\nLAST_NUMBER={last}\n")
}

/// Record the first and last numbers used by the batch written to
/// `output_path`, returning the report's path.
pub fn write_interval_report(
    output_path: &Path,
    first: Option<&AuthorizationNumber>,
    last: Option<&AuthorizationNumber>,
) -> Result<PathBuf> {
    let path = interval_report_path(output_path);
    fs::write(&path, render_interval_report(first, last))
        .map_err(|e| PoolError::io("write", &path, e))?;
    info!(path = %path.display(), "interval report written");
    Ok(path)
}
