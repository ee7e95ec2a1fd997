//! Writing an assembled batch and the pool state that produced it.

use std::path::{Path, PathBuf};

use apac_layout::write_batch;
use apac_pool::{NumberPool, write_interval_report};
use tracing::{info, info_span};

use crate::assembler::Batch;
use crate::error::Result;

/// Files produced by [`commit_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub output_path: PathBuf,
    pub interval_path: PathBuf,
    pub bytes_written: u64,
}

/// Write the remittance, then the remaining pool, then the interval report.
///
/// The remittance goes first so a failed write leaves the pool file as it
/// was and every number it held stays available.
pub fn commit_batch(
    batch: &Batch,
    output_path: &Path,
    pool: &NumberPool,
    pool_path: &Path,
) -> Result<CommitReport> {
    let span = info_span!("commit", output = %output_path.display());
    let _guard = span.enter();

    let bytes_written = write_batch(output_path, batch.all_records())?;
    pool.persist(pool_path)?;
    let interval_path = write_interval_report(
        output_path,
        batch.stats.first_number.as_ref(),
        batch.stats.last_number.as_ref(),
    )?;

    info!(
        records = batch.record_count(),
        bytes = bytes_written,
        remaining_numbers = pool.len(),
        "batch committed"
    );
    Ok(CommitReport {
        output_path: output_path.to_path_buf(),
        interval_path,
        bytes_written,
    })
}
