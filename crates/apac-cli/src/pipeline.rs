//! Remittance generation with explicit stages.
//!
//! The pipeline runs these stages in order:
//! 1. **Configure**: validate period and layout version, load the profile
//! 2. **Ingest**: read both reference tables and the patient extract, then
//!    back up and load the number pool
//! 3. **Assemble**: build every record in memory
//! 4. **Commit**: write the remittance, the remaining pool and the interval
//!    report (skipped on a dry run)
//!
//! Nothing is written before stage 4, so any earlier failure leaves the pool
//! file exactly as it was (apart from its backup copy).

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, trace};

use apac_core::{
    Batch, BatchAssembler, CommitReport, ReferenceData, RemittanceProfile, RowProgress,
    RunConfig, commit_batch,
};
use apac_ingest::{
    FACILITY_CODE_COLUMN, FACILITY_KEY_COLUMN, PHYSICIAN_CODE_COLUMN, PHYSICIAN_KEY_COLUMN,
    read_patient_csv, read_reference_table,
};
use apac_layout::{BatchReport, read_batch};
use apac_model::{AuthorizationNumber, PatientRow};
use apac_pool::{NumberPool, backup};

use crate::logging::redact_value;

/// Input files of a generation run.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub patients: PathBuf,
    pub numbers: PathBuf,
    pub physicians: PathBuf,
    pub facilities: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub inputs: InputPaths,
    pub output_dir: PathBuf,
    /// `YYYYMM`
    pub period: String,
    pub layout_version: Option<String>,
    /// JSON profile; the built-in profile when absent.
    pub profile: Option<PathBuf>,
    /// Copy the pool file before loading it.
    pub backup: bool,
    /// Assemble and report without writing anything.
    pub dry_run: bool,
}

// ============================================================================
// Stage 1: Configure
// ============================================================================

/// Validate the run parameters and load the profile.
pub fn configure(options: &GenerateOptions) -> Result<RunConfig> {
    let profile = match &options.profile {
        Some(path) => RemittanceProfile::load(path)
            .with_context(|| format!("load profile {}", path.display()))?,
        None => RemittanceProfile::default(),
    };
    RunConfig::new(
        &options.period,
        options.layout_version.as_deref(),
        profile,
    )
    .context("validate run parameters")
}

// ============================================================================
// Stage 2: Ingest
// ============================================================================

#[derive(Debug)]
pub struct IngestResult {
    pub rows: Vec<PatientRow>,
    pub references: ReferenceData,
    pub pool: NumberPool,
    pub backup_path: Option<PathBuf>,
}

/// Read every input. The pool is backed up first when `backup` is set.
pub fn ingest(inputs: &InputPaths, backup_pool: bool) -> Result<IngestResult> {
    let span = info_span!("ingest");
    let _guard = span.enter();
    let start = Instant::now();

    let physicians = read_reference_table(
        &inputs.physicians,
        PHYSICIAN_KEY_COLUMN,
        PHYSICIAN_CODE_COLUMN,
    )
    .context("read physician table")?;
    let facilities = read_reference_table(
        &inputs.facilities,
        FACILITY_KEY_COLUMN,
        FACILITY_CODE_COLUMN,
    )
    .context("read facility table")?;
    let rows = read_patient_csv(&inputs.patients).context("read patient extract")?;

    let backup_path = if backup_pool {
        backup(&inputs.numbers)
    } else {
        None
    };
    let pool = NumberPool::load(&inputs.numbers).context("load number pool")?;

    info!(
        rows = rows.len(),
        physicians = physicians.len(),
        facilities = facilities.len(),
        numbers = pool.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        rows,
        references: ReferenceData::new(physicians, facilities),
        pool,
        backup_path,
    })
}

// ============================================================================
// Stage 3: Assemble
// ============================================================================

/// Build the batch, consuming numbers from `ingested.pool`.
pub fn assemble(
    config: &RunConfig,
    ingested: &mut IngestResult,
    on_progress: impl FnMut(RowProgress),
) -> Result<Batch> {
    let batch = BatchAssembler::new(config, &ingested.references)
        .with_progress(on_progress)
        .assemble(&ingested.rows, &mut ingested.pool)
        .context("assemble batch")?;
    for failure in &batch.failures {
        trace!(
            row = failure.row,
            patient = redact_value(&failure.patient),
            "row skipped"
        );
    }
    Ok(batch)
}

// ============================================================================
// Stage 4: Commit
// ============================================================================

/// Write the batch and persist what is left of the pool.
pub fn commit(
    batch: &Batch,
    output_path: &Path,
    pool: &NumberPool,
    pool_path: &Path,
) -> Result<CommitReport> {
    commit_batch(batch, output_path, pool, pool_path)
        .with_context(|| format!("commit {}", output_path.display()))
}

// ============================================================================
// Full run
// ============================================================================

/// Everything the summary needs about a finished run.
#[derive(Debug)]
pub struct GenerateResult {
    pub config: RunConfig,
    pub output_path: PathBuf,
    pub rows_read: usize,
    pub batch: Batch,
    /// `None` on a dry run.
    pub commit: Option<CommitReport>,
    pub backup_path: Option<PathBuf>,
}

impl GenerateResult {
    pub fn dry_run(&self) -> bool {
        self.commit.is_none()
    }

    pub fn has_failures(&self) -> bool {
        !self.batch.failures.is_empty()
    }
}

/// Run every stage. `on_progress` is called once per patient row.
pub fn generate(
    options: &GenerateOptions,
    on_progress: impl FnMut(RowProgress),
) -> Result<GenerateResult> {
    let config = configure(options)?;
    let span = info_span!("remittance", period = %config.period, dry_run = options.dry_run);
    let _guard = span.enter();
    let start = Instant::now();

    let mut ingested = ingest(&options.inputs, options.backup && !options.dry_run)?;
    let batch = assemble(&config, &mut ingested, on_progress)?;

    let output_path = options.output_dir.join(config.output_file_name());
    let commit = if options.dry_run {
        info!(output = %output_path.display(), "dry run, nothing written");
        None
    } else {
        Some(commit(
            &batch,
            &output_path,
            &ingested.pool,
            &options.inputs.numbers,
        )?)
    };

    info!(
        generated = batch.stats.generated,
        failed = batch.stats.failed,
        duration_ms = start.elapsed().as_millis(),
        "remittance complete"
    );
    Ok(GenerateResult {
        config,
        output_path,
        rows_read: ingested.rows.len(),
        batch,
        commit,
        backup_path: ingested.backup_path,
    })
}

// ============================================================================
// Inspection
// ============================================================================

/// Read-only view of a pool file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStatus {
    pub path: PathBuf,
    pub available: usize,
    pub next: Option<AuthorizationNumber>,
    pub last: Option<AuthorizationNumber>,
}

/// Load a pool without backing it up or changing it.
pub fn inspect_pool(path: &Path) -> Result<PoolStatus> {
    let pool = NumberPool::load(path).context("load number pool")?;
    Ok(PoolStatus {
        path: path.to_path_buf(),
        available: pool.len(),
        next: pool.peek().cloned(),
        last: pool.iter().last().cloned(),
    })
}

/// Re-check a written remittance file.
pub fn verify(path: &Path) -> Result<BatchReport> {
    let span = info_span!("verify", path = %path.display());
    let _guard = span.enter();
    let report = read_batch(path).context("read remittance")?;
    info!(
        records = report.total_records(),
        issues = report.issues.len(),
        "verification complete"
    );
    Ok(report)
}
