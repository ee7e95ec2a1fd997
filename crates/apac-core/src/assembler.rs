//! Batch assembly.
//!
//! Rows are processed in extract order. Each row takes the next number from
//! the pool; a row that cannot be encoded hands its number back so the next
//! row receives it. Records are only built in memory here; nothing touches
//! the filesystem until [`commit_batch`](crate::commit_batch).

use std::time::Instant;

use apac_layout::{
    FieldValues, Record, encode_clinical_summary, encode_header, encode_patient_body,
    encode_procedure_block, fields,
};
use apac_model::patient::keys;
use apac_model::{AuthorizationNumber, PatientRow, ProcedureLine};
use apac_pool::NumberPool;
use tracing::{debug, info, info_span, warn};

use crate::config::RunConfig;
use crate::error::{BatchError, Result};
use crate::outcome::{GeneratedRow, RowFailure, RowOutcome};
use crate::patient::derive_patient_fields;
use crate::reference::ReferenceData;

/// Running counters of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub attempted: usize,
    pub generated: usize,
    pub failed: usize,
    pub first_number: Option<AuthorizationNumber>,
    pub last_number: Option<AuthorizationNumber>,
    /// Numbers left in the pool after assembly.
    pub remaining_numbers: usize,
}

/// Progress notification sent after each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowProgress {
    /// 1-based row just processed.
    pub row: usize,
    pub total: usize,
    pub generated: usize,
    pub failed: usize,
}

/// A fully assembled, not yet written remittance.
#[derive(Debug, Clone)]
pub struct Batch {
    pub header: Record,
    /// Patient groups in extract order (body, summary, procedures).
    pub records: Vec<Record>,
    pub procedures: Vec<ProcedureLine>,
    pub failures: Vec<RowFailure>,
    pub stats: BatchStats,
}

impl Batch {
    /// Header first, then every patient group.
    pub fn all_records(&self) -> impl Iterator<Item = &Record> {
        std::iter::once(&self.header).chain(self.records.iter())
    }

    pub fn record_count(&self) -> usize {
        1 + self.records.len()
    }

    pub fn byte_len(&self) -> usize {
        self.all_records().map(Record::len).sum()
    }
}

/// Builds a [`Batch`] from patient rows and a number pool.
pub struct BatchAssembler<'a> {
    config: &'a RunConfig,
    references: &'a ReferenceData,
    progress: Option<Box<dyn FnMut(RowProgress) + 'a>>,
}

impl<'a> BatchAssembler<'a> {
    pub fn new(config: &'a RunConfig, references: &'a ReferenceData) -> Self {
        Self {
            config,
            references,
            progress: None,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, callback: impl FnMut(RowProgress) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Build every record of one patient under `number`.
    ///
    /// A bad date is a [`RowOutcome::Failed`]; a layout violation is an
    /// error and aborts the batch.
    pub fn assemble_row(
        &self,
        row_index: usize,
        row: &PatientRow,
        number: &AuthorizationNumber,
    ) -> Result<RowOutcome> {
        let derived = match derive_patient_fields(row, number, self.config, self.references) {
            Ok(derived) => derived,
            Err(reason) => {
                return Ok(RowOutcome::Failed(RowFailure {
                    row: row_index,
                    patient: row.get(keys::NAME).trim().to_string(),
                    number: number.clone(),
                    reason,
                }));
            }
        };

        let mut records = Vec::with_capacity(2 + derived.procedure_set.secondary.len() + 1);
        records.push(encode_patient_body(&derived.body)?);
        records.push(encode_clinical_summary(&derived.summary)?);
        records.extend(encode_procedure_block(
            &derived.procedure,
            derived.procedure_set,
            &derived.third_party_facility,
        )?);
        debug!(
            row = row_index,
            number = %number,
            age = derived.age,
            procedures = records.len() - 2,
            "row encoded"
        );

        Ok(RowOutcome::Generated(GeneratedRow {
            row: row_index,
            number: number.clone(),
            records,
            procedures: derived.procedure_lines(),
        }))
    }

    /// Assemble `rows` against `pool`.
    ///
    /// # Errors
    ///
    /// [`BatchError::NumbersExhausted`] when the pool runs dry before the
    /// last row, [`BatchError::Layout`] when a record breaks its layout.
    /// Either way the pool keeps the in-memory state of the failed attempt;
    /// callers must not persist it.
    pub fn assemble(&mut self, rows: &[PatientRow], pool: &mut NumberPool) -> Result<Batch> {
        let span = info_span!("assemble", rows = rows.len());
        let _guard = span.enter();
        let start = Instant::now();

        let mut stats = BatchStats::default();
        let mut records = Vec::new();
        let mut procedures = Vec::new();
        let mut failures = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            let row_index = idx + 1;
            let Some((number, _)) = pool.consume() else {
                return Err(BatchError::NumbersExhausted {
                    generated: stats.generated,
                    pending: rows.len() - idx,
                });
            };
            stats.attempted += 1;

            match self.assemble_row(row_index, row, &number)? {
                RowOutcome::Generated(generated) => {
                    stats.generated += 1;
                    if stats.first_number.is_none() {
                        stats.first_number = Some(generated.number.clone());
                    }
                    stats.last_number = Some(generated.number);
                    records.extend(generated.records);
                    procedures.extend(generated.procedures);
                }
                RowOutcome::Failed(failure) => {
                    warn!(
                        row = failure.row,
                        number = %failure.number,
                        reason = %failure.reason,
                        "row skipped, number returned to pool"
                    );
                    pool.give_back(failure.number.clone());
                    stats.failed += 1;
                    failures.push(failure);
                }
            }

            if let Some(progress) = self.progress.as_mut() {
                progress(RowProgress {
                    row: row_index,
                    total: rows.len(),
                    generated: stats.generated,
                    failed: stats.failed,
                });
            }
        }
        stats.remaining_numbers = pool.len();

        let header = self.encode_header(&stats, &procedures)?;
        info!(
            generated = stats.generated,
            failed = stats.failed,
            remaining_numbers = stats.remaining_numbers,
            duration_ms = start.elapsed().as_millis(),
            "batch assembled"
        );

        Ok(Batch {
            header,
            records,
            procedures,
            failures,
            stats,
        })
    }

    fn encode_header(&self, stats: &BatchStats, procedures: &[ProcedureLine]) -> Result<Record> {
        let profile = &self.config.profile;
        let values = FieldValues::new()
            .with(fields::PERIOD, &self.config.period)
            .with(fields::RECORD_COUNT, &stats.generated)
            .with(fields::ORIGIN_NAME, &profile.origin_name)
            .with(fields::ORIGIN_ACRONYM, &profile.origin_acronym)
            .with(fields::TAX_ID, &profile.tax_id)
            .with(fields::DESTINATION_NAME, &profile.destination_name)
            .with(fields::DESTINATION_INDICATOR, &profile.destination_indicator)
            .with(fields::GENERATION_DATE, &self.config.generation_date_text())
            .with(fields::LAYOUT_VERSION, &self.config.layout_version);
        let representative = stats
            .last_number
            .as_ref()
            .map(AuthorizationNumber::as_str)
            .unwrap_or_default();
        Ok(encode_header(&values, procedures, representative)?)
    }
}
