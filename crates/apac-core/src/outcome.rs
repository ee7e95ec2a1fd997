//! Per-row results.

use apac_layout::Record;
use apac_model::{AuthorizationNumber, ProcedureLine};
use thiserror::Error;

/// Why a patient row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowFailureReason {
    #[error("invalid birth date '{0}'")]
    InvalidBirthDate(String),

    #[error("invalid consultation date '{0}'")]
    InvalidConsultationDate(String),
}

/// A skipped row. Its number has already been returned to the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based position in the extract.
    pub row: usize,
    pub patient: String,
    pub number: AuthorizationNumber,
    pub reason: RowFailureReason,
}

/// Records produced for one patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRow {
    pub row: usize,
    pub number: AuthorizationNumber,
    /// Body, clinical summary, then procedures.
    pub records: Vec<Record>,
    pub procedures: Vec<ProcedureLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Generated(GeneratedRow),
    Failed(RowFailure),
}

impl RowOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    pub fn number(&self) -> &AuthorizationNumber {
        match self {
            Self::Generated(generated) => &generated.number,
            Self::Failed(failure) => &failure.number,
        }
    }
}
