//! APAC remittance batch assembly.
//!
//! A run reads patient rows, takes one authorization number per row from a
//! [`NumberPool`](apac_pool::NumberPool), derives every record field, and
//! collects the encoded records into a [`Batch`]. Rows with bad dates are
//! skipped and their numbers go back to the pool. [`commit_batch`] then
//! writes the remittance, the remaining pool and the interval report.

mod assembler;
mod commit;
mod config;
mod error;
mod outcome;
mod patient;
mod profile;
mod reference;

pub use assembler::{Batch, BatchAssembler, BatchStats, RowProgress};
pub use commit::{CommitReport, commit_batch};
pub use config::{OUTPUT_PREFIX, RunConfig};
pub use error::{BatchError, Result};
pub use outcome::{GeneratedRow, RowFailure, RowFailureReason, RowOutcome};
pub use patient::{
    ADULT_AGE, PatientFields, derive_patient_fields, primary_cid, race_code, sex_code,
};
pub use profile::RemittanceProfile;
pub use reference::{PhysicianRef, ReferenceData};
