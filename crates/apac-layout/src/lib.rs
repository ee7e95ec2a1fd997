//! APAC remittance record layout.
//!
//! This crate owns every byte of the remittance file:
//!
//! - field formatting ([`format_numeric`], [`format_alpha`]) with ASCII folding
//! - the four record schemas and their encoders (header `01`, patient body
//!   `14`, clinical summary `06`, procedure `13`)
//! - the header control field ([`compute_control_field`])
//! - age-banded procedure selection ([`select_procedure_set`])
//! - batch emission ([`write_batch`]) and verification ([`verify_batch`])
//!
//! # Example
//!
//! ```
//! use apac_layout::{FieldValues, RecordKind, encode_clinical_summary, fields};
//!
//! let values = FieldValues::new()
//!     .with(fields::PERIOD, "202403")
//!     .with(fields::AUTHORIZATION_NUMBER, "3525704099599")
//!     .with(fields::PRIMARY_CID, "H521");
//! let record = encode_clinical_summary(&values).unwrap();
//! assert_eq!(record.kind(), RecordKind::ClinicalSummary);
//! assert_eq!(record.len(), 39);
//! ```

pub mod ascii;
mod control;
mod error;
mod format;
mod reader;
pub mod record;
pub mod schema;
mod selection;
mod writer;

pub use control::{CONTROL_MODULUS, compute_control_field};
pub use error::{LayoutError, Result};
pub use format::{FieldText, format_alpha, format_numeric, sanitize_text};
pub use reader::{BatchReport, HeaderSummary, VerifyIssue, read_batch, verify_batch};
pub use record::{
    FieldValues, Record, encode_clinical_summary, encode_header, encode_patient_body,
    encode_procedure, encode_procedure_block, encode_record,
};
pub use schema::{FieldKind, FieldSpec, LINE_TERMINATOR, RecordKind, RecordSchema, fields};
pub use selection::{
    AGE_THRESHOLD, ProcedureSet, SecondaryProcedure, compute_age, select_procedure_set,
};
pub use writer::{BatchWriter, write_batch};
