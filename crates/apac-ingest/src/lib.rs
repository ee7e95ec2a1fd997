//! Input collaborators for remittance generation.
//!
//! - [`read_patient_csv`]: the `;`-separated patient extract, decoded from
//!   UTF-8 or Windows-1252, with captions mapped to stable keys and date
//!   cells normalised to `YYYYMMDD`
//! - [`read_reference_table`]: physician and facility tables with
//!   case-insensitive substring lookup

mod dates;
mod encoding;
mod error;
mod patients;
mod reference;

pub use dates::{normalize_date, normalize_date_cell};
pub use encoding::{decode_text, read_text};
pub use error::{IngestError, Result};
pub use patients::{DELIMITER, canonical_key, parse_patient_csv, read_patient_csv};
pub use reference::{
    FACILITY_CODE_COLUMN, FACILITY_KEY_COLUMN, PHYSICIAN_CODE_COLUMN, PHYSICIAN_KEY_COLUMN,
    ReferenceEntry, ReferenceTable, parse_reference_table, read_reference_table,
};
