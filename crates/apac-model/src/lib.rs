//! Shared value types for APAC remittance generation.
//!
//! Every crate in the workspace speaks in these types: the 13-digit
//! [`AuthorizationNumber`], the reporting [`Period`], the layout
//! [`LayoutVersion`], a [`ProcedureLine`] and the raw [`PatientRow`].

pub mod error;
pub mod ids;
pub mod patient;
pub mod procedure;

pub use error::{ModelError, Result};
pub use ids::{AuthorizationNumber, LayoutVersion, Period};
pub use patient::PatientRow;
pub use procedure::ProcedureLine;
