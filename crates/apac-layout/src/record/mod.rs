//! Record encoding.
//!
//! Every encoder follows the same steps: look up each schema field in the
//! input mapping (absent means empty), format it to its width in schema
//! order, append CR LF and check the total against the kind's byte length.

mod body;
mod header;
mod procedure;
mod summary;

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LayoutError, Result};
use crate::format::{FieldText, format_alpha, format_numeric};
use crate::schema::{FieldKind, LINE_TERMINATOR, RecordKind, RecordSchema};

pub use body::encode_patient_body;
pub use header::encode_header;
pub use procedure::{encode_procedure, encode_procedure_block};
pub use summary::encode_clinical_summary;

/// Field values keyed by schema field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<String, String>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: FieldText + ?Sized>(&mut self, name: &str, value: &T) -> &mut Self {
        self.values
            .insert(name.to_string(), value.field_text().into_owned());
        self
    }

    #[must_use]
    pub fn with<T: FieldText + ?Sized>(mut self, name: &str, value: &T) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Reject names the schema does not define.
    fn check_against(&self, schema: &RecordSchema) -> Result<()> {
        match self.names().find(|name| !schema.contains(name)) {
            Some(name) => Err(LayoutError::UnknownField {
                kind: schema.kind,
                field: name.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// One encoded fixed-width record, line terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: RecordKind,
    text: String,
}

impl Record {
    #[cfg(test)]
    pub(crate) fn unchecked(kind: RecordKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Value of a named field as written (padding included).
    pub fn field(&self, name: &str) -> Option<&str> {
        let range = self.kind.schema().range_of(name)?;
        self.text.get(range)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Encode `values` against `schema`.
///
/// # Errors
///
/// [`LayoutError::UnknownField`] when `values` names a field outside the
/// schema, [`LayoutError::RecordLength`] when the assembled record does not
/// have the kind's exact length.
pub fn encode_record(schema: &RecordSchema, values: &FieldValues) -> Result<Record> {
    values.check_against(schema)?;

    let mut text = String::with_capacity(schema.kind.length());
    for field in schema.fields {
        let formatted = match field.kind {
            FieldKind::Numeric => format_numeric(values.get(field.name), field.width),
            FieldKind::Alpha => format_alpha(values.get(field.name), field.width),
            FieldKind::Constant(literal) => format_alpha(literal, field.width),
        };
        text.push_str(&formatted);
    }
    text.push_str(LINE_TERMINATOR);

    finish(schema.kind, text)
}

fn finish(kind: RecordKind, text: String) -> Result<Record> {
    let expected = kind.length();
    if text.len() != expected {
        return Err(LayoutError::RecordLength {
            kind,
            actual: text.len(),
            expected,
        });
    }
    Ok(Record { kind, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CLINICAL_SUMMARY, fields};

    #[test]
    fn test_absent_fields_render_blank() {
        let record = encode_record(&CLINICAL_SUMMARY, &FieldValues::new()).unwrap();
        let expected = format!("06{}{}\r\n", "0".repeat(19), " ".repeat(16));
        assert_eq!(record.as_str(), expected);
        assert_eq!(record.len(), 39);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let values = FieldValues::new().with("apa_cmp", "202403");
        let err = encode_record(&CLINICAL_SUMMARY, &values).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::UnknownField { kind: RecordKind::ClinicalSummary, ref field } if field == "apa_cmp"
        ));
    }

    #[test]
    fn test_constant_ignores_input() {
        let values = FieldValues::new().with(fields::INDICATOR, "99");
        let record = encode_record(&CLINICAL_SUMMARY, &values).unwrap();
        assert!(record.as_str().starts_with("06"));
    }

    #[test]
    fn test_finish_rejects_wrong_length() {
        let err = finish(RecordKind::ClinicalSummary, "06\r\n".to_string()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::RecordLength {
                kind: RecordKind::ClinicalSummary,
                actual: 4,
                expected: 39
            }
        ));
    }

    #[test]
    fn test_field_accessor() {
        let values = FieldValues::new()
            .with(fields::PERIOD, "202403")
            .with(fields::PRIMARY_CID, "H52");
        let record = encode_record(&CLINICAL_SUMMARY, &values).unwrap();
        assert_eq!(record.field(fields::PERIOD), Some("202403"));
        assert_eq!(record.field(fields::PRIMARY_CID), Some("H52 "));
        assert_eq!(record.field("nope"), None);
    }
}
