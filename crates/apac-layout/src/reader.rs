//! Remittance file verification.
//!
//! Reads a finished file back and checks it record by record: line framing,
//! record lengths, ordering, the header's record count and control field,
//! and that every clinical summary and procedure belongs to the patient body
//! before it. Problems are collected, not raised, so one pass reports all of
//! them.

use std::fs;
use std::path::Path;

use apac_model::ProcedureLine;
use tracing::debug;

use crate::control::compute_control_field;
use crate::error::{LayoutError, Result};
use crate::schema::{LINE_TERMINATOR, RecordKind, fields};

/// Header fields of a verified batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSummary {
    pub period: String,
    pub record_count: u64,
    pub control_field: String,
    pub origin_name: String,
    pub generation_date: String,
    pub layout_version: String,
}

/// A single verification finding. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyIssue {
    pub line: usize,
    pub message: String,
}

impl VerifyIssue {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Outcome of [`verify_batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub header: Option<HeaderSummary>,
    pub patient_records: usize,
    pub summary_records: usize,
    pub procedure_records: usize,
    pub first_number: Option<String>,
    pub last_number: Option<String>,
    /// Control field recomputed from the file's own procedure records.
    pub computed_control: Option<String>,
    pub issues: Vec<VerifyIssue>,
}

impl BatchReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn total_records(&self) -> usize {
        usize::from(self.header.is_some())
            + self.patient_records
            + self.summary_records
            + self.procedure_records
    }
}

fn field<'a>(line: &'a str, kind: RecordKind, name: &str) -> &'a str {
    kind.schema()
        .range_of(name)
        .and_then(|range| line.get(range))
        .unwrap_or("")
}

fn parse_header(line: &str) -> HeaderSummary {
    let kind = RecordKind::Header;
    HeaderSummary {
        period: field(line, kind, fields::PERIOD).to_string(),
        record_count: field(line, kind, fields::RECORD_COUNT).parse().unwrap_or(0),
        control_field: field(line, kind, fields::CONTROL_FIELD).to_string(),
        origin_name: field(line, kind, fields::ORIGIN_NAME).trim_end().to_string(),
        generation_date: field(line, kind, fields::GENERATION_DATE).to_string(),
        layout_version: field(line, kind, fields::LAYOUT_VERSION)
            .trim_end()
            .to_string(),
    }
}

/// Split `text` into records, keeping track of lines missing their CR.
fn split_records(text: &str) -> Vec<(&str, bool)> {
    let mut records = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find('\n') {
            Some(pos) => {
                let line = &rest[..pos];
                let framed = line.ends_with('\r');
                records.push((line.strip_suffix('\r').unwrap_or(line), framed));
                rest = &rest[pos + 1..];
            }
            None => {
                records.push((rest, false));
                rest = "";
            }
        }
    }
    records
}

/// Verify remittance bytes already in memory.
pub fn verify_batch(bytes: &[u8]) -> BatchReport {
    let mut report = BatchReport::default();

    let text = match std::str::from_utf8(bytes) {
        Ok(text) if text.is_ascii() => text,
        _ => {
            let offset = bytes.iter().position(|b| !b.is_ascii()).unwrap_or(0);
            let line = bytes[..offset].iter().filter(|&&b| b == b'\n').count() + 1;
            report
                .issues
                .push(VerifyIssue::new(line, "file contains non-ASCII bytes"));
            return report;
        }
    };

    let mut procedures = Vec::new();
    let mut current_number: Option<String> = None;

    for (idx, (line, framed)) in split_records(text).into_iter().enumerate() {
        let line_no = idx + 1;
        if !framed {
            report
                .issues
                .push(VerifyIssue::new(line_no, "record is not terminated by CR LF"));
        }

        let indicator = line.get(..2).unwrap_or(line);
        let Some(kind) = RecordKind::from_indicator(indicator) else {
            report.issues.push(VerifyIssue::new(
                line_no,
                format!("unknown record indicator '{indicator}'"),
            ));
            continue;
        };

        let actual = line.len() + LINE_TERMINATOR.len();
        if actual != kind.length() {
            report.issues.push(VerifyIssue::new(
                line_no,
                format!("{kind} record has {actual} bytes, expected {}", kind.length()),
            ));
            continue;
        }

        if kind == RecordKind::Header {
            if line_no != 1 || report.header.is_some() {
                report
                    .issues
                    .push(VerifyIssue::new(line_no, "header record must appear once, first"));
            }
            if report.header.is_none() {
                report.header = Some(parse_header(line));
            }
            continue;
        }
        if line_no == 1 {
            report
                .issues
                .push(VerifyIssue::new(line_no, "file does not start with a header"));
        }

        let number = field(line, kind, fields::AUTHORIZATION_NUMBER).to_string();
        match kind {
            RecordKind::PatientBody => {
                report.patient_records += 1;
                if report.first_number.is_none() {
                    report.first_number = Some(number.clone());
                }
                report.last_number = Some(number.clone());
                current_number = Some(number);
            }
            RecordKind::ClinicalSummary | RecordKind::Procedure => {
                if kind == RecordKind::ClinicalSummary {
                    report.summary_records += 1;
                } else {
                    report.procedure_records += 1;
                    let code = field(line, kind, fields::PROCEDURE_CODE);
                    let quantity = field(line, kind, fields::QUANTITY).parse().unwrap_or(0);
                    procedures.push(ProcedureLine::new(code, quantity));
                }
                match &current_number {
                    Some(expected) if *expected == number => {}
                    Some(expected) => report.issues.push(VerifyIssue::new(
                        line_no,
                        format!(
                            "{kind} record carries authorization {number}, patient body has {expected}"
                        ),
                    )),
                    None => report.issues.push(VerifyIssue::new(
                        line_no,
                        format!("{kind} record appears before any patient body"),
                    )),
                }
            }
            RecordKind::Header => {}
        }
    }

    let computed = compute_control_field(
        &procedures,
        report.last_number.as_deref().unwrap_or_default(),
    );
    match &report.header {
        Some(header) => {
            if header.record_count != report.patient_records as u64 {
                report.issues.push(VerifyIssue::new(
                    1,
                    format!(
                        "header declares {} patient records, file has {}",
                        header.record_count, report.patient_records
                    ),
                ));
            }
            if header.control_field != computed {
                report.issues.push(VerifyIssue::new(
                    1,
                    format!(
                        "header control field is {}, records give {computed}",
                        header.control_field
                    ),
                ));
            }
        }
        None => report
            .issues
            .push(VerifyIssue::new(1, "file has no header record")),
    }
    report.computed_control = Some(computed);

    report
}

/// Read and verify the remittance file at `path`.
pub fn read_batch(path: &Path) -> Result<BatchReport> {
    let bytes = fs::read(path).map_err(|e| LayoutError::io("read", path, e))?;
    let report = verify_batch(&bytes);
    debug!(
        path = %path.display(),
        records = report.total_records(),
        issues = report.issues.len(),
        "remittance verified"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldValues, encode_clinical_summary, encode_header, encode_procedure};

    const NUMBER: &str = "3525704099599";

    fn batch(record_count: usize, control_number: &str) -> String {
        let lines = [ProcedureLine::new("090501003-5", 1)];
        let patient = FieldValues::new()
            .with(fields::PERIOD, "202403")
            .with(fields::AUTHORIZATION_NUMBER, NUMBER);
        let header = FieldValues::new()
            .with(fields::PERIOD, "202403")
            .with(fields::RECORD_COUNT, &record_count);
        let body = crate::record::encode_patient_body(&patient).unwrap();
        let summary = encode_clinical_summary(&patient).unwrap();
        let procedure = encode_procedure(&patient, &lines[0]).unwrap();
        let header = encode_header(&header, &lines, control_number).unwrap();
        [header, body, summary, procedure]
            .iter()
            .map(|record| record.as_str())
            .collect()
    }

    #[test]
    fn test_valid_batch() {
        let report = verify_batch(batch(1, NUMBER).as_bytes());
        assert!(report.is_valid(), "{:?}", report.issues);
        assert_eq!(report.patient_records, 1);
        assert_eq!(report.summary_records, 1);
        assert_eq!(report.procedure_records, 1);
        assert_eq!(report.total_records(), 4);
        assert_eq!(report.last_number.as_deref(), Some(NUMBER));
        assert_eq!(report.header.unwrap().period, "202403");
    }

    #[test]
    fn test_record_count_mismatch() {
        let report = verify_batch(batch(2, NUMBER).as_bytes());
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].message.contains("declares 2"));
    }

    #[test]
    fn test_control_mismatch() {
        let report = verify_batch(batch(1, "0000000000001").as_bytes());
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].message.contains("control field"));
    }

    #[test]
    fn test_bare_newline_is_reported() {
        let text = batch(1, NUMBER).replacen("\r\n", "\n", 1);
        let report = verify_batch(text.as_bytes());
        assert!(
            report
                .issues
                .iter()
                .any(|issue| issue.line == 1 && issue.message.contains("CR LF"))
        );
    }

    #[test]
    fn test_non_ascii_is_reported() {
        let mut bytes = batch(1, NUMBER).into_bytes();
        bytes.extend_from_slice("Ç".as_bytes());
        let report = verify_batch(&bytes);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line, 5);
    }

    #[test]
    fn test_missing_header() {
        let text = batch(1, NUMBER);
        let without_header = &text[139..];
        let report = verify_batch(without_header.as_bytes());
        assert!(report.header.is_none());
        assert!(!report.is_valid());
    }

    #[test]
    fn test_split_records() {
        assert_eq!(
            split_records("a\r\nb\nc"),
            vec![("a", true), ("b", false), ("c", false)]
        );
        assert!(split_records("").is_empty());
    }
}
