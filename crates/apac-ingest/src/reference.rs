//! Reference tables (physicians, requesting facilities).
//!
//! Each table is reduced to `(key, code)` pairs: the column searched by name
//! and the column holding the identifier to return.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::info;

use crate::encoding::read_text;
use crate::error::{IngestError, Result};
use crate::patients::{DELIMITER, normalize_cell, normalize_header};

/// Physician table: full name and CNS card number.
pub const PHYSICIAN_KEY_COLUMN: &str = "nome_completo";
pub const PHYSICIAN_CODE_COLUMN: &str = "cartao_sus";

/// Facility table: description and CNES code.
pub const FACILITY_KEY_COLUMN: &str = "desc_solicitante";
pub const FACILITY_CODE_COLUMN: &str = "cod_solicitante";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub key: String,
    pub code: String,
}

/// An ordered lookup table; earlier rows win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceTable {
    pub fn new(entries: impl IntoIterator<Item = ReferenceEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// First entry whose key contains `query`, ignoring case.
    ///
    /// An empty query never matches.
    pub fn find(&self, query: &str) -> Option<&ReferenceEntry> {
        let needle = query.trim().to_uppercase();
        if needle.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.key.to_uppercase().contains(&needle))
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse decoded table text. `source` only labels errors.
pub fn parse_reference_table(
    text: &str,
    source: &Path,
    key_column: &str,
    code_column: &str,
) -> Result<ReferenceTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let csv_error = |err: csv::Error| IngestError::CsvParse {
        path: source.to_path_buf(),
        message: err.to_string(),
    };

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record.map_err(csv_error)?.iter().map(normalize_header).collect(),
        None => {
            return Err(IngestError::EmptyCsv {
                path: source.to_path_buf(),
            });
        }
    };
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
                path: source.to_path_buf(),
            })
    };
    let key_idx = column(key_column)?;
    let code_idx = column(code_column)?;

    let mut entries = Vec::new();
    for record in records {
        let record = record.map_err(csv_error)?;
        let key = normalize_cell(record.get(key_idx).unwrap_or(""));
        if key.is_empty() {
            continue;
        }
        let code = normalize_cell(record.get(code_idx).unwrap_or(""));
        entries.push(ReferenceEntry { key, code });
    }
    Ok(ReferenceTable { entries })
}

/// Read a reference table from `path`.
pub fn read_reference_table(
    path: &Path,
    key_column: &str,
    code_column: &str,
) -> Result<ReferenceTable> {
    let text = read_text(path)?;
    let table = parse_reference_table(&text, path, key_column, code_column)?;
    info!(path = %path.display(), entries = table.len(), "reference table loaded");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physicians() -> ReferenceTable {
        let text = "id;nome_completo;cartao_sus\n1;Maria Souza Lima;704800067495842\n2;Mario Souza;700000000000001\n";
        parse_reference_table(
            text,
            Path::new("medicos.csv"),
            PHYSICIAN_KEY_COLUMN,
            PHYSICIAN_CODE_COLUMN,
        )
        .unwrap()
    }

    #[test]
    fn test_find_is_case_insensitive_substring() {
        let table = physicians();
        let hit = table.find("souza lima").unwrap();
        assert_eq!(hit.code, "704800067495842");
    }

    #[test]
    fn test_first_match_wins() {
        let table = physicians();
        assert_eq!(table.find("SOUZA").unwrap().key, "Maria Souza Lima");
    }

    #[test]
    fn test_empty_query_and_miss() {
        let table = physicians();
        assert!(table.find("  ").is_none());
        assert!(table.find("JOSE").is_none());
    }

    #[test]
    fn test_missing_column() {
        let err = parse_reference_table(
            "nome;cns\n",
            Path::new("medicos.csv"),
            PHYSICIAN_KEY_COLUMN,
            PHYSICIAN_CODE_COLUMN,
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "nome_completo"));
    }
}
