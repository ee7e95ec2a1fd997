//! Patient extract reader.
//!
//! The extract is a `;`-separated table exported from the scheduling system.
//! Column captions vary between exports (accented or not, extra words), so
//! each caption is mapped to one stable key before rows are built.

use std::path::Path;

use apac_model::PatientRow;
use apac_model::patient::keys;
use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::dates::normalize_date_cell;
use crate::encoding::read_text;
use crate::error::{IngestError, Result};

/// Field delimiter of every input table.
pub const DELIMITER: u8 = b';';

pub(crate) fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Map an export caption to its stable key. Unknown captions pass through.
pub fn canonical_key(header: &str) -> String {
    let upper = header.to_uppercase();
    let key = if header.contains("Hor") {
        keys::CONSULTATION_DATE
    } else if header.contains("Mãe") || upper.contains("MAE") || upper.contains("MÃE") {
        keys::MOTHER
    } else if header.contains("Ra") && header.contains("Cor") {
        keys::RACE
    } else if header.contains("Profissional") {
        keys::PHYSICIAN
    } else if header.contains("Unidade") {
        keys::FACILITY
    } else if header.contains("Nascimento") {
        keys::BIRTH_DATE
    } else {
        return header.to_string();
    };
    key.to_string()
}

fn is_index_column(header: &str) -> bool {
    header.is_empty() || header.starts_with("Unnamed")
}

/// Parse already-decoded extract text. `source` only labels errors.
pub fn parse_patient_csv(text: &str, source: &Path) -> Result<Vec<PatientRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header_record = match records.next() {
        Some(record) => record.map_err(|err| IngestError::CsvParse {
            path: source.to_path_buf(),
            message: err.to_string(),
        })?,
        None => {
            return Err(IngestError::EmptyCsv {
                path: source.to_path_buf(),
            });
        }
    };

    let raw_headers: Vec<String> = header_record.iter().map(normalize_header).collect();
    let skip = usize::from(raw_headers.first().is_some_and(|first| is_index_column(first)));
    let headers: Vec<String> = raw_headers[skip..]
        .iter()
        .map(|header| canonical_key(header))
        .collect();
    debug!(columns = ?headers, "patient columns");

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|err| IngestError::CsvParse {
            path: source.to_path_buf(),
            message: err.to_string(),
        })?;
        let cells: Vec<String> = record.iter().skip(skip).map(normalize_cell).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        let mut row = PatientRow::new();
        for (idx, header) in headers.iter().enumerate() {
            let value = cells.get(idx).map(String::as_str).unwrap_or("");
            let value = if header == keys::BIRTH_DATE || header == keys::CONSULTATION_DATE {
                normalize_date_cell(value)
            } else {
                value.to_string()
            };
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Read the patient extract at `path`.
pub fn read_patient_csv(path: &Path) -> Result<Vec<PatientRow>> {
    let text = read_text(path)?;
    let rows = parse_patient_csv(&text, path)?;
    info!(path = %path.display(), rows = rows.len(), "patient extract loaded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_keys() {
        assert_eq!(canonical_key("Data/Hora"), keys::CONSULTATION_DATE);
        assert_eq!(canonical_key("Nome da Mãe"), keys::MOTHER);
        assert_eq!(canonical_key("NOME MAE"), keys::MOTHER);
        assert_eq!(canonical_key("Raça/Cor"), keys::RACE);
        assert_eq!(canonical_key("Profissional Solicitante"), keys::PHYSICIAN);
        assert_eq!(canonical_key("Unidade Solicitante"), keys::FACILITY);
        assert_eq!(canonical_key("Data de Nascimento"), keys::BIRTH_DATE);
        assert_eq!(canonical_key("Cartão SUS"), keys::CNS);
        assert_eq!(canonical_key("Nome"), keys::NAME);
    }

    #[test]
    fn test_normalize_header_collapses_spaces() {
        assert_eq!(normalize_header("\u{feff} Contato   1 "), "Contato 1");
    }

    #[test]
    fn test_index_column_is_dropped() {
        let text = ";Nome;Nascimento;Data Hora\n0;ANA;01/02/2010;05/03/2024 10:00\n";
        let rows = parse_patient_csv(text, Path::new("p.csv")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(keys::NAME), "ANA");
        assert_eq!(rows[0].get(keys::BIRTH_DATE), "20100201");
        assert_eq!(rows[0].get(keys::CONSULTATION_DATE), "20240305");
        assert_eq!(rows[0].len(), 3);
    }

    #[test]
    fn test_short_rows_are_padded_and_blank_rows_skipped() {
        let text = "Nome;CPF;CID\nANA\n;;\nBIA;123;H52\n";
        let rows = parse_patient_csv(text, Path::new("p.csv")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(keys::CPF), "");
        assert!(rows[0].contains(keys::CID));
        assert_eq!(rows[1].get(keys::CID), "H52");
    }

    #[test]
    fn test_empty_input() {
        let err = parse_patient_csv("", Path::new("p.csv")).unwrap_err();
        assert!(matches!(err, IngestError::EmptyCsv { .. }));
    }
}
