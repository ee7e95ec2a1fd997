use std::fs;
use std::path::PathBuf;

use apac_ingest::{
    FACILITY_CODE_COLUMN, FACILITY_KEY_COLUMN, IngestError, read_patient_csv,
    read_reference_table,
};
use apac_model::patient::keys;

fn write_fixture(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn reads_windows_1252_extract() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b";Nome;Nome da M\xE3e;Ra\xE7a/Cor;Data Nascimento;Data/Hor\xE1rio;Cart\xE3o SUS\r\n");
    bytes.extend_from_slice(b"0;JO\xC3O;MARIA;PARDA;15/06/2012;05/03/2024 08:15;898001160000000\r\n");
    let path = write_fixture(&dir, "pacientes.csv", &bytes);

    let rows = read_patient_csv(&path).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.get(keys::NAME), "JOÃO");
    assert_eq!(row.get(keys::MOTHER), "MARIA");
    assert_eq!(row.get(keys::RACE), "PARDA");
    assert_eq!(row.get(keys::BIRTH_DATE), "20120615");
    assert_eq!(row.get(keys::CONSULTATION_DATE), "20240305");
    assert_eq!(row.get(keys::CNS), "898001160000000");
}

#[test]
fn reads_utf8_extract_with_bom() {
    let dir = tempfile::tempdir().unwrap();
    let text = "\u{feff}Nome;Profissional;Unidade;Nascimento;Hora\nANA;DR X;UBS CENTRO;1990-01-02;bad\n";
    let path = write_fixture(&dir, "pacientes.csv", text.as_bytes());

    let rows = read_patient_csv(&path).unwrap();
    assert_eq!(rows[0].get(keys::NAME), "ANA");
    assert_eq!(rows[0].get(keys::PHYSICIAN), "DR X");
    assert_eq!(rows[0].get(keys::FACILITY), "UBS CENTRO");
    assert_eq!(rows[0].get(keys::BIRTH_DATE), "19900102");
    assert_eq!(rows[0].get(keys::CONSULTATION_DATE), "bad");
}

#[test]
fn missing_extract_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_patient_csv(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn facility_table_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let text = "cod_solicitante;desc_solicitante\n2081458;UBS Vila Nova\n2081466;UBS Centro\n";
    let path = write_fixture(&dir, "estabelecimentos.csv", text.as_bytes());

    let table = read_reference_table(&path, FACILITY_KEY_COLUMN, FACILITY_CODE_COLUMN).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.find("ubs centro").map(|e| e.code.as_str()), Some("2081466"));
    assert_eq!(table.find("HOSPITAL"), None);
}
