use std::fs;

use apac_model::AuthorizationNumber;
use apac_pool::{NumberPool, POOL_HEADER, backup, write_interval_report};

fn number(value: &str) -> AuthorizationNumber {
    AuthorizationNumber::new(value).unwrap()
}

#[test]
fn persist_then_load_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Numeração OCI.TXT");
    fs::write(&path, "NUMERAÇÃO APAC\n352570409959-9\n352570409960-0\n352570409961-1\n").unwrap();

    let mut pool = NumberPool::load(&path).unwrap();
    let (first, remaining) = pool.consume().unwrap();
    assert_eq!(first, number("3525704099599"));
    assert_eq!(remaining, 2);
    pool.persist(&path).unwrap();

    let reloaded = NumberPool::load(&path).unwrap();
    let numbers: Vec<_> = reloaded.iter().map(AuthorizationNumber::as_str).collect();
    assert_eq!(numbers, ["3525704099600", "3525704099611"]);
    assert!(!dir.path().join("Numeração OCI.TXT.tmp").exists());
}

#[test]
fn persisted_file_is_windows_1252() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pool.txt");
    NumberPool::new([number("3525704099599")]).persist(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(std::str::from_utf8(&bytes).is_err());
    let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(&bytes);
    assert_eq!(text, format!("{POOL_HEADER}\n352570409959-9\n"));
}

#[test]
fn given_back_number_is_next_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pool.txt");
    let mut pool = NumberPool::new([number("3525704099599"), number("3525704099600")]);

    let (taken, _) = pool.consume().unwrap();
    pool.give_back(taken.clone());
    pool.persist(&path).unwrap();

    let mut reloaded = NumberPool::load(&path).unwrap();
    assert_eq!(reloaded.consume().map(|(n, _)| n), Some(taken));
}

#[test]
fn failed_persist_leaves_no_staged_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("pool_dir");
    fs::create_dir(&target).unwrap();

    let result = NumberPool::new([number("3525704099599")]).persist(&target);

    assert!(result.is_err());
    assert!(!dir.path().join("pool_dir.tmp").exists());
    assert!(target.is_dir());
}

#[test]
fn exhausted_pool_reports_none() {
    let mut pool = NumberPool::new([number("3525704099599")]);
    assert_eq!(pool.consume().map(|(_, left)| left), Some(0));
    assert!(pool.consume().is_none());
}

#[test]
fn backup_copies_file_beside_original() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pool.TXT");
    fs::write(&path, "NUMERAÇÃO APAC\n352570409959-9\n").unwrap();

    let copy = backup(&path).unwrap();
    assert_eq!(copy.parent(), path.parent());
    let name = copy.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("pool_BACKUP_"));
    assert!(name.ends_with(".TXT"));
    assert_eq!(fs::read(&copy).unwrap(), fs::read(&path).unwrap());
}

#[test]
fn missing_pool_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = NumberPool::load(&dir.path().join("absent.txt")).unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}

#[test]
fn interval_report_lists_first_and_last() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("oci_oftalmo_202403.txt");
    let first = number("3525704099599");
    let last = number("3525704099600");

    let path = write_interval_report(&output, Some(&first), Some(&last)).unwrap();
    assert_eq!(path, dir.path().join("oci_oftalmo_202403_intervalo.txt"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "FIRST_NUMBER=3525704099599\nLAST_NUMBER=3525704099600\n"
    );
}
