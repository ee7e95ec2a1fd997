use apac_layout::{
    FieldValues, RecordKind, compute_control_field, encode_clinical_summary, encode_header,
    encode_patient_body, encode_procedure_block, fields, format_alpha, format_numeric, read_batch,
    select_procedure_set, write_batch,
};
use apac_model::ProcedureLine;
use proptest::prelude::*;

fn patient(number: &str) -> FieldValues {
    FieldValues::new()
        .with(fields::PERIOD, "202403")
        .with(fields::AUTHORIZATION_NUMBER, number)
}

proptest! {
    #[test]
    fn numeric_fields_have_exact_width(value in ".{0,40}", width in 1usize..20) {
        let out = format_numeric(value.as_str(), width);
        prop_assert_eq!(out.len(), width);
        prop_assert!(out.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn alpha_fields_are_ascii_with_exact_width(value in "\\PC{0,60}", width in 1usize..40) {
        let out = format_alpha(value.as_str(), width);
        prop_assert_eq!(out.len(), width);
        prop_assert!(out.is_ascii());
        prop_assert!(!out.contains(['\r', '\n', '\t', '\0']));
    }

    #[test]
    fn control_field_stays_in_range(
        number in "[0-9]{13}",
        quantities in proptest::collection::vec(1u32..10_000, 0..12),
    ) {
        let procedures: Vec<_> = quantities
            .iter()
            .map(|&quantity| ProcedureLine::new("021106002-0", quantity))
            .collect();
        let control: u32 = compute_control_field(&procedures, &number).parse().unwrap();
        prop_assert!((1111..=2221).contains(&control));
    }

    #[test]
    fn body_length_holds_for_any_name(name in "\\PC{0,80}", mother in "\\PC{0,80}") {
        let values = patient("3525704099599")
            .with(fields::PATIENT_NAME, &name)
            .with(fields::MOTHER_NAME, &mother);
        let record = encode_patient_body(&values).unwrap();
        prop_assert_eq!(record.len(), 535);
        prop_assert!(record.as_str().is_ascii());
    }
}

#[test]
fn written_batch_verifies_clean() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("oci_oftalmo_202403.txt");

    let numbers = ["3525704099599", "3525704099600"];
    let mut records = Vec::new();
    let mut all_lines = Vec::new();
    for (number, age) in numbers.iter().zip([30, 5]) {
        let set = select_procedure_set(age);
        all_lines.extend(set.lines());
        let values = patient(number);
        records.push(encode_patient_body(&values.clone().with(fields::PATIENT_NAME, "ANA")).unwrap());
        records.push(encode_clinical_summary(&values.clone().with(fields::PRIMARY_CID, "H521")).unwrap());
        records.extend(encode_procedure_block(&values, set, "2081458").unwrap());
    }
    let header_values = FieldValues::new()
        .with(fields::PERIOD, "202403")
        .with(fields::RECORD_COUNT, &numbers.len())
        .with(fields::ORIGIN_NAME, "SECRETARIA MUNICIPAL DE SAUDE")
        .with(fields::GENERATION_DATE, "20240405")
        .with(fields::LAYOUT_VERSION, "03.18");
    let header = encode_header(&header_values, &all_lines, numbers[1]).unwrap();

    let written = write_batch(&path, std::iter::once(&header).chain(records.iter())).unwrap();
    assert_eq!(written, 139 + 2 * (535 + 39) + 11 * 99);

    let report = read_batch(&path).unwrap();
    assert!(report.is_valid(), "{:?}", report.issues);
    assert_eq!(report.patient_records, 2);
    assert_eq!(report.summary_records, 2);
    assert_eq!(report.procedure_records, 11);
    assert_eq!(report.first_number.as_deref(), Some(numbers[0]));
    assert_eq!(report.last_number.as_deref(), Some(numbers[1]));
    let header = report.header.unwrap();
    assert_eq!(header.record_count, 2);
    assert_eq!(header.layout_version, "03.18");
    assert_eq!(Some(header.control_field), report.computed_control);
}

#[test]
fn tampered_quantity_breaks_control() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("remessa.txt");
    let number = "3525704099599";
    let set = select_procedure_set(12);
    let procedures = encode_procedure_block(&patient(number), set, "").unwrap();
    let header = encode_header(
        &FieldValues::new().with(fields::RECORD_COUNT, &1usize),
        &set.lines(),
        number,
    )
    .unwrap();
    let body = encode_patient_body(&patient(number)).unwrap();
    let summary = encode_clinical_summary(&patient(number)).unwrap();
    let mut text: String = [&header, &body, &summary]
        .into_iter()
        .chain(procedures.iter())
        .map(|record| record.as_str())
        .collect();

    // Bump the first procedure's quantity from 1 to 3.
    let first_procedure = 139 + 535 + 39;
    let quantity_end = first_procedure + 44;
    text.replace_range(quantity_end - 1..quantity_end, "3");
    std::fs::write(&path, &text).unwrap();

    let report = read_batch(&path).unwrap();
    assert_eq!(report.issues.len(), 1);
    assert!(report.issues[0].message.contains("control field"));
}

#[test]
fn every_kind_starts_with_its_indicator() {
    let values = patient("3525704099599");
    let body = encode_patient_body(&values).unwrap();
    let summary = encode_clinical_summary(&values).unwrap();
    let header = encode_header(&FieldValues::new(), &[], "").unwrap();
    for record in [&header, &body, &summary] {
        assert!(record.as_str().starts_with(record.kind().indicator()));
        assert_eq!(record.len(), record.kind().length());
    }
    assert_eq!(RecordKind::from_indicator("13"), Some(RecordKind::Procedure));
}
