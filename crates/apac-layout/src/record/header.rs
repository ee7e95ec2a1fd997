use apac_model::ProcedureLine;

use super::{FieldValues, Record, encode_record};
use crate::control::compute_control_field;
use crate::error::Result;
use crate::schema::{HEADER, fields};

/// Encode the `01` header record.
///
/// The control field is always computed here from the batch's full
/// procedure list and its representative authorization number; any
/// `control_field` value in `values` is replaced.
pub fn encode_header(
    values: &FieldValues,
    procedures: &[ProcedureLine],
    representative_number: &str,
) -> Result<Record> {
    let control = compute_control_field(procedures, representative_number);
    let values = values.clone().with(fields::CONTROL_FIELD, &control);
    encode_record(&HEADER, &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecordKind;

    fn header_values() -> FieldValues {
        FieldValues::new()
            .with(fields::PERIOD, "202403")
            .with(fields::RECORD_COUNT, &2usize)
            .with(fields::ORIGIN_NAME, "SECRETARIA MUNICIPAL DE SAUDE")
            .with(fields::ORIGIN_ACRONYM, "SMS")
            .with(fields::TAX_ID, "47.970.769/0001-04")
            .with(fields::DESTINATION_NAME, "SMS")
            .with(fields::DESTINATION_INDICATOR, "M")
            .with(fields::GENERATION_DATE, "20240405")
            .with(fields::LAYOUT_VERSION, "03.18")
    }

    #[test]
    fn test_header_layout() {
        let record = encode_header(&header_values(), &[], "0000000000001").unwrap();
        assert_eq!(record.kind(), RecordKind::Header);
        assert_eq!(record.len(), 139);
        assert!(record.as_str().starts_with("01#APAC2024030000021112"));
        assert_eq!(record.field(fields::TAX_ID), Some("47970769000104"));
        assert_eq!(record.field(fields::LAYOUT_VERSION), Some("03.18          "));
        assert!(record.as_str().ends_with("\r\n"));
    }

    #[test]
    fn test_header_overrides_control_field() {
        let values = header_values().with(fields::CONTROL_FIELD, "9999");
        let record = encode_header(&values, &[], "").unwrap();
        assert_eq!(record.field(fields::CONTROL_FIELD), Some("1111"));
    }
}
