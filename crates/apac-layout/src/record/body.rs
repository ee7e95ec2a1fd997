use super::{FieldValues, Record, encode_record};
use crate::error::Result;
use crate::schema::PATIENT_BODY;

/// Encode the `14` patient-body record.
pub fn encode_patient_body(values: &FieldValues) -> Result<Record> {
    encode_record(&PATIENT_BODY, values)
}
