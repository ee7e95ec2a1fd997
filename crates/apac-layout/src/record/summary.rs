use super::{FieldValues, Record, encode_record};
use crate::error::Result;
use crate::schema::CLINICAL_SUMMARY;

/// Encode the `06` clinical-summary record.
///
/// Secondary CID and diagnosis date stay blank unless supplied.
pub fn encode_clinical_summary(values: &FieldValues) -> Result<Record> {
    encode_record(&CLINICAL_SUMMARY, values)
}
