use apac_model::ProcedureLine;

use super::{FieldValues, Record, encode_record};
use crate::error::Result;
use crate::schema::{PROCEDURE, fields};
use crate::selection::ProcedureSet;

/// Encode one `13` procedure record.
///
/// `values` carries the per-patient fields (period, authorization number,
/// third-party facility); the code and quantity come from `line`, with the
/// code's hyphen stripped.
pub fn encode_procedure(values: &FieldValues, line: &ProcedureLine) -> Result<Record> {
    let values = values
        .clone()
        .with(fields::PROCEDURE_CODE, &line.plain_code())
        .with(fields::QUANTITY, &line.quantity);
    encode_record(&PROCEDURE, &values)
}

/// Encode the principal procedure followed by every secondary of `set`.
///
/// The principal is written with a blank third-party facility; secondaries
/// carry `third_party_facility`.
pub fn encode_procedure_block(
    values: &FieldValues,
    set: &ProcedureSet,
    third_party_facility: &str,
) -> Result<Vec<Record>> {
    let lines = set.lines();
    let mut records = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        let facility = if idx == 0 { "" } else { third_party_facility };
        let values = values
            .clone()
            .with(fields::THIRD_PARTY_FACILITY, facility);
        records.push(encode_procedure(&values, line)?);
    }
    Ok(records)
}
