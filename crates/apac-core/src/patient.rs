//! Field derivation for one patient row.

use apac_layout::{
    FieldValues, ProcedureSet, compute_age, fields, sanitize_text, select_procedure_set,
};
use apac_model::patient::keys;
use apac_model::{AuthorizationNumber, PatientRow, ProcedureLine};
use chrono::NaiveDate;

use crate::config::RunConfig;
use crate::outcome::RowFailureReason;
use crate::reference::ReferenceData;

/// From this age the patient is their own guardian.
pub const ADULT_AGE: u32 = 18;

/// Race/colour code for the caption used in the extract. Unknown values
/// default to `01`.
pub fn race_code(value: &str) -> &'static str {
    match sanitize_text(value).to_uppercase().as_str() {
        "BRANCA" => "01",
        "PRETA" => "02",
        "PARDA" => "03",
        "AMARELA" => "04",
        "INDIGENA" | "INDÍGENA" => "05",
        _ => "01",
    }
}

/// First character of the sex column, `I` (ignored) when empty.
pub fn sex_code(value: &str) -> String {
    sanitize_text(value)
        .chars()
        .next()
        .map_or_else(|| "I".to_string(), |ch| ch.to_uppercase().collect())
}

/// ICD-10 code: uppercase, alphanumerics only, at most 4 characters.
pub fn primary_cid(value: &str) -> String {
    sanitize_text(value)
        .to_uppercase()
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .take(4)
        .collect()
}

/// A required `YYYYMMDD` calendar date.
fn required_date(value: &str) -> Option<String> {
    let value = sanitize_text(value);
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(&value, "%Y%m%d").ok()?;
    Some(value)
}

/// Field values for every record of one patient, ready to encode.
#[derive(Debug, Clone)]
pub struct PatientFields {
    pub age: u32,
    pub body: FieldValues,
    pub summary: FieldValues,
    /// Shared by every procedure record.
    pub procedure: FieldValues,
    pub procedure_set: &'static ProcedureSet,
    pub third_party_facility: String,
}

impl PatientFields {
    pub fn procedure_lines(&self) -> Vec<ProcedureLine> {
        self.procedure_set.lines()
    }
}

/// Derive all record fields for `row` under `number`.
///
/// Fails only on a missing or invalid birth or consultation date.
pub fn derive_patient_fields(
    row: &PatientRow,
    number: &AuthorizationNumber,
    config: &RunConfig,
    references: &ReferenceData,
) -> Result<PatientFields, RowFailureReason> {
    let birth = row.get(keys::BIRTH_DATE);
    let birth = required_date(birth)
        .ok_or_else(|| RowFailureReason::InvalidBirthDate(birth.trim().to_string()))?;
    let consultation = row.get(keys::CONSULTATION_DATE);
    let consultation = required_date(consultation).ok_or_else(|| {
        RowFailureReason::InvalidConsultationDate(consultation.trim().to_string())
    })?;

    let profile = &config.profile;
    let physician = references.physician(row.get(keys::PHYSICIAN));
    let requesting_facility = references.requesting_facility(
        row.get(keys::FACILITY),
        &profile.default_requesting_facility,
    );
    let third_party_facility = if profile.is_default_facility(&requesting_facility) {
        String::new()
    } else {
        requesting_facility.clone()
    };

    let age = compute_age(&birth, &consultation);
    let procedure_set = select_procedure_set(age);
    let name = sanitize_text(row.get(keys::NAME));
    let mother = sanitize_text(row.get(keys::MOTHER));
    let guardian = if age >= ADULT_AGE { &name } else { &mother };
    let cid = primary_cid(row.get(keys::CID));

    let mut body = FieldValues::new();
    body.set(fields::PERIOD, &config.period)
        .set(fields::AUTHORIZATION_NUMBER, number)
        .set(fields::STATE_CODE, &profile.state_code)
        .set(fields::FACILITY_CODE, &profile.executing_facility)
        .set(fields::PROCEDURE_DATE, &consultation)
        .set(fields::VALIDITY_START, &consultation)
        .set(fields::VALIDITY_END, &consultation)
        .set(fields::CARE_TYPE, &profile.care_type)
        .set(fields::APAC_TYPE, &profile.apac_type)
        .set(fields::PATIENT_NAME, &name)
        .set(fields::MOTHER_NAME, &mother)
        .set(fields::STREET, row.get(keys::STREET))
        .set(fields::STREET_NUMBER, row.get(keys::STREET_NUMBER))
        .set(fields::POSTAL_CODE, row.get(keys::POSTAL_CODE))
        .set(fields::MUNICIPALITY_CODE, &profile.municipality_code)
        .set(fields::BIRTH_DATE, &birth)
        .set(fields::SEX, &sex_code(row.get(keys::SEX)))
        .set(fields::RESPONSIBLE_NAME, &physician.name)
        .set(fields::PRINCIPAL_PROCEDURE, procedure_set.principal)
        .set(fields::EXIT_REASON, &profile.exit_reason)
        .set(fields::EXIT_DATE, &consultation)
        .set(fields::DIRECTOR_NAME, &profile.director_name)
        .set(fields::PATIENT_CNS, "")
        .set(fields::RESPONSIBLE_CNS, &physician.cns)
        .set(fields::DIRECTOR_CNS, &profile.director_cns)
        .set(fields::REQUESTING_FACILITY, &requesting_facility)
        .set(fields::REQUEST_DATE, &consultation)
        .set(fields::AUTHORIZATION_DATE, &consultation)
        .set(fields::EMITTER_CODE, &profile.emitter_code)
        .set(fields::CARE_CHARACTER, &profile.care_character)
        .set(fields::PREVIOUS_APAC, &profile.previous_apac)
        .set(fields::RACE, race_code(row.get(keys::RACE)))
        .set(fields::PATIENT_GUARDIAN, guardian)
        .set(fields::NATIONALITY, &profile.nationality)
        .set(fields::STREET_TYPE, &profile.street_type)
        .set(fields::NEIGHBORHOOD, row.get(keys::NEIGHBORHOOD))
        .set(fields::PHONE_AREA_CODE, row.get(keys::PHONE_AREA_CODE))
        .set(fields::PHONE, row.get(keys::PHONE))
        .set(fields::EMAIL, row.get(keys::EMAIL))
        .set(fields::EXECUTOR_CNS, &physician.cns)
        .set(fields::CPF, row.get(keys::CPF))
        .set(fields::NO_STREET_FLAG, &profile.no_street_flag);

    let procedure = FieldValues::new()
        .with(fields::PERIOD, &config.period)
        .with(fields::AUTHORIZATION_NUMBER, number);
    let summary = procedure.clone().with(fields::PRIMARY_CID, &cid);

    Ok(PatientFields {
        age,
        body,
        summary,
        procedure,
        procedure_set,
        third_party_facility,
    })
}
