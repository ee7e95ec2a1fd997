//! Record schemas.
//!
//! Each record kind is a closed, ordered list of fields. Widths come from the
//! APAC magnetic-media layout; the trailing CR LF is not listed as a field
//! but is part of every record's byte length.
//!
//! | Kind             | Indicator | Bytes |
//! |------------------|-----------|-------|
//! | Header           | `01`      | 139   |
//! | Patient body     | `14`      | 535   |
//! | Clinical summary | `06`      | 39    |
//! | Procedure        | `13`      | 99    |

use std::fmt;
use std::ops::Range;

/// Line terminator closing every record.
pub const LINE_TERMINATOR: &str = "\r\n";

/// How a field's value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Right-justified, zero-padded digits.
    Numeric,
    /// Left-justified, space-padded text.
    Alpha,
    /// Fixed literal; input values are ignored.
    Constant(&'static str),
}

/// One positional field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub width: usize,
}

impl FieldSpec {
    pub const fn numeric(name: &'static str, width: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Numeric,
            width,
        }
    }

    pub const fn alpha(name: &'static str, width: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Alpha,
            width,
        }
    }

    pub const fn constant(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Constant(value),
            width: value.len(),
        }
    }
}

/// The four record kinds of a remittance file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Header,
    PatientBody,
    ClinicalSummary,
    Procedure,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Header,
        RecordKind::PatientBody,
        RecordKind::ClinicalSummary,
        RecordKind::Procedure,
    ];

    /// Two-digit record indicator opening the record.
    #[must_use]
    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Header => "01",
            Self::PatientBody => "14",
            Self::ClinicalSummary => "06",
            Self::Procedure => "13",
        }
    }

    /// Exact byte length, line terminator included.
    #[must_use]
    pub const fn length(self) -> usize {
        match self {
            Self::Header => 139,
            Self::PatientBody => 535,
            Self::ClinicalSummary => 39,
            Self::Procedure => 99,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::PatientBody => "patient body",
            Self::ClinicalSummary => "clinical summary",
            Self::Procedure => "procedure",
        }
    }

    #[must_use]
    pub fn schema(self) -> &'static RecordSchema {
        match self {
            Self::Header => &HEADER,
            Self::PatientBody => &PATIENT_BODY,
            Self::ClinicalSummary => &CLINICAL_SUMMARY,
            Self::Procedure => &PROCEDURE,
        }
    }

    pub fn from_indicator(indicator: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.indicator() == indicator)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered field list of one record kind.
#[derive(Debug)]
pub struct RecordSchema {
    pub kind: RecordKind,
    pub fields: &'static [FieldSpec],
}

impl RecordSchema {
    /// Sum of all field widths (terminator excluded).
    pub fn data_width(&self) -> usize {
        self.fields.iter().map(|field| field.width).sum()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Byte range of a field inside an encoded record.
    pub fn range_of(&self, name: &str) -> Option<Range<usize>> {
        let mut start = 0usize;
        for field in self.fields {
            if field.name == name {
                return Some(start..start + field.width);
            }
            start += field.width;
        }
        None
    }
}

/// Field names shared by the encoders and their callers.
pub mod fields {
    pub const INDICATOR: &str = "indicator";
    pub const PERIOD: &str = "period";
    pub const AUTHORIZATION_NUMBER: &str = "authorization_number";

    // Header
    pub const TAG: &str = "tag";
    pub const RECORD_COUNT: &str = "record_count";
    pub const CONTROL_FIELD: &str = "control_field";
    pub const ORIGIN_NAME: &str = "origin_name";
    pub const ORIGIN_ACRONYM: &str = "origin_acronym";
    pub const TAX_ID: &str = "tax_id";
    pub const DESTINATION_NAME: &str = "destination_name";
    pub const DESTINATION_INDICATOR: &str = "destination_indicator";
    pub const GENERATION_DATE: &str = "generation_date";
    pub const LAYOUT_VERSION: &str = "layout_version";

    // Patient body
    pub const STATE_CODE: &str = "state_code";
    pub const FACILITY_CODE: &str = "facility_code";
    pub const PROCEDURE_DATE: &str = "procedure_date";
    pub const VALIDITY_START: &str = "validity_start";
    pub const VALIDITY_END: &str = "validity_end";
    pub const CARE_TYPE: &str = "care_type";
    pub const APAC_TYPE: &str = "apac_type";
    pub const PATIENT_NAME: &str = "patient_name";
    pub const MOTHER_NAME: &str = "mother_name";
    pub const STREET: &str = "street";
    pub const STREET_NUMBER: &str = "street_number";
    pub const ADDRESS_COMPLEMENT: &str = "address_complement";
    pub const POSTAL_CODE: &str = "postal_code";
    pub const MUNICIPALITY_CODE: &str = "municipality_code";
    pub const BIRTH_DATE: &str = "birth_date";
    pub const SEX: &str = "sex";
    pub const RESPONSIBLE_NAME: &str = "responsible_name";
    pub const PRINCIPAL_PROCEDURE: &str = "principal_procedure";
    pub const EXIT_REASON: &str = "exit_reason";
    pub const EXIT_DATE: &str = "exit_date";
    pub const DIRECTOR_NAME: &str = "director_name";
    pub const PATIENT_CNS: &str = "patient_cns";
    pub const RESPONSIBLE_CNS: &str = "responsible_cns";
    pub const DIRECTOR_CNS: &str = "director_cns";
    pub const ASSOCIATED_CAUSE_CID: &str = "associated_cause_cid";
    pub const CHART_NUMBER: &str = "chart_number";
    pub const REQUESTING_FACILITY: &str = "requesting_facility";
    pub const REQUEST_DATE: &str = "request_date";
    pub const AUTHORIZATION_DATE: &str = "authorization_date";
    pub const EMITTER_CODE: &str = "emitter_code";
    pub const CARE_CHARACTER: &str = "care_character";
    pub const PREVIOUS_APAC: &str = "previous_apac";
    pub const RACE: &str = "race";
    pub const PATIENT_GUARDIAN: &str = "patient_guardian";
    pub const NATIONALITY: &str = "nationality";
    pub const ETHNICITY: &str = "ethnicity";
    pub const STREET_TYPE: &str = "street_type";
    pub const NEIGHBORHOOD: &str = "neighborhood";
    pub const PHONE_AREA_CODE: &str = "phone_area_code";
    pub const PHONE: &str = "phone";
    pub const EMAIL: &str = "email";
    pub const EXECUTOR_CNS: &str = "executor_cns";
    pub const CPF: &str = "cpf";
    pub const INE: &str = "ine";
    pub const NO_STREET_FLAG: &str = "no_street_flag";

    // Clinical summary
    pub const PRIMARY_CID: &str = "primary_cid";
    pub const SECONDARY_CID: &str = "secondary_cid";
    pub const DIAGNOSIS_DATE: &str = "diagnosis_date";

    // Procedure
    pub const PROCEDURE_CODE: &str = "procedure_code";
    pub const OCCUPATION_CODE: &str = "occupation_code";
    pub const QUANTITY: &str = "quantity";
    pub const ASSIGNMENT_CNPJ: &str = "assignment_cnpj";
    pub const INVOICE_NUMBER: &str = "invoice_number";
    pub const SERVICE_CODE: &str = "service_code";
    pub const CLASSIFICATION_CODE: &str = "classification_code";
    pub const TEAM_SEQUENCE: &str = "team_sequence";
    pub const TEAM_AREA: &str = "team_area";
    pub const THIRD_PARTY_FACILITY: &str = "third_party_facility";
}

use fields as f;

/// Occupation (CBO) code written on every procedure record.
pub const OCCUPATION_CODE: &str = "225265";

pub static HEADER: RecordSchema = RecordSchema {
    kind: RecordKind::Header,
    fields: &[
        FieldSpec::constant(f::INDICATOR, "01"),
        FieldSpec::constant(f::TAG, "#APAC"),
        FieldSpec::numeric(f::PERIOD, 6),
        FieldSpec::numeric(f::RECORD_COUNT, 6),
        FieldSpec::numeric(f::CONTROL_FIELD, 4),
        FieldSpec::alpha(f::ORIGIN_NAME, 30),
        FieldSpec::alpha(f::ORIGIN_ACRONYM, 6),
        FieldSpec::numeric(f::TAX_ID, 14),
        FieldSpec::alpha(f::DESTINATION_NAME, 40),
        FieldSpec::alpha(f::DESTINATION_INDICATOR, 1),
        FieldSpec::numeric(f::GENERATION_DATE, 8),
        FieldSpec::alpha(f::LAYOUT_VERSION, 15),
    ],
};

pub static PATIENT_BODY: RecordSchema = RecordSchema {
    kind: RecordKind::PatientBody,
    fields: &[
        FieldSpec::constant(f::INDICATOR, "14"),
        FieldSpec::numeric(f::PERIOD, 6),
        FieldSpec::numeric(f::AUTHORIZATION_NUMBER, 13),
        FieldSpec::numeric(f::STATE_CODE, 2),
        FieldSpec::numeric(f::FACILITY_CODE, 7),
        FieldSpec::numeric(f::PROCEDURE_DATE, 8),
        FieldSpec::numeric(f::VALIDITY_START, 8),
        FieldSpec::numeric(f::VALIDITY_END, 8),
        FieldSpec::numeric(f::CARE_TYPE, 2),
        FieldSpec::numeric(f::APAC_TYPE, 1),
        FieldSpec::alpha(f::PATIENT_NAME, 30),
        FieldSpec::alpha(f::MOTHER_NAME, 30),
        FieldSpec::alpha(f::STREET, 30),
        FieldSpec::alpha(f::STREET_NUMBER, 5),
        FieldSpec::alpha(f::ADDRESS_COMPLEMENT, 10),
        FieldSpec::numeric(f::POSTAL_CODE, 8),
        FieldSpec::alpha(f::MUNICIPALITY_CODE, 7),
        FieldSpec::numeric(f::BIRTH_DATE, 8),
        FieldSpec::alpha(f::SEX, 1),
        FieldSpec::alpha(f::RESPONSIBLE_NAME, 30),
        FieldSpec::numeric(f::PRINCIPAL_PROCEDURE, 10),
        FieldSpec::numeric(f::EXIT_REASON, 2),
        FieldSpec::alpha(f::EXIT_DATE, 8),
        FieldSpec::alpha(f::DIRECTOR_NAME, 30),
        FieldSpec::alpha(f::PATIENT_CNS, 15),
        FieldSpec::numeric(f::RESPONSIBLE_CNS, 15),
        FieldSpec::numeric(f::DIRECTOR_CNS, 15),
        FieldSpec::alpha(f::ASSOCIATED_CAUSE_CID, 4),
        FieldSpec::alpha(f::CHART_NUMBER, 10),
        FieldSpec::numeric(f::REQUESTING_FACILITY, 7),
        FieldSpec::numeric(f::REQUEST_DATE, 8),
        FieldSpec::numeric(f::AUTHORIZATION_DATE, 8),
        FieldSpec::alpha(f::EMITTER_CODE, 10),
        FieldSpec::numeric(f::CARE_CHARACTER, 2),
        FieldSpec::numeric(f::PREVIOUS_APAC, 13),
        FieldSpec::numeric(f::RACE, 2),
        FieldSpec::alpha(f::PATIENT_GUARDIAN, 30),
        FieldSpec::numeric(f::NATIONALITY, 3),
        FieldSpec::alpha(f::ETHNICITY, 4),
        FieldSpec::numeric(f::STREET_TYPE, 3),
        FieldSpec::alpha(f::NEIGHBORHOOD, 30),
        FieldSpec::alpha(f::PHONE_AREA_CODE, 2),
        FieldSpec::alpha(f::PHONE, 9),
        FieldSpec::alpha(f::EMAIL, 40),
        FieldSpec::numeric(f::EXECUTOR_CNS, 15),
        FieldSpec::numeric(f::CPF, 11),
        FieldSpec::alpha(f::INE, 10),
        FieldSpec::alpha(f::NO_STREET_FLAG, 1),
    ],
};

pub static CLINICAL_SUMMARY: RecordSchema = RecordSchema {
    kind: RecordKind::ClinicalSummary,
    fields: &[
        FieldSpec::constant(f::INDICATOR, "06"),
        FieldSpec::numeric(f::PERIOD, 6),
        FieldSpec::numeric(f::AUTHORIZATION_NUMBER, 13),
        FieldSpec::alpha(f::PRIMARY_CID, 4),
        FieldSpec::alpha(f::SECONDARY_CID, 4),
        FieldSpec::alpha(f::DIAGNOSIS_DATE, 8),
    ],
};

pub static PROCEDURE: RecordSchema = RecordSchema {
    kind: RecordKind::Procedure,
    fields: &[
        FieldSpec::constant(f::INDICATOR, "13"),
        FieldSpec::numeric(f::PERIOD, 6),
        FieldSpec::numeric(f::AUTHORIZATION_NUMBER, 13),
        FieldSpec::numeric(f::PROCEDURE_CODE, 10),
        FieldSpec::constant(f::OCCUPATION_CODE, OCCUPATION_CODE),
        FieldSpec::numeric(f::QUANTITY, 7),
        FieldSpec::alpha(f::ASSIGNMENT_CNPJ, 14),
        FieldSpec::alpha(f::INVOICE_NUMBER, 6),
        FieldSpec::alpha(f::PRIMARY_CID, 4),
        FieldSpec::alpha(f::SECONDARY_CID, 4),
        FieldSpec::alpha(f::SERVICE_CODE, 3),
        FieldSpec::alpha(f::CLASSIFICATION_CODE, 3),
        FieldSpec::alpha(f::TEAM_SEQUENCE, 8),
        FieldSpec::alpha(f::TEAM_AREA, 4),
        FieldSpec::alpha(f::THIRD_PARTY_FACILITY, 7),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_widths_match_record_lengths() {
        for kind in RecordKind::ALL {
            let schema = kind.schema();
            assert_eq!(schema.kind, kind);
            assert_eq!(
                schema.data_width() + LINE_TERMINATOR.len(),
                kind.length(),
                "{kind}"
            );
        }
    }

    #[test]
    fn test_schema_field_names_are_unique() {
        for kind in RecordKind::ALL {
            let schema = kind.schema();
            for (idx, field) in schema.fields.iter().enumerate() {
                assert!(
                    schema.fields[idx + 1..]
                        .iter()
                        .all(|other| other.name != field.name),
                    "{kind}: duplicate {}",
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_indicator_is_first_field() {
        for kind in RecordKind::ALL {
            let first = kind.schema().fields[0];
            assert_eq!(first.kind, FieldKind::Constant(kind.indicator()));
        }
    }

    #[test]
    fn test_from_indicator() {
        assert_eq!(RecordKind::from_indicator("14"), Some(RecordKind::PatientBody));
        assert_eq!(RecordKind::from_indicator("99"), None);
    }

    #[test]
    fn test_range_of() {
        assert_eq!(HEADER.range_of(fields::CONTROL_FIELD), Some(19..23));
        assert_eq!(PROCEDURE.range_of(fields::QUANTITY), Some(37..44));
        assert_eq!(PROCEDURE.range_of("missing"), None);
    }
}
