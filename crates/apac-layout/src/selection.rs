//! Age-banded procedure selection for the ophthalmology care pathway.

use apac_model::ProcedureLine;
use chrono::{Datelike, NaiveDate};

/// Patients this old or older get the extended bundle.
pub const AGE_THRESHOLD: u32 = 9;

/// A secondary procedure and its fixed quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryProcedure {
    pub code: &'static str,
    pub quantity: u32,
}

/// One bundle: a principal procedure plus its secondaries.
#[derive(Debug, PartialEq, Eq)]
pub struct ProcedureSet {
    pub principal: &'static str,
    pub description: &'static str,
    pub secondary: &'static [SecondaryProcedure],
}

impl ProcedureSet {
    /// Principal (quantity 1) followed by the secondaries, in table order.
    pub fn lines(&self) -> Vec<ProcedureLine> {
        std::iter::once(ProcedureLine::new(self.principal, 1))
            .chain(
                self.secondary
                    .iter()
                    .map(|proc| ProcedureLine::new(proc.code, proc.quantity)),
            )
            .collect()
    }
}

const fn secondary(code: &'static str, quantity: u32) -> SecondaryProcedure {
    SecondaryProcedure { code, quantity }
}

static FROM_NINE_YEARS: ProcedureSet = ProcedureSet {
    principal: "090501003-5",
    description: "OCI AVAL. INICIAL EM OFTALMO - A PARTIR DE 9 ANOS",
    secondary: &[
        secondary("021106002-0", 1),
        secondary("030101007-2", 2),
        secondary("021106012-7", 1),
        secondary("021106023-2", 1),
        secondary("021106025-9", 1),
    ],
};

static UNDER_NINE_YEARS: ProcedureSet = ProcedureSet {
    principal: "090501001-9",
    description: "OCI AVAL. INICIAL EM OFTALMO - 0 A 8 ANOS",
    secondary: &[
        secondary("021106002-0", 1),
        secondary("030101007-2", 2),
        secondary("021106012-7", 1),
        secondary("021106023-2", 1),
    ],
};

/// Pick the bundle for a patient of `age_years`.
pub fn select_procedure_set(age_years: u32) -> &'static ProcedureSet {
    if age_years >= AGE_THRESHOLD {
        &FROM_NINE_YEARS
    } else {
        &UNDER_NINE_YEARS
    }
}

fn parse_compact_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y%m%d").ok()
}

/// Age in whole years at the consultation date.
///
/// Both dates are `YYYYMMDD`. Malformed dates, or a consultation before the
/// birth date, yield 0.
pub fn compute_age(birth_date: &str, consultation_date: &str) -> u32 {
    let (Some(birth), Some(consultation)) = (
        parse_compact_date(birth_date),
        parse_compact_date(consultation_date),
    ) else {
        return 0;
    };
    let mut years = consultation.year() - birth.year();
    if (consultation.month(), consultation.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}
