//! Header control field.
//!
//! ```text
//! sum     = authorization number + Σ (procedure code + quantity)
//! control = (sum mod 1111) + 1111
//! ```
//!
//! Codes are read with separators stripped. The sum is reduced digit by
//! digit, so arbitrarily long inputs never overflow.

use apac_model::ProcedureLine;

use crate::format::format_numeric;

/// Modulus of the control-field checksum.
pub const CONTROL_MODULUS: u64 = 1111;

/// Value of the decimal digits in `text` modulo [`CONTROL_MODULUS`].
///
/// Text without digits counts as zero.
fn digits_mod(text: &str) -> u64 {
    text.chars()
        .filter_map(|ch| ch.to_digit(10))
        .fold(0u64, |acc, digit| {
            (acc * 10 + u64::from(digit)) % CONTROL_MODULUS
        })
}

/// Compute the 4-digit control field for a batch.
///
/// `authorization_number` is the batch's representative number (the last one
/// consumed); an empty value contributes zero.
pub fn compute_control_field(procedures: &[ProcedureLine], authorization_number: &str) -> String {
    let mut sum = digits_mod(authorization_number);
    for procedure in procedures {
        sum = (sum + digits_mod(&procedure.code)) % CONTROL_MODULUS;
        sum = (sum + u64::from(procedure.quantity) % CONTROL_MODULUS) % CONTROL_MODULUS;
    }
    let control = sum + CONTROL_MODULUS;
    format_numeric(&control, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch() {
        assert_eq!(compute_control_field(&[], "0000000000001"), "1112");
        assert_eq!(compute_control_field(&[], ""), "1111");
    }

    #[test]
    fn test_matches_plain_arithmetic() {
        let procedures = vec![
            ProcedureLine::new("090501003-5", 1),
            ProcedureLine::new("021106002-0", 1),
            ProcedureLine::new("030101007-2", 2),
        ];
        let number = "3525704099599";
        let sum: u128 = 3_525_704_099_599
            + 905_010_035
            + 1
            + 211_060_020
            + 1
            + 301_010_072
            + 2;
        let expected = (sum % 1111 + 1111) as u64;
        assert_eq!(
            compute_control_field(&procedures, number),
            format!("{expected:04}")
        );
    }

    #[test]
    fn test_control_range() {
        let procedures = vec![ProcedureLine::new("99999999999999999999999", 4_000_000)];
        let control: u64 = compute_control_field(&procedures, "9999999999999")
            .parse()
            .unwrap();
        assert!((1111..=2221).contains(&control));
    }
}
