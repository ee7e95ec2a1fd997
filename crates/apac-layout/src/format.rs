//! Fixed-width field formatting.
//!
//! Both formatters are total: oversized values are truncated (leftmost
//! characters kept), never rejected. The returned string always has exactly
//! `width` ASCII characters.

use std::borrow::Cow;

use crate::ascii::fold_char;

/// A value that can be rendered into a record field.
///
/// Floats render whole values as integer text, so `5.1950010783e10` becomes
/// `51950010783` instead of picking up an exponent.
pub trait FieldText {
    fn field_text(&self) -> Cow<'_, str>;
}

impl FieldText for str {
    fn field_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl FieldText for String {
    fn field_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: FieldText + ?Sized> FieldText for &T {
    fn field_text(&self) -> Cow<'_, str> {
        (**self).field_text()
    }
}

impl<T: FieldText> FieldText for Option<T> {
    fn field_text(&self) -> Cow<'_, str> {
        match self {
            Some(value) => value.field_text(),
            None => Cow::Borrowed(""),
        }
    }
}

macro_rules! integer_field_text {
    ($($ty:ty),*) => {
        $(
            impl FieldText for $ty {
                fn field_text(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

integer_field_text!(u8, u16, u32, u64, usize, i32, i64);

impl FieldText for f64 {
    fn field_text(&self) -> Cow<'_, str> {
        if !self.is_finite() {
            return Cow::Borrowed("");
        }
        if self.fract() == 0.0 && self.abs() < 1e18 {
            return Cow::Owned(format!("{}", *self as i64));
        }
        Cow::Owned(self.to_string())
    }
}

impl FieldText for apac_model::AuthorizationNumber {
    fn field_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl FieldText for apac_model::Period {
    fn field_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl FieldText for apac_model::LayoutVersion {
    fn field_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

/// Remove NUL bytes, turn CR/LF/TAB into spaces and trim surrounding
/// whitespace.
pub fn sanitize_text(value: &str) -> String {
    value
        .chars()
        .filter(|&ch| ch != '\0')
        .map(|ch| match ch {
            '\r' | '\n' | '\t' => ' ',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Numeric field: digits only, leftmost `width` kept, zero-padded on the left.
pub fn format_numeric<T: FieldText + ?Sized>(value: &T, width: usize) -> String {
    let text = value.field_text();
    let digits: String = text
        .chars()
        .filter(char::is_ascii_digit)
        .take(width)
        .collect();
    format!("{digits:0>width$}")
}

/// Alphanumeric field: sanitized, folded to ASCII, trimmed, leftmost `width`
/// kept, space-padded on the right.
///
/// The trim runs after folding so a dropped character never leaves a
/// leading space behind.
pub fn format_alpha<T: FieldText + ?Sized>(value: &T, width: usize) -> String {
    let text = value.field_text();
    let sanitized = sanitize_text(&text);
    let folded: String = sanitized.chars().filter_map(fold_char).collect();
    let kept: String = folded.trim().chars().take(width).collect();
    format!("{kept:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strips_punctuation() {
        assert_eq!(format_numeric("519.500.107-83", 11), "51950010783");
        assert_eq!(format_numeric("(16) 3711-0000", 12), "001637110000");
    }

    #[test]
    fn test_numeric_keeps_leftmost_digits() {
        assert_eq!(format_numeric("12345", 3), "123");
    }

    #[test]
    fn test_numeric_pads_with_zeros() {
        assert_eq!(format_numeric("7", 4), "0007");
        assert_eq!(format_numeric("", 4), "0000");
        assert_eq!(format_numeric("abc", 2), "00");
    }

    #[test]
    fn test_numeric_whole_float_has_no_exponent() {
        assert_eq!(format_numeric(&5.1950010783e10, 11), "51950010783");
        assert_eq!(format_numeric(&14.0, 2), "14");
        assert_eq!(format_numeric(&f64::NAN, 3), "000");
    }

    #[test]
    fn test_numeric_integers() {
        assert_eq!(format_numeric(&1112u32, 4), "1112");
        assert_eq!(format_numeric(&3usize, 6), "000003");
    }

    #[test]
    fn test_alpha_pads_and_truncates() {
        assert_eq!(format_alpha("ABC", 5), "ABC  ");
        assert_eq!(format_alpha("ABCDEFG", 3), "ABC");
        assert_eq!(format_alpha("", 2), "  ");
    }

    #[test]
    fn test_alpha_strips_control_characters() {
        assert_eq!(format_alpha("  RUA\tA\r\nB\0 ", 10), "RUA A  B  ");
    }

    #[test]
    fn test_alpha_folds_accents() {
        assert_eq!(format_alpha("CONCEIÇÃO", 10), "CONCEICAO ");
    }

    #[test]
    fn test_alpha_trims_after_dropping_unmappable() {
        assert_eq!(format_alpha("✓ ANA", 6), "ANA   ");
        assert_eq!(format_alpha("ANA ✓", 4), "ANA ");
    }

    #[test]
    fn test_option_field_text() {
        let none: Option<&str> = None;
        assert_eq!(format_alpha(&none, 3), "   ");
        assert_eq!(format_numeric(&Some("42"), 3), "042");
    }
}
