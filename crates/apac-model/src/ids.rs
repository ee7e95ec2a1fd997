use std::fmt;

use crate::ModelError;

/// Number of digits in a complete authorization number.
pub const AUTHORIZATION_DIGITS: usize = 13;

/// Number of digits in the base sequence (without the check digit).
pub const AUTHORIZATION_BASE_DIGITS: usize = 12;

/// A 13-digit APAC authorization number: 12-digit base sequence plus one
/// check digit.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct AuthorizationNumber(String);

impl AuthorizationNumber {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() != AUTHORIZATION_DIGITS || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ModelError::InvalidAuthorizationNumber(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build a number from the `base-digit` pair used by the pool file.
    pub fn from_parts(base: &str, check_digit: &str) -> Result<Self, ModelError> {
        let base = base.trim();
        let check_digit = check_digit.trim();
        if base.len() != AUTHORIZATION_BASE_DIGITS || check_digit.len() != 1 {
            return Err(ModelError::InvalidAuthorizationNumber(format!(
                "{base}-{check_digit}"
            )));
        }
        Self::new(format!("{base}{check_digit}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn base(&self) -> &str {
        &self.0[..AUTHORIZATION_BASE_DIGITS]
    }

    pub fn check_digit(&self) -> &str {
        &self.0[AUTHORIZATION_BASE_DIGITS..]
    }

    /// Render as `{base12}-{digit}`, the persisted pool representation.
    pub fn to_pool_line(&self) -> String {
        format!("{}-{}", self.base(), self.check_digit())
    }
}

impl fmt::Display for AuthorizationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AuthorizationNumber {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AuthorizationNumber> for String {
    fn from(value: AuthorizationNumber) -> Self {
        value.0
    }
}

/// Reporting month (`YYYYMM`) a remittance covers.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Period(String);

impl Period {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() != 6 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ModelError::InvalidPeriod(value));
        }
        let month: u32 = trimmed[4..]
            .parse()
            .map_err(|_| ModelError::InvalidPeriod(value.clone()))?;
        if !(1..=12).contains(&month) {
            return Err(ModelError::InvalidPeriod(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Period {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.0
    }
}

/// Layout version written in the header (`NN.NN`, e.g. `03.18`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct LayoutVersion(String);

impl LayoutVersion {
    pub const DEFAULT: &'static str = "03.18";

    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        let bytes = trimmed.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b'.'
            && bytes
                .iter()
                .enumerate()
                .all(|(idx, b)| idx == 2 || b.is_ascii_digit());
        if !well_formed {
            return Err(ModelError::InvalidLayoutVersion(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LayoutVersion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for LayoutVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LayoutVersion {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LayoutVersion> for String {
    fn from(value: LayoutVersion) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_number_requires_thirteen_digits() {
        assert!(AuthorizationNumber::new("3525704099599").is_ok());
        assert!(AuthorizationNumber::new("352570409959").is_err());
        assert!(AuthorizationNumber::new("35257040995A9").is_err());
    }

    #[test]
    fn authorization_number_parts() {
        let number = AuthorizationNumber::from_parts("352570409959", "9").unwrap();
        assert_eq!(number.as_str(), "3525704099599");
        assert_eq!(number.base(), "352570409959");
        assert_eq!(number.check_digit(), "9");
        assert_eq!(number.to_pool_line(), "352570409959-9");
    }

    #[test]
    fn authorization_number_parts_reject_bad_lengths() {
        assert!(AuthorizationNumber::from_parts("35257040995", "9").is_err());
        assert!(AuthorizationNumber::from_parts("352570409959", "91").is_err());
    }

    #[test]
    fn period_validates_month() {
        assert_eq!(Period::new(" 202403 ").unwrap().as_str(), "202403");
        assert!(Period::new("202413").is_err());
        assert!(Period::new("202400").is_err());
        assert!(Period::new("2024-3").is_err());
    }

    #[test]
    fn layout_version_shape() {
        assert_eq!(LayoutVersion::default().as_str(), "03.18");
        assert!(LayoutVersion::new("03.19").is_ok());
        assert!(LayoutVersion::new("3.19").is_err());
        assert!(LayoutVersion::new("03-19").is_err());
    }
}
