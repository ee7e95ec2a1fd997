//! Institution profile: the constants written into every remittance.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BatchError, Result};

/// Values that identify the issuing institution and the fixed care
/// attributes of the ophthalmology pathway.
///
/// Every field has a default, so a profile file only needs the fields that
/// differ from the reference municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemittanceProfile {
    /// IBGE state code.
    pub state_code: String,
    /// CNES of the facility executing the procedures.
    pub executing_facility: String,
    /// CNES used when the requesting facility cannot be resolved.
    ///
    /// Secondary procedures carry a third-party facility only when the
    /// requesting facility differs from this one.
    pub default_requesting_facility: String,
    /// IBGE municipality code.
    pub municipality_code: String,
    pub emitter_code: String,

    // Header
    pub origin_name: String,
    pub origin_acronym: String,
    pub tax_id: String,
    pub destination_name: String,
    /// `M` municipal, `E` state.
    pub destination_indicator: String,

    pub director_name: String,
    pub director_cns: String,

    pub care_type: String,
    pub apac_type: String,
    pub exit_reason: String,
    pub care_character: String,
    pub previous_apac: String,
    pub nationality: String,
    pub street_type: String,
    pub no_street_flag: String,
}

impl Default for RemittanceProfile {
    fn default() -> Self {
        Self {
            state_code: "35".to_string(),
            executing_facility: "5778204".to_string(),
            default_requesting_facility: "5778204".to_string(),
            municipality_code: "351620".to_string(),
            emitter_code: "M351620001".to_string(),
            origin_name: "SECRETARIA MUNICIPAL DE SAUDE".to_string(),
            origin_acronym: "SECRET".to_string(),
            tax_id: "47970769000104".to_string(),
            destination_name: "SMS".to_string(),
            destination_indicator: "M".to_string(),
            director_name: String::new(),
            director_cns: "704800067495842".to_string(),
            care_type: "00".to_string(),
            apac_type: "3".to_string(),
            exit_reason: "12".to_string(),
            care_character: "01".to_string(),
            previous_apac: "0".to_string(),
            nationality: "010".to_string(),
            street_type: "081".to_string(),
            no_street_flag: "N".to_string(),
        }
    }
}

impl RemittanceProfile {
    /// Load a JSON profile. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| BatchError::ProfileRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| BatchError::ProfileParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether `facility` is the profile's own default requesting facility.
    pub fn is_default_facility(&self, facility: &str) -> bool {
        facility.trim() == self.default_requesting_facility.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_profile_keeps_defaults() {
        let profile: RemittanceProfile =
            serde_json::from_str(r#"{"director_name": "DIRETORIA CLINICA", "state_code": "41"}"#)
                .unwrap();
        assert_eq!(profile.director_name, "DIRETORIA CLINICA");
        assert_eq!(profile.state_code, "41");
        assert_eq!(profile.executing_facility, "5778204");
        assert_eq!(profile.street_type, "081");
    }

    #[test]
    fn test_default_facility() {
        let profile = RemittanceProfile::default();
        assert!(profile.is_default_facility("5778204"));
        assert!(!profile.is_default_facility("2081458"));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perfil.json");
        fs::write(&path, "{ not json").unwrap();
        let err = RemittanceProfile::load(&path).unwrap_err();
        assert!(matches!(err, BatchError::ProfileParse { .. }));
        assert!(err.to_string().contains("perfil.json"));
    }
}
