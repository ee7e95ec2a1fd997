//! Per-run configuration.

use apac_model::{LayoutVersion, Period};
use chrono::{Local, NaiveDate};

use crate::error::Result;
use crate::profile::RemittanceProfile;

/// Prefix of every generated remittance file name.
pub const OUTPUT_PREFIX: &str = "oci_oftalmo";

/// Everything a run needs besides its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub period: Period,
    pub layout_version: LayoutVersion,
    pub generation_date: NaiveDate,
    pub profile: RemittanceProfile,
}

impl RunConfig {
    /// Validate the period and layout version. The generation date is today.
    ///
    /// `layout_version` falls back to [`LayoutVersion::DEFAULT`].
    pub fn new(
        period: &str,
        layout_version: Option<&str>,
        profile: RemittanceProfile,
    ) -> Result<Self> {
        let period = Period::new(period)?;
        let layout_version = match layout_version {
            Some(version) => LayoutVersion::new(version)?,
            None => LayoutVersion::default(),
        };
        Ok(Self {
            period,
            layout_version,
            generation_date: Local::now().date_naive(),
            profile,
        })
    }

    #[must_use]
    pub fn with_generation_date(mut self, date: NaiveDate) -> Self {
        self.generation_date = date;
        self
    }

    /// `YYYYMMDD` as written in the header.
    pub fn generation_date_text(&self) -> String {
        self.generation_date.format("%Y%m%d").to_string()
    }

    /// `oci_oftalmo_{period}.txt`
    pub fn output_file_name(&self) -> String {
        format!("{OUTPUT_PREFIX}_{}.txt", self.period)
    }
}
