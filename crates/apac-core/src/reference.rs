//! Physician and facility resolution.
//!
//! Lookups never fail: a miss yields the documented placeholder so the row
//! can still be encoded.

use apac_ingest::ReferenceTable;
use apac_layout::{format_numeric, sanitize_text};

/// Width of a CNS card number.
const CNS_WIDTH: usize = 15;
/// Width of a CNES facility code.
const CNES_WIDTH: usize = 7;

/// Resolved requesting physician.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicianRef {
    /// 15-digit CNS, zeros when unknown.
    pub cns: String,
    pub name: String,
}

impl PhysicianRef {
    fn unknown(name: String) -> Self {
        Self {
            cns: format_numeric("", CNS_WIDTH),
            name,
        }
    }
}

/// The two reference tables consulted for every patient row.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    physicians: ReferenceTable,
    facilities: ReferenceTable,
}

impl ReferenceData {
    pub fn new(physicians: ReferenceTable, facilities: ReferenceTable) -> Self {
        Self {
            physicians,
            facilities,
        }
    }

    /// Resolve a physician by (part of) their name.
    ///
    /// Empty query: zero CNS and empty name. Miss: zero CNS and the query
    /// uppercased as the name.
    pub fn physician(&self, query: &str) -> PhysicianRef {
        let query = sanitize_text(query).to_uppercase();
        if query.is_empty() {
            return PhysicianRef::unknown(String::new());
        }
        match self.physicians.find(&query) {
            Some(entry) => PhysicianRef {
                cns: format_numeric(&sanitize_text(&entry.code), CNS_WIDTH),
                name: sanitize_text(&entry.key),
            },
            None => PhysicianRef::unknown(query),
        }
    }

    /// Resolve the requesting facility's CNES, or `default` when the query
    /// is empty or unknown.
    pub fn requesting_facility(&self, query: &str, default: &str) -> String {
        let query = sanitize_text(query);
        self.facilities
            .find(&query)
            .map(|entry| format_numeric(&sanitize_text(&entry.code), CNES_WIDTH))
            .unwrap_or_else(|| default.to_string())
    }

    pub fn physician_count(&self) -> usize {
        self.physicians.len()
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }
}
