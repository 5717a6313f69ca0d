// 📍 District Resolver - ZIP → state + congressional district → delegation
//
// One mapping row per ZIP. Senators: ALL roster senators for the state
// (0..n, no assumption of exactly two). Representative: FIRST House member
// for state + district in roster order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::entities::{LegislatorIndex, LegislatorRecord};
use crate::error::LookupError;

// ============================================================================
// ZIP TABLE
// ============================================================================

/// One row of the ZIP → district CSV
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZipRow {
    pub zip: String,
    pub state_abbr: String,
    pub cd: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictMapping {
    pub zip: String,
    pub state: String,
    /// Numeric, or the table's at-large marker
    pub district_number: String,
}

impl From<&ZipRow> for DistrictMapping {
    fn from(row: &ZipRow) -> Self {
        DistrictMapping {
            zip: row.zip.trim().to_string(),
            state: row.state_abbr.trim().to_string(),
            district_number: row.cd.trim().to_string(),
        }
    }
}

/// Immutable ZIP table with a first-row-wins hash lookup
#[derive(Debug, Clone, Default)]
pub struct DistrictTable {
    rows: Vec<DistrictMapping>,
    by_zip: HashMap<String, usize>,
}

impl DistrictTable {
    pub fn build(rows: &[ZipRow]) -> Self {
        let mut table = DistrictTable::default();
        for row in rows {
            let mapping = DistrictMapping::from(row);
            table
                .by_zip
                .entry(mapping.zip.clone())
                .or_insert(table.rows.len());
            table.rows.push(mapping);
        }
        info!(zips = table.by_zip.len(), rows = table.rows.len(), "built district table");
        table
    }

    pub fn lookup(&self, zip: &str) -> Option<&DistrictMapping> {
        self.by_zip.get(zip).and_then(|&i| self.rows.get(i))
    }

    pub fn rows(&self) -> &[DistrictMapping] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// DELEGATION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Delegation<'a> {
    pub zip: String,
    pub state: String,
    pub district: String,
    pub senators: Vec<&'a LegislatorRecord>,
    pub representative: Option<&'a LegislatorRecord>,
}

impl<'a> Delegation<'a> {
    /// Senators first (roster order), then the representative
    pub fn members(&self) -> Vec<&'a LegislatorRecord> {
        let mut members = self.senators.clone();
        members.extend(self.representative);
        members
    }
}

/// Trimmed input, exactly five ASCII digits
pub fn validate_zip(zip: &str) -> Result<&str, LookupError> {
    let zip = zip.trim();
    if zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit()) {
        Ok(zip)
    } else {
        Err(LookupError::InvalidZip(zip.to_string()))
    }
}

/// Resolve a ZIP code to its delegation.
///
/// Errors only on a malformed ZIP or a ZIP absent from the table; an empty
/// delegation (no senators, no representative) is still a success.
pub fn resolve_zip<'a>(
    zip: &str,
    index: &'a LegislatorIndex,
    districts: &DistrictTable,
) -> Result<Delegation<'a>, LookupError> {
    let zip = validate_zip(zip)?;
    let mapping = districts
        .lookup(zip)
        .ok_or_else(|| LookupError::ZipNotFound(zip.to_string()))?;

    let senators: Vec<&LegislatorRecord> = index.senators_for(&mapping.state).collect();
    let representative = index.representative_for(&mapping.state, &mapping.district_number);

    debug!(
        zip,
        state = %mapping.state,
        district = %mapping.district_number,
        senators = senators.len(),
        has_representative = representative.is_some(),
        "resolved zip"
    );

    Ok(Delegation {
        zip: zip.to_string(),
        state: mapping.state.clone(),
        district: mapping.district_number.clone(),
        senators,
        representative,
    })
}
