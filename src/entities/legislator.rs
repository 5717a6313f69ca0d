// 🏛️ Legislator Entity - Stable identity + normalized name keys
//
// "The bioguide id is IDENTITY (never changes), the name is a VALUE"
//
// Problem solved:
// - "Bernard Sanders", "Bernie Sanders", "BERNARD SANDERS " → one legislator
// - Roster rows arrive as raw CSV text (chamber as "sen"/"rep", party with
//   inconsistent case/whitespace)
// - The index is built once per snapshot and never mutated; a refresh
//   builds a brand new index

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::matcher::normalize;

// ============================================================================
// RAW ROSTER ROW
// ============================================================================

/// One row of the legislators CSV, exactly as the loader hands it over.
///
/// Every column is optional text; the index decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterRow {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub bioguide_id: String,
    #[serde(rename = "type")]
    pub chamber: String,
    pub state: String,
    pub district: String,
    pub party: String,
    pub birthday: String,
    pub phone: String,
    pub address: String,
    pub url: String,
    pub contact_form: String,
    pub opensecrets_id: String,
}

// ============================================================================
// CHAMBER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chamber {
    Senate,
    House,
}

impl Chamber {
    /// Map the roster short code ("sen" / "rep") to a chamber
    pub fn from_code(code: &str) -> Option<Chamber> {
        match code.trim() {
            "sen" => Some(Chamber::Senate),
            "rep" => Some(Chamber::House),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Chamber::Senate => "sen",
            Chamber::House => "rep",
        }
    }
}

// ============================================================================
// LEGISLATOR RECORD
// ============================================================================

/// One current term-holder.
///
/// Identity: `stable_id` (bioguide id). Everything else is a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegislatorRecord {
    pub stable_id: String,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub chamber: Chamber,
    pub state: String,
    /// House only
    pub district: Option<String>,
    /// Trimmed, original case
    pub party: String,
    /// ISO date text, parsed on demand
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub office_address: Option<String>,
    pub official_url: Option<String>,
    pub contact_form_url: Option<String>,
    pub finance_disclosure_id: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl LegislatorRecord {
    /// Project a raw roster row into a record.
    ///
    /// Returns `None` when the row has no stable id or an unknown chamber
    /// code; those rows cannot take part in identity matching.
    pub fn from_row(row: &RosterRow) -> Option<LegislatorRecord> {
        let stable_id = non_empty(&row.bioguide_id)?;
        let chamber = Chamber::from_code(&row.chamber)?;

        let first_name = row.first_name.trim().to_string();
        let last_name = row.last_name.trim().to_string();
        let full_name = non_empty(&row.full_name)
            .unwrap_or_else(|| format!("{} {}", first_name, last_name).trim().to_string());

        let district = match chamber {
            Chamber::House => non_empty(&row.district),
            Chamber::Senate => None,
        };

        Some(LegislatorRecord {
            stable_id,
            full_name,
            first_name,
            last_name,
            nickname: non_empty(&row.nickname),
            chamber,
            state: row.state.trim().to_string(),
            district,
            party: row.party.trim().to_string(),
            birth_date: non_empty(&row.birthday),
            phone: non_empty(&row.phone),
            office_address: non_empty(&row.address),
            official_url: non_empty(&row.url),
            contact_form_url: non_empty(&row.contact_form),
            finance_disclosure_id: non_empty(&row.opensecrets_id),
        })
    }

    /// Normalized names this legislator answers to exactly:
    /// full name, "first last", "nickname last"
    pub fn exact_keys(&self) -> Vec<String> {
        let mut keys = vec![
            normalize(&self.full_name),
            normalize(&format!("{} {}", self.first_name, self.last_name)),
        ];
        if let Some(nickname) = &self.nickname {
            keys.push(normalize(&format!("{} {}", nickname, self.last_name)));
        }
        keys
    }

    /// Normalized fields searched by substring queries
    pub fn search_fields(&self) -> [String; 4] {
        [
            normalize(&self.full_name),
            normalize(&self.first_name),
            normalize(&self.last_name),
            self.nickname.as_deref().map(normalize).unwrap_or_default(),
        ]
    }

    /// Nickname-preferring name for display
    pub fn display_name(&self) -> String {
        match &self.nickname {
            Some(nickname) => format!("{} {}", nickname, self.last_name),
            None => self.full_name.clone(),
        }
    }

    pub fn is_senator(&self) -> bool {
        self.chamber == Chamber::Senate
    }
}

// ============================================================================
// LEGISLATOR INDEX
// ============================================================================

/// Immutable, in-memory roster index.
///
/// Entries keep source order. Exact lookups go through a hash map from
/// normalized name to the FIRST entry (in source order) carrying that key;
/// substring lookups scan linearly.
#[derive(Debug, Clone, Default)]
pub struct LegislatorIndex {
    entries: Vec<LegislatorRecord>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
    skipped_rows: usize,
}

impl LegislatorIndex {
    /// Build the index from raw roster rows. O(n).
    pub fn build(rows: &[RosterRow]) -> Self {
        let mut index = LegislatorIndex::default();

        for (line, row) in rows.iter().enumerate() {
            let Some(record) = LegislatorRecord::from_row(row) else {
                warn!(
                    row = line + 1,
                    bioguide_id = %row.bioguide_id,
                    chamber = %row.chamber,
                    "skipping roster row without stable id or known chamber"
                );
                index.skipped_rows += 1;
                continue;
            };

            index.insert(record);
        }

        info!(
            legislators = index.entries.len(),
            skipped = index.skipped_rows,
            "built legislator index"
        );
        index
    }

    /// Build directly from already-projected records (tests, refresh from a
    /// previously validated roster)
    pub fn from_records(records: Vec<LegislatorRecord>) -> Self {
        let mut index = LegislatorIndex::default();
        for record in records {
            index.insert(record);
        }
        index
    }

    // Earlier entries keep their keys; later duplicates only append.
    fn insert(&mut self, record: LegislatorRecord) {
        let position = self.entries.len();
        for key in record.exact_keys() {
            if !key.is_empty() {
                self.by_name.entry(key).or_insert(position);
            }
        }
        self.by_id
            .entry(record.stable_id.clone())
            .or_insert(position);
        self.entries.push(record);
    }

    /// First entry (source order) whose exact key equals the normalized name
    pub fn find_by_name(&self, normalized_name: &str) -> Option<&LegislatorRecord> {
        self.by_name
            .get(normalized_name)
            .and_then(|&i| self.entries.get(i))
    }

    pub fn find_by_id(&self, stable_id: &str) -> Option<&LegislatorRecord> {
        self.by_id
            .get(stable_id.trim())
            .and_then(|&i| self.entries.get(i))
    }

    /// All entries in source order
    pub fn entries(&self) -> &[LegislatorRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows dropped during build (no stable id / unknown chamber)
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn senators_for(&self, state: &str) -> impl Iterator<Item = &LegislatorRecord> + '_ {
        let state = state.trim().to_string();
        self.entries
            .iter()
            .filter(move |leg| leg.chamber == Chamber::Senate && leg.state == state)
    }

    /// First House member for state + district, in source order
    pub fn representative_for(&self, state: &str, district: &str) -> Option<&LegislatorRecord> {
        let state = state.trim();
        let district = district.trim();
        self.entries.iter().find(|leg| {
            leg.chamber == Chamber::House
                && leg.state == state
                && leg.district.as_deref() == Some(district)
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{roster_row, sample_roster};

    #[test]
    fn test_chamber_from_code() {
        assert_eq!(Chamber::from_code("sen"), Some(Chamber::Senate));
        assert_eq!(Chamber::from_code(" rep "), Some(Chamber::House));
        assert_eq!(Chamber::from_code("del"), None);
        assert_eq!(Chamber::from_code(""), None);
    }

    #[test]
    fn test_from_row_derives_full_name() {
        let mut row = roster_row("X000001", "", "Pat", "Doe", "sen", "OH", "", "Democrat");
        row.full_name = String::new();
        let record = LegislatorRecord::from_row(&row).unwrap();
        assert_eq!(record.full_name, "Pat Doe");
    }

    #[test]
    fn test_from_row_trims_party_and_drops_senate_district() {
        let mut row = roster_row("X000002", "Pat Doe", "Pat", "Doe", "sen", "OH", "3", "  Republican ");
        row.birthday = " ".to_string();
        let record = LegislatorRecord::from_row(&row).unwrap();
        assert_eq!(record.party, "Republican");
        assert_eq!(record.district, None);
        assert_eq!(record.birth_date, None);
    }

    #[test]
    fn test_from_row_rejects_unusable_rows() {
        let no_id = roster_row("", "Pat Doe", "Pat", "Doe", "sen", "OH", "", "Democrat");
        assert!(LegislatorRecord::from_row(&no_id).is_none());

        let bad_chamber = roster_row("X1", "Pat Doe", "Pat", "Doe", "gov", "OH", "", "Democrat");
        assert!(LegislatorRecord::from_row(&bad_chamber).is_none());
    }

    #[test]
    fn test_display_name_prefers_nickname() {
        let index = LegislatorIndex::build(&sample_roster());
        let sanders = index.find_by_id("S000033").unwrap();
        assert_eq!(sanders.display_name(), "Bernie Sanders");

        let klobuchar = index.find_by_id("K000367").unwrap();
        assert_eq!(klobuchar.display_name(), "Amy Klobuchar");
    }

    #[test]
    fn test_build_skips_bad_rows() {
        let mut rows = sample_roster();
        rows.push(roster_row("", "Nobody", "No", "Body", "sen", "XX", "", ""));
        let index = LegislatorIndex::build(&rows);
        assert_eq!(index.len(), sample_roster().len());
        assert_eq!(index.skipped_rows(), 1);
    }

    #[test]
    fn test_find_by_name_uses_all_key_kinds() {
        let index = LegislatorIndex::build(&sample_roster());
        assert_eq!(index.find_by_name("bernard sanders").unwrap().stable_id, "S000033");
        assert_eq!(index.find_by_name("bernie sanders").unwrap().stable_id, "S000033");
        assert!(index.find_by_name("sanders").is_none());
    }

    #[test]
    fn test_find_by_name_first_in_source_order_wins() {
        let rows = vec![
            roster_row("A1", "Chris Smith", "Chris", "Smith", "rep", "NJ", "4", "Republican"),
            roster_row("A2", "Chris Smith", "Chris", "Smith", "rep", "TX", "9", "Democrat"),
        ];
        let index = LegislatorIndex::build(&rows);
        assert_eq!(index.find_by_name("chris smith").unwrap().stable_id, "A1");
    }

    #[test]
    fn test_find_by_id() {
        let index = LegislatorIndex::build(&sample_roster());
        assert_eq!(index.find_by_id("K000367").unwrap().last_name, "Klobuchar");
        assert!(index.find_by_id("nope").is_none());
    }

    #[test]
    fn test_senators_and_representative() {
        let index = LegislatorIndex::build(&sample_roster());
        let senators: Vec<_> = index.senators_for("MN").map(|l| l.stable_id.as_str()).collect();
        assert_eq!(senators, vec!["K000367", "S001203"]);

        let rep = index.representative_for("MN", "5").unwrap();
        assert_eq!(rep.stable_id, "O000173");
        assert!(index.representative_for("MN", "9").is_none());
    }
}
