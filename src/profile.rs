// 👤 Politician Profile - derived, render-ready view of one legislator
//
// Nothing here is stored. Role, display name, age and recommendation are
// recomputed from the roster entry and the linked records on every call.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::entities::{Chamber, LegislatorIndex, LegislatorRecord, VoteRecord};
use crate::linker::{aggregate, records_for, RecordStats};
use crate::matcher::{match_exact, normalize};

// ============================================================================
// ROLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Role {
    Senator,
    Representative { district: Option<String> },
    /// No roster entry to derive a role from
    Unknown,
}

impl Role {
    pub fn for_legislator(legislator: &LegislatorRecord) -> Role {
        match legislator.chamber {
            Chamber::Senate => Role::Senator,
            Chamber::House => Role::Representative {
                district: legislator.district.clone(),
            },
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Senator => write!(f, "Senator"),
            Role::Representative {
                district: Some(district),
            } => write!(f, "Representative, District {}", district),
            Role::Representative { district: None } => write!(f, "Representative"),
            Role::Unknown => Ok(()),
        }
    }
}

// ============================================================================
// RECOMMENDATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Recommendation {
    Favorable,
    Unfavorable,
    Undetermined,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Favorable => "Recommended",
            Recommendation::Unfavorable => "Not Recommended",
            Recommendation::Undetermined => "No Recommendation",
        }
    }
}

/// Minimum occurrences of the dominant kind before records decide
pub const RECOMMENDATION_THRESHOLD: usize = 2;

/// Decision table, first matching rule wins:
/// 1. Republican party → Unfavorable, whatever the records say
/// 2. positive > negative and positive >= 2 → Favorable
/// 3. negative > positive and negative >= 2 → Unfavorable
/// 4. otherwise → Undetermined
pub fn recommendation_for<'a, I>(party: &str, linked_records: I) -> Recommendation
where
    I: IntoIterator<Item = &'a VoteRecord>,
{
    if normalize(party) == "republican" {
        return Recommendation::Unfavorable;
    }
    recommendation_from_stats(&aggregate(linked_records))
}

/// Rules 2-4 of [`recommendation_for`], for callers that already aggregated
fn recommendation_from_stats(stats: &RecordStats) -> Recommendation {
    let (positive, negative) = (stats.positive_count, stats.negative_count);
    if positive > negative && positive >= RECOMMENDATION_THRESHOLD {
        Recommendation::Favorable
    } else if negative > positive && negative >= RECOMMENDATION_THRESHOLD {
        Recommendation::Unfavorable
    } else {
        Recommendation::Undetermined
    }
}

pub(crate) fn recommendation_with_stats(party: &str, stats: &RecordStats) -> Recommendation {
    if normalize(party) == "republican" {
        Recommendation::Unfavorable
    } else {
        recommendation_from_stats(stats)
    }
}

// ============================================================================
// AGE
// ============================================================================

/// Whole years elapsed between an ISO birth date and `today`.
///
/// None when the date does not parse or lies in the future.
pub fn age_on(birth_date: &str, today: NaiveDate) -> Option<u32> {
    let born = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d").ok()?;
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

// ============================================================================
// PROFILE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoliticianProfile {
    pub stable_id: String,
    /// Canonical roster name
    pub name: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub chamber: Chamber,
    pub state: String,
    pub district: Option<String>,
    pub party: String,
    pub role: String,
    pub birth_date: Option<String>,
    pub age: Option<u32>,

    // Contact
    pub phone: Option<String>,
    pub office_address: Option<String>,
    pub official_url: Option<String>,
    pub contact_form_url: Option<String>,
    pub finance_disclosure_id: Option<String>,

    // Record-derived
    pub recommendation: Recommendation,
    pub linked_records: Vec<VoteRecord>,
    pub record_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
}

impl PoliticianProfile {
    /// Assemble a profile from a roster entry and its already-linked records
    pub fn assemble(
        legislator: &LegislatorRecord,
        linked_records: &[&VoteRecord],
        today: NaiveDate,
    ) -> PoliticianProfile {
        let stats = aggregate(linked_records.iter().copied());

        PoliticianProfile {
            stable_id: legislator.stable_id.clone(),
            name: legislator.full_name.clone(),
            display_name: legislator.display_name(),
            first_name: legislator.first_name.clone(),
            last_name: legislator.last_name.clone(),
            nickname: legislator.nickname.clone(),
            chamber: legislator.chamber,
            state: legislator.state.clone(),
            district: legislator.district.clone(),
            party: legislator.party.clone(),
            role: Role::for_legislator(legislator).to_string(),
            birth_date: legislator.birth_date.clone(),
            age: legislator
                .birth_date
                .as_deref()
                .and_then(|date| age_on(date, today)),
            phone: legislator.phone.clone(),
            office_address: legislator.office_address.clone(),
            official_url: legislator.official_url.clone(),
            contact_form_url: legislator.contact_form_url.clone(),
            finance_disclosure_id: legislator.finance_disclosure_id.clone(),
            recommendation: recommendation_with_stats(&legislator.party, &stats),
            linked_records: linked_records.iter().map(|r| (*r).clone()).collect(),
            record_count: stats.count,
            positive_count: stats.positive_count,
            negative_count: stats.negative_count,
        }
    }

    pub fn stats(&self) -> RecordStats {
        RecordStats {
            count: self.record_count,
            positive_count: self.positive_count,
            negative_count: self.negative_count,
        }
    }
}

/// Profile for a free-text name as of `today`; None when the name does not
/// resolve against the roster.
pub fn profile_for_at(
    name: &str,
    index: &LegislatorIndex,
    all_records: &[VoteRecord],
    today: NaiveDate,
) -> Option<PoliticianProfile> {
    let legislator = match_exact(name, index)?;
    let linked = records_for(name, all_records, index);
    Some(PoliticianProfile::assemble(legislator, &linked, today))
}

/// [`profile_for_at`] using the local calendar date
pub fn profile_for(
    name: &str,
    index: &LegislatorIndex,
    all_records: &[VoteRecord],
) -> Option<PoliticianProfile> {
    profile_for_at(name, index, all_records, today())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// TESTS
// ============================================================================
