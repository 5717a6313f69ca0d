// 🧭 Reconciliation Facade - the single entry point for presentation layers
//
// Snapshot = roster index + ZIP table + pre-resolved records, built
// together and never mutated. `Reconciler` publishes one snapshot at a
// time; `refresh` builds the next one off to the side and swaps the Arc,
// so an in-flight query keeps the snapshot it started with.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use crate::district::{resolve_zip, DistrictTable, ZipRow};
use crate::entities::{LegislatorIndex, LegislatorRecord, RosterRow, VoteRecord};
use crate::error::LookupError;
use crate::linker::{
    aggregate, PoliticianKey, RecordLinker, RecordStats, ResolvedRecord, UnresolvedName,
};
use crate::matcher::{match_exact, match_substring};
use crate::profile::{recommendation_with_stats, today, PoliticianProfile, Recommendation, Role};

/// Default size of each featured list
pub const FEATURED_LIMIT: usize = 3;

// ============================================================================
// QUERY / RESULT TYPES
// ============================================================================

/// How the presentation layer refers to a politician
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum IdentityRef {
    StableId(String),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelegationProfiles {
    pub zip: String,
    pub state: String,
    pub district: String,
    /// Senators first, then the representative
    pub members: Vec<PoliticianProfile>,
}

/// Short identity line for record listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoliticianSummary {
    pub stable_id: String,
    pub display_name: String,
    pub role: String,
    pub state: String,
    pub party: String,
}

impl From<&LegislatorRecord> for PoliticianSummary {
    fn from(legislator: &LegislatorRecord) -> Self {
        PoliticianSummary {
            stable_id: legislator.stable_id.clone(),
            display_name: legislator.display_name(),
            role: Role::for_legislator(legislator).to_string(),
            state: legislator.state.clone(),
            party: legislator.party.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordDetail {
    pub record: VoteRecord,
    /// Resolved politicians; empty when no name resolved
    pub politicians: Vec<PoliticianSummary>,
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedPolitician {
    pub key: PoliticianKey,
    pub name: String,
    pub display_name: String,
    /// Roster state, else the record's state hint
    pub state: String,
    pub role: String,
    pub party: String,
    pub stats: RecordStats,
    pub recommendation: Recommendation,
    pub records: Vec<VoteRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Featured {
    pub positive: Vec<FeaturedPolitician>,
    pub negative: Vec<FeaturedPolitician>,
}

// ============================================================================
// SNAPSHOT
// ============================================================================

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub index: LegislatorIndex,
    pub districts: DistrictTable,
    pub linker: RecordLinker,
    pub built_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn build(roster: &[RosterRow], zips: &[ZipRow], records: Vec<VoteRecord>) -> Self {
        let index = LegislatorIndex::build(roster);
        let districts = DistrictTable::build(zips);
        let linker = RecordLinker::new(records, &index);

        info!(
            legislators = index.len(),
            zips = districts.len(),
            records = linker.len(),
            unresolved = linker.unresolved().len(),
            "built snapshot"
        );

        Snapshot {
            index,
            districts,
            linker,
            built_at: Utc::now(),
        }
    }

    fn profile_of(&self, legislator: &LegislatorRecord, today: NaiveDate) -> PoliticianProfile {
        let linked = self.linker.records_for_legislator(legislator);
        PoliticianProfile::assemble(legislator, &linked, today)
    }

    pub fn search_by_zip_at(
        &self,
        zip: &str,
        today: NaiveDate,
    ) -> Result<DelegationProfiles, LookupError> {
        let delegation = resolve_zip(zip, &self.index, &self.districts)?;
        let members = delegation
            .members()
            .into_iter()
            .map(|legislator| self.profile_of(legislator, today))
            .collect();

        Ok(DelegationProfiles {
            zip: delegation.zip,
            state: delegation.state,
            district: delegation.district,
            members,
        })
    }

    /// Substring search, one profile per stable id (first in roster order)
    pub fn search_by_name_at(
        &self,
        query: &str,
        today: NaiveDate,
    ) -> Result<Vec<PoliticianProfile>, LookupError> {
        if query.trim().is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let mut seen: Vec<&str> = Vec::new();
        let mut profiles = Vec::new();
        for legislator in match_substring(query, &self.index) {
            if seen.contains(&legislator.stable_id.as_str()) {
                continue;
            }
            seen.push(&legislator.stable_id);
            profiles.push(self.profile_of(legislator, today));
        }

        debug!(query, matches = profiles.len(), "name search");
        Ok(profiles)
    }

    pub fn get_profile_at(
        &self,
        reference: &IdentityRef,
        today: NaiveDate,
    ) -> Result<PoliticianProfile, LookupError> {
        match reference {
            IdentityRef::StableId(id) => self
                .index
                .find_by_id(id)
                .map(|legislator| self.profile_of(legislator, today))
                .ok_or_else(|| LookupError::NotFound(id.clone())),
            IdentityRef::Name(name) => match_exact(name, &self.index)
                .map(|legislator| {
                    let linked = self.linker.records_for(name, &self.index);
                    PoliticianProfile::assemble(legislator, &linked, today)
                })
                .ok_or_else(|| LookupError::NotFound(name.clone())),
        }
    }

    /// Records naming `name`, whether or not it is on the roster
    pub fn records_for_name(&self, name: &str) -> Vec<VoteRecord> {
        self.linker
            .records_for(name, &self.index)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Treat `raw` as a stable id when the roster knows it, else as a name
    pub fn identity_ref(&self, raw: &str) -> IdentityRef {
        if self.index.find_by_id(raw).is_some() {
            IdentityRef::StableId(raw.trim().to_string())
        } else {
            IdentityRef::Name(raw.to_string())
        }
    }

    fn detail_of(&self, resolved: &ResolvedRecord) -> RecordDetail {
        RecordDetail {
            record: resolved.record.clone(),
            politicians: resolved
                .resolved_ids()
                .into_iter()
                .filter_map(|id| self.index.find_by_id(id))
                .map(PoliticianSummary::from)
                .collect(),
            unresolved: resolved.unresolved_names().map(str::to_string).collect(),
        }
    }

    pub fn record_detail(&self, record_id: &str) -> Result<RecordDetail, LookupError> {
        self.linker
            .find(record_id)
            .map(|resolved| self.detail_of(resolved))
            .ok_or_else(|| LookupError::NotFound(record_id.to_string()))
    }

    /// Every record, in collection order. Unresolved names never drop a record.
    pub fn list_records(&self) -> Vec<RecordDetail> {
        self.linker
            .resolved()
            .iter()
            .map(|resolved| self.detail_of(resolved))
            .collect()
    }

    pub fn unresolved_names(&self) -> Vec<UnresolvedName> {
        self.linker.unresolved()
    }

    /// Politicians grouped across all records, first appearance order
    pub fn politicians_with_records(&self) -> Vec<FeaturedPolitician> {
        self.linker
            .group_by_politician()
            .into_iter()
            .map(|group| {
                let legislator = match &group.key {
                    PoliticianKey::StableId(id) => self.index.find_by_id(id),
                    PoliticianKey::Unresolved(_) => None,
                };
                let stats = aggregate(group.records.iter().copied());
                let party = legislator.map(|l| l.party.clone()).unwrap_or_default();

                FeaturedPolitician {
                    name: legislator
                        .map(|l| l.full_name.clone())
                        .unwrap_or_else(|| group.name.clone()),
                    display_name: legislator
                        .map(LegislatorRecord::display_name)
                        .unwrap_or_else(|| group.name.clone()),
                    state: legislator
                        .map(|l| l.state.clone())
                        .or_else(|| group.state.clone())
                        .unwrap_or_default(),
                    role: legislator
                        .map(Role::for_legislator)
                        .unwrap_or(Role::Unknown)
                        .to_string(),
                    recommendation: recommendation_with_stats(&party, &stats),
                    party,
                    stats,
                    records: group.records.iter().map(|r| (*r).clone()).collect(),
                    key: group.key,
                }
            })
            .collect()
    }

    pub fn featured(&self, limit: usize) -> Featured {
        let all = self.politicians_with_records();
        Featured {
            positive: all
                .iter()
                .filter(|p| p.stats.positive_count > 0)
                .take(limit)
                .cloned()
                .collect(),
            negative: all
                .iter()
                .filter(|p| p.stats.negative_count > 0)
                .take(limit)
                .cloned()
                .collect(),
        }
    }
}

// ============================================================================
// RECONCILER
// ============================================================================

/// Thread-safe handle publishing the current snapshot
pub struct Reconciler {
    current: RwLock<Arc<Snapshot>>,
}

impl Reconciler {
    pub fn new(snapshot: Snapshot) -> Self {
        Reconciler {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot queries should run against
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Publish a fully built snapshot; readers never observe a partial one
    pub fn refresh(&self, snapshot: Snapshot) {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = next;
        info!(built_at = %guard.built_at, "published new snapshot");
    }

    pub fn search_by_zip(&self, zip: &str) -> Result<DelegationProfiles, LookupError> {
        self.snapshot().search_by_zip_at(zip, today())
    }

    pub fn search_by_name(&self, query: &str) -> Result<Vec<PoliticianProfile>, LookupError> {
        self.snapshot().search_by_name_at(query, today())
    }

    pub fn get_profile(&self, reference: &IdentityRef) -> Result<PoliticianProfile, LookupError> {
        self.snapshot().get_profile_at(reference, today())
    }

    /// [`Reconciler::get_profile`] for a raw string that may be an id or a name
    pub fn lookup_profile(&self, raw: &str) -> Result<PoliticianProfile, LookupError> {
        let snapshot = self.snapshot();
        let reference = snapshot.identity_ref(raw);
        snapshot.get_profile_at(&reference, today())
    }

    pub fn record_detail(&self, record_id: &str) -> Result<RecordDetail, LookupError> {
        self.snapshot().record_detail(record_id)
    }

    pub fn records_for_name(&self, name: &str) -> Vec<VoteRecord> {
        self.snapshot().records_for_name(name)
    }

    pub fn list_records(&self) -> Vec<RecordDetail> {
        self.snapshot().list_records()
    }

    pub fn featured(&self) -> Featured {
        self.snapshot().featured(FEATURED_LIMIT)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RecordKind::{Negative, Positive};
    use crate::error::ErrorKind;
    use crate::fixtures::{record, roster_row, sample_roster, sample_zip_rows};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn snapshot() -> Snapshot {
        Snapshot::build(&sample_roster(), &sample_zip_rows(), VoteRecord::seed())
    }

    fn reconciler() -> Reconciler {
        Reconciler::new(snapshot())
    }

    #[test]
    fn test_search_by_zip_validation() {
        let reconciler = reconciler();
        for bad in ["1234", "abcde", "123456"] {
            let err = reconciler.search_by_zip(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        let err = reconciler.search_by_zip("99999").unwrap_err();
        assert_eq!(err, LookupError::ZipNotFound("99999".to_string()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_search_by_zip_profiles() {
        let delegation = snapshot().search_by_zip_at("55401", date()).unwrap();
        let names: Vec<_> = delegation.members.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Amy Klobuchar", "Tina Smith", "Ilhan Omar"]);
        assert_eq!(delegation.members[0].record_count, 2);
        assert_eq!(delegation.members[2].role, "Representative, District 5");
    }

    #[test]
    fn test_search_by_name() {
        let snapshot = snapshot();
        let results = snapshot.search_by_name_at("sanders", date()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record_count, 2);
        assert_eq!(results[0].recommendation, Recommendation::Favorable);

        assert!(snapshot.search_by_name_at("zzz", date()).unwrap().is_empty());
        assert_eq!(snapshot.search_by_name_at("   ", date()), Err(LookupError::EmptyQuery));
    }

    #[test]
    fn test_search_by_name_dedups_by_stable_id() {
        let mut roster = sample_roster();
        roster.push(roster_row("K000367", "Amy Klobuchar", "Amy", "Klobuchar", "sen", "MN", "", "Democrat"));
        let snapshot = Snapshot::build(&roster, &sample_zip_rows(), Vec::new());
        assert_eq!(snapshot.search_by_name_at("klo", date()).unwrap().len(), 1);
    }

    #[test]
    fn test_get_profile_end_to_end() {
        let reconciler = reconciler();
        let profile = reconciler
            .get_profile(&IdentityRef::Name("Amy Klobuchar".to_string()))
            .unwrap();
        assert_eq!(profile.role, "Senator");
        assert_eq!(profile.record_count, 2);
        assert_eq!(profile.positive_count, 1);
        assert_eq!(profile.negative_count, 1);
        assert_eq!(profile.recommendation, Recommendation::Undetermined);
    }

    #[test]
    fn test_get_profile_by_id_and_name_agree() {
        let snapshot = snapshot();
        let by_id = snapshot
            .get_profile_at(&IdentityRef::StableId("S000033".to_string()), date())
            .unwrap();
        let by_name = snapshot
            .get_profile_at(&IdentityRef::Name("Bernie Sanders".to_string()), date())
            .unwrap();
        assert_eq!(by_id, by_name);
    }

    #[test]
    fn test_get_profile_not_found() {
        let reconciler = reconciler();
        let err = reconciler
            .get_profile(&IdentityRef::Name("Tim Kaine".to_string()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(reconciler.lookup_profile("ZZ000000").is_err());
    }

    #[test]
    fn test_lookup_profile_accepts_id_or_name() {
        let reconciler = reconciler();
        let a = reconciler.lookup_profile("K000367").unwrap();
        let b = reconciler.lookup_profile("amy klobuchar").unwrap();
        assert_eq!(a.stable_id, b.stable_id);
    }

    #[test]
    fn test_consistency_across_paths() {
        // Search, detail and featured must agree on counts for the same person
        let snapshot = Snapshot::build(
            &sample_roster(),
            &sample_zip_rows(),
            vec![
                record("1", Positive, "a", &["Bernard Sanders"]),
                record("2", Positive, "b", &["Bernie Sanders"]),
                record("3", Negative, "c", &["BERNIE SANDERS", "Amy Klobuchar"]),
            ],
        );
        let search = &snapshot.search_by_name_at("bernie", date()).unwrap()[0];
        let detail = snapshot
            .get_profile_at(&IdentityRef::Name("Bernard Sanders".to_string()), date())
            .unwrap();
        let featured = snapshot.politicians_with_records();
        let grouped = featured
            .iter()
            .find(|p| p.key == PoliticianKey::StableId("S000033".to_string()))
            .unwrap();

        assert_eq!(search.stats(), detail.stats());
        assert_eq!(grouped.stats, detail.stats());
        assert_eq!(grouped.recommendation, detail.recommendation);
        assert_eq!(detail.record_count, 3);
    }

    #[test]
    fn test_shared_full_name_counts_agree_across_paths() {
        let roster = vec![
            roster_row("A1", "Chris Smith", "Chris", "Smith", "rep", "NJ", "4", "Democrat"),
            roster_row("A2", "Chris Smith", "Christopher", "Smith", "rep", "NJ", "2", "Democrat"),
        ];
        let snapshot = Snapshot::build(
            &roster,
            &sample_zip_rows(),
            vec![
                record("1", Positive, "a", &["Chris Smith"]),
                record("2", Positive, "b", &["Chris Smith"]),
            ],
        );

        let by_name = snapshot
            .get_profile_at(&IdentityRef::Name("Christopher Smith".to_string()), date())
            .unwrap();
        let by_id = snapshot
            .get_profile_at(&IdentityRef::StableId("A2".to_string()), date())
            .unwrap();
        assert_eq!(by_name.record_count, 0);
        assert_eq!(by_id.record_count, 0);

        let search = snapshot.search_by_name_at("smith", date()).unwrap();
        let counts: Vec<_> = search.iter().map(|p| (p.stable_id.as_str(), p.record_count)).collect();
        assert_eq!(counts, vec![("A1", 2), ("A2", 0)]);

        let featured = snapshot.featured(FEATURED_LIMIT);
        assert_eq!(featured.positive.len(), 1);
        assert_eq!(featured.positive[0].key, PoliticianKey::StableId("A1".to_string()));
        assert_eq!(featured.positive[0].stats.count, 2);
    }

    #[test]
    fn test_records_for_name_off_roster() {
        let snapshot = Snapshot::build(
            &sample_roster(),
            &sample_zip_rows(),
            vec![record("1", Negative, "x", &["Tim Kaine"]).with_state("VA")],
        );
        assert!(snapshot
            .get_profile_at(&IdentityRef::Name("Tim Kaine".to_string()), date())
            .is_err());
        let records = snapshot.records_for_name("tim kaine");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn test_list_records_matches_record_detail() {
        let snapshot = snapshot();
        for listed in snapshot.list_records() {
            assert_eq!(Ok(listed.clone()), snapshot.record_detail(&listed.record.id));
        }
    }

    #[test]
    fn test_featured_lists() {
        let featured = snapshot().featured(FEATURED_LIMIT);
        let positive: Vec<_> = featured.positive.iter().map(|p| p.name.as_str()).collect();
        let negative: Vec<_> = featured.negative.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(positive, vec!["Bernard Sanders", "Maria Cantwell", "Amy Klobuchar"]);
        assert_eq!(negative, vec!["John Fetterman", "Amy Klobuchar"]);
    }

    #[test]
    fn test_featured_keeps_unresolved_politicians() {
        let snapshot = Snapshot::build(
            &sample_roster(),
            &sample_zip_rows(),
            vec![record("1", Negative, "x", &["Tim Kaine"]).with_state("VA")],
        );
        let featured = snapshot.featured(FEATURED_LIMIT);
        assert_eq!(featured.negative.len(), 1);
        assert_eq!(featured.negative[0].role, "");
        assert_eq!(featured.negative[0].state, "VA");
        assert_eq!(featured.negative[0].recommendation, Recommendation::Undetermined);
    }

    #[test]
    fn test_list_records_with_partial_resolution() {
        let snapshot = Snapshot::build(
            &sample_roster(),
            &sample_zip_rows(),
            vec![
                record("1", Positive, "a", &["Amy Klobuchar", "Tim Kaine"]),
                record("2", Negative, "b", &["Nobody Atall"]),
            ],
        );
        let listing = snapshot.list_records();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].politicians.len(), 1);
        assert_eq!(listing[0].unresolved, vec!["Tim Kaine"]);
        assert!(listing[1].politicians.is_empty());
        assert_eq!(snapshot.unresolved_names().len(), 2);

        assert!(matches!(snapshot.record_detail("404"), Err(LookupError::NotFound(_))));
    }

    #[test]
    fn test_refresh_swaps_whole_snapshot() {
        let reconciler = reconciler();
        let before = reconciler.snapshot();
        assert_eq!(before.linker.len(), 7);

        reconciler.refresh(Snapshot::build(&sample_roster(), &sample_zip_rows(), Vec::new()));

        // The old handle still sees its own consistent data
        assert_eq!(before.linker.len(), 7);
        assert_eq!(reconciler.snapshot().linker.len(), 0);
        assert_eq!(
            reconciler
                .get_profile(&IdentityRef::Name("Amy Klobuchar".to_string()))
                .unwrap()
                .record_count,
            0
        );
    }

    #[test]
    fn test_concurrent_readers_during_refresh() {
        let reconciler = Arc::new(reconciler());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reconciler = Arc::clone(&reconciler);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let count = reconciler.list_records().len();
                        assert!(count == 7 || count == 0);
                    }
                })
            })
            .collect();

        reconciler.refresh(Snapshot::build(&sample_roster(), &sample_zip_rows(), Vec::new()));
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
