// 🔗 Record Linker - vote records ↔ legislators (many-to-many)
//
// A record links to a queried name when ANY of its politician names:
//   1. equals the queried name case-insensitively (fast path, no roster), or
//   2. resolves (exact match) to the same stable id as the queried name.
//
// Path 2 is what makes "Bernard Sanders" and "Bernie Sanders" one person.
//
// Linking to a roster entry (no queried name) goes by stable id: a record
// name counts when it resolves to that entry, or resolves to nothing and
// equals the entry's full name. Two entries sharing a full name therefore
// never both claim the same record.
//
// `RecordLinker` resolves every record name to a stable id ONCE, when the
// snapshot is built; the free functions resolve lazily. Both give the same
// answer for the same inputs.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::entities::{LegislatorIndex, LegislatorRecord, RecordKind, VoteRecord};
use crate::matcher::{match_exact, normalize, resolve_id};

// ============================================================================
// AGGREGATES
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    pub count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
}

/// Pure reduction over a record set
pub fn aggregate<'a, I>(records: I) -> RecordStats
where
    I: IntoIterator<Item = &'a VoteRecord>,
{
    records
        .into_iter()
        .fold(RecordStats::default(), |mut stats, record| {
            stats.count += 1;
            match record.kind {
                RecordKind::Positive => stats.positive_count += 1,
                RecordKind::Negative => stats.negative_count += 1,
            }
            stats
        })
}

// ============================================================================
// LAZY LINKING
// ============================================================================

fn same_text(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

fn names_legislator(name: &str, resolved: Option<&str>, legislator: &LegislatorRecord) -> bool {
    match resolved {
        Some(id) => id == legislator.stable_id,
        None => same_text(name, &legislator.full_name),
    }
}

/// Does `record` mention `query_name` (verbatim) or the legislator `target_id`?
fn links_to(
    record: &VoteRecord,
    query_name: &str,
    target_id: Option<&str>,
    index: &LegislatorIndex,
) -> bool {
    record.politician_names.iter().any(|name| {
        if same_text(name, query_name) {
            return true;
        }
        match target_id {
            Some(id) => resolve_id(name, index).as_deref() == Some(id),
            None => false,
        }
    })
}

/// Records linked to a free-text name, in collection order
pub fn records_for<'a>(
    name: &str,
    all_records: &'a [VoteRecord],
    index: &LegislatorIndex,
) -> Vec<&'a VoteRecord> {
    let target = match_exact(name, index).map(|leg| leg.stable_id.as_str());
    all_records
        .iter()
        .filter(|record| links_to(record, name, target, index))
        .collect()
}

/// Records linked to a roster entry by stable id
pub fn records_for_legislator<'a>(
    legislator: &LegislatorRecord,
    all_records: &'a [VoteRecord],
    index: &LegislatorIndex,
) -> Vec<&'a VoteRecord> {
    all_records
        .iter()
        .filter(|record| {
            record.politician_names.iter().any(|name| {
                names_legislator(name, resolve_id(name, index).as_deref(), legislator)
            })
        })
        .collect()
}

// ============================================================================
// PRE-RESOLVED LINKER
// ============================================================================

/// A politician name on a record that matches nothing in the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedName {
    pub record_id: String,
    pub name: String,
}

/// A record plus the stable id each of its names resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRecord {
    pub record: VoteRecord,
    /// Parallel to `record.politician_names`
    pub politician_ids: Vec<Option<String>>,
}

impl ResolvedRecord {
    fn links_to(&self, query_name: &str, target_id: Option<&str>) -> bool {
        self.record
            .politician_names
            .iter()
            .zip(&self.politician_ids)
            .any(|(name, id)| {
                same_text(name, query_name)
                    || (target_id.is_some() && id.as_deref() == target_id)
            })
    }

    fn links_to_legislator(&self, legislator: &LegislatorRecord) -> bool {
        self.record
            .politician_names
            .iter()
            .zip(&self.politician_ids)
            .any(|(name, id)| names_legislator(name, id.as_deref(), legislator))
    }

    /// Resolved ids, first occurrence order, no repeats
    pub fn resolved_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.politician_ids.iter().flatten() {
            if !ids.contains(&id.as_str()) {
                ids.push(id.as_str());
            }
        }
        ids
    }

    pub fn unresolved_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.record
            .politician_names
            .iter()
            .zip(&self.politician_ids)
            .filter(|(_, id)| id.is_none())
            .map(|(name, _)| name.as_str())
    }
}

/// Grouping key for per-politician aggregation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PoliticianKey {
    StableId(String),
    /// Lowercased free-text name that never resolved
    Unresolved(String),
}

/// All records mentioning one politician
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoliticianGroup<'a> {
    pub key: PoliticianKey,
    /// Spelling from the first record that mentioned this politician
    pub name: String,
    /// State hint from that first record
    pub state: Option<String>,
    pub records: Vec<&'a VoteRecord>,
}

/// Records with every name resolved once against one roster index.
///
/// Built with the snapshot and discarded with it.
#[derive(Debug, Clone, Default)]
pub struct RecordLinker {
    resolved: Vec<ResolvedRecord>,
}

impl RecordLinker {
    pub fn new(records: Vec<VoteRecord>, index: &LegislatorIndex) -> Self {
        let resolved: Vec<ResolvedRecord> = records
            .into_iter()
            .map(|record| {
                let politician_ids = record
                    .politician_names
                    .iter()
                    .map(|name| resolve_id(name, index))
                    .collect();
                ResolvedRecord {
                    record,
                    politician_ids,
                }
            })
            .collect();

        let linker = RecordLinker { resolved };
        for missing in linker.unresolved() {
            warn!(record_id = %missing.record_id, name = %missing.name, "record names unknown politician");
        }
        linker
    }

    pub fn resolved(&self) -> &[ResolvedRecord] {
        &self.resolved
    }

    pub fn records(&self) -> impl Iterator<Item = &VoteRecord> + '_ {
        self.resolved.iter().map(|r| &r.record)
    }

    pub fn find(&self, record_id: &str) -> Option<&ResolvedRecord> {
        self.resolved.iter().find(|r| r.record.id == record_id)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Same semantics as [`records_for`], using the pre-resolved ids
    pub fn records_for(&self, name: &str, index: &LegislatorIndex) -> Vec<&VoteRecord> {
        let target = match_exact(name, index).map(|leg| leg.stable_id.as_str());
        self.linked(name, target)
    }

    /// Same semantics as [`records_for_legislator`]
    pub fn records_for_legislator(&self, legislator: &LegislatorRecord) -> Vec<&VoteRecord> {
        let linked: Vec<&VoteRecord> = self
            .resolved
            .iter()
            .filter(|r| r.links_to_legislator(legislator))
            .map(|r| &r.record)
            .collect();
        debug!(stable_id = %legislator.stable_id, linked = linked.len(), "linked records");
        linked
    }

    fn linked(&self, query_name: &str, target_id: Option<&str>) -> Vec<&VoteRecord> {
        let linked: Vec<&VoteRecord> = self
            .resolved
            .iter()
            .filter(|r| r.links_to(query_name, target_id))
            .map(|r| &r.record)
            .collect();
        debug!(query_name, target_id = ?target_id, linked = linked.len(), "linked records");
        linked
    }

    /// Every (record, name) pair that failed to resolve
    pub fn unresolved(&self) -> Vec<UnresolvedName> {
        self.resolved
            .iter()
            .flat_map(|r| {
                r.unresolved_names().map(move |name| UnresolvedName {
                    record_id: r.record.id.clone(),
                    name: name.to_string(),
                })
            })
            .collect()
    }

    /// Group records per politician, in order of first appearance.
    ///
    /// A record naming several politicians lands in each of their groups,
    /// but at most once per group.
    pub fn group_by_politician(&self) -> Vec<PoliticianGroup<'_>> {
        let mut groups: Vec<PoliticianGroup<'_>> = Vec::new();
        let mut positions: HashMap<PoliticianKey, usize> = HashMap::new();

        for resolved in &self.resolved {
            let record = &resolved.record;
            for (name, id) in record.politician_names.iter().zip(&resolved.politician_ids) {
                let key = match id {
                    Some(id) => PoliticianKey::StableId(id.clone()),
                    None => PoliticianKey::Unresolved(normalize(name)),
                };

                let position = *positions.entry(key.clone()).or_insert_with(|| {
                    groups.push(PoliticianGroup {
                        key,
                        name: name.trim().to_string(),
                        state: record.state.clone(),
                        records: Vec::new(),
                    });
                    groups.len() - 1
                });

                let group = &mut groups[position];
                if !group.records.iter().any(|r| r.id == record.id) {
                    group.records.push(record);
                }
            }
        }

        groups
    }
}

// ============================================================================
// TESTS
// ============================================================================
