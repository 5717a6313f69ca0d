// 🗳️ Vote Record - hand-authored voting-record annotation
//
// Records name politicians by FREE TEXT, not by id: they are written
// before anyone reconciles them against the roster. Resolution to a
// stable id happens later (see `linker`).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// RECORD KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Positive,
    Negative,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Positive => "positive",
            RecordKind::Negative => "negative",
        }
    }

    pub fn parse(value: &str) -> Option<RecordKind> {
        match value.trim().to_lowercase().as_str() {
            "positive" => Some(RecordKind::Positive),
            "negative" => Some(RecordKind::Negative),
            _ => None,
        }
    }
}

// ============================================================================
// VOTE RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Unique id; generated when a seed file omits it
    #[serde(default = "default_record_id")]
    pub id: String,

    #[serde(rename = "type")]
    pub kind: RecordKind,

    pub details: String,

    /// Ordered free-text politician names.
    /// Seed files written for the single-politician format use `name`.
    #[serde(rename = "politicians", alias = "name", deserialize_with = "one_or_many")]
    pub politician_names: Vec<String>,

    /// Display hint for names that never resolve against the roster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn default_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

impl VoteRecord {
    pub fn new(
        id: &str,
        kind: RecordKind,
        details: &str,
        politician_names: &[&str],
        timestamp: DateTime<Utc>,
    ) -> Self {
        VoteRecord {
            id: id.to_string(),
            kind,
            details: details.to_string(),
            politician_names: politician_names.iter().map(|n| n.to_string()).collect(),
            state: None,
            timestamp,
        }
    }

    /// Builder pattern: add state hint
    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn is_positive(&self) -> bool {
        self.kind == RecordKind::Positive
    }

    /// Hash of the record CONTENT (kind, details, names) for idempotent
    /// imports. NOTE: not identity - two imports of the same annotation
    /// under different ids collapse to one row.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.kind.as_str());
        hasher.update([0u8]);
        hasher.update(self.details.trim());
        for name in &self.politician_names {
            hasher.update([0u8]);
            hasher.update(name.trim().to_lowercase());
        }
        format!("{:x}", hasher.finalize())
    }

    /// The built-in seed collection
    pub fn seed() -> Vec<VoteRecord> {
        let at = |day: u32| {
            Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0)
                .single()
                .unwrap_or_else(Utc::now)
        };

        vec![
            VoteRecord::new(
                "1",
                RecordKind::Negative,
                "Voted to increase ACA healthcare premiums for millions of Americans.",
                &["John Fetterman"],
                at(1),
            )
            .with_state("PA"),
            VoteRecord::new(
                "2",
                RecordKind::Positive,
                "Consistently fought for Medicare for All and expanded healthcare access.",
                &["Bernard Sanders"],
                at(2),
            )
            .with_state("VT"),
            VoteRecord::new(
                "3",
                RecordKind::Positive,
                "Authored legislation to raise minimum wage to $15 per hour.",
                &["Bernard Sanders"],
                at(3),
            )
            .with_state("VT"),
            VoteRecord::new(
                "4",
                RecordKind::Positive,
                "Strong advocate for clean energy and environmental protection legislation.",
                &["Maria Cantwell"],
                at(4),
            )
            .with_state("WA"),
            VoteRecord::new(
                "5",
                RecordKind::Negative,
                "Supported legislation weakening antitrust enforcement against big tech companies.",
                &["Amy Klobuchar"],
                at(5),
            )
            .with_state("MN"),
            VoteRecord::new(
                "6",
                RecordKind::Positive,
                "Led bipartisan efforts to lower prescription drug costs.",
                &["Amy Klobuchar"],
                at(6),
            )
            .with_state("MN"),
            VoteRecord::new(
                "7",
                RecordKind::Positive,
                "Leading advocate for climate change action and corporate accountability.",
                &["Sheldon Whitehouse"],
                at(7),
            )
            .with_state("RI"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(RecordKind::parse("Positive"), Some(RecordKind::Positive));
        assert_eq!(RecordKind::parse(" negative "), Some(RecordKind::Negative));
        assert_eq!(RecordKind::parse("neutral"), None);
    }

    #[test]
    fn test_seed_records() {
        let seed = VoteRecord::seed();
        assert_eq!(seed.len(), 7);
        assert_eq!(seed.iter().filter(|r| r.is_positive()).count(), 5);
        assert!(seed.iter().all(|r| r.politician_names.len() == 1));
    }

    #[test]
    fn test_deserialize_single_name_and_missing_id() {
        let json = r#"{"type": "positive", "details": "x", "name": "Amy Klobuchar", "state": "MN"}"#;
        let record: VoteRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.politician_names, vec!["Amy Klobuchar"]);
        assert!(!record.id.is_empty());
        assert_eq!(record.state.as_deref(), Some("MN"));
    }

    #[test]
    fn test_deserialize_many_names() {
        let json = r#"{"id": "9", "type": "negative", "details": "x",
                       "politicians": ["Amy Klobuchar", "Bernard Sanders"],
                       "timestamp": "2025-02-01T00:00:00Z"}"#;
        let record: VoteRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, RecordKind::Negative);
        assert_eq!(record.politician_names.len(), 2);
        assert_eq!(record.timestamp.to_rfc3339(), "2025-02-01T00:00:00+00:00");
    }

    #[test]
    fn test_content_hash_ignores_id_and_name_case() {
        let seed = VoteRecord::seed();
        let mut copy = seed[1].clone();
        copy.id = "other".to_string();
        copy.politician_names = vec!["BERNARD SANDERS".to_string()];
        assert_eq!(seed[1].content_hash(), copy.content_hash());
        assert_ne!(seed[1].content_hash(), seed[2].content_hash());
    }
}
