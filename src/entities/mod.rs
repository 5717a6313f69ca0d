// Entity Models
// "Identity persists, values change"
//
// - Legislator: stable bioguide id, many textual name variants
// - VoteRecord: free-text names, resolved to legislators when a snapshot is built

pub mod legislator;
pub mod vote_record;

pub use legislator::{Chamber, LegislatorIndex, LegislatorRecord, RosterRow};
pub use vote_record::{RecordKind, VoteRecord};
