// Ballot Tracker - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod district;    // ZIP → state + district → delegation
pub mod entities;    // Legislators (identity) + vote records (observations)
pub mod error;
pub mod facade;      // Snapshot + Reconciler: the query surface
pub mod linker;      // Record ↔ politician linking and aggregation
pub mod loader;
pub mod matcher;     // Exact and substring name matching
pub mod navigation;
pub mod profile;     // Profile assembly + recommendation
pub mod store;       // SQLite record store

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use config::AppConfig;
pub use district::{resolve_zip, validate_zip, Delegation, DistrictMapping, DistrictTable, ZipRow};
pub use entities::{
    Chamber, LegislatorIndex, LegislatorRecord, RecordKind, RosterRow, VoteRecord,
};
pub use error::{ErrorKind, LookupError};
pub use facade::{
    DelegationProfiles, Featured, FeaturedPolitician, IdentityRef, PoliticianSummary,
    RecordDetail, Reconciler, Snapshot, FEATURED_LIMIT,
};
pub use linker::{
    aggregate, records_for, PoliticianKey, RecordLinker, RecordStats, ResolvedRecord,
    UnresolvedName,
};
pub use loader::{
    load_record_collection, load_records, load_roster, load_snapshot, load_zip_table,
    seed_records,
};
pub use matcher::{match_exact, match_substring, normalize};
pub use navigation::{Navigator, SearchMode, View};
pub use profile::{
    age_on, profile_for, profile_for_at, recommendation_for, PoliticianProfile, Recommendation,
    Role, RECOMMENDATION_THRESHOLD,
};
pub use store::{count_records, get_all_records, insert_records, setup_record_store};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
