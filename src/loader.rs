// 📂 Loaders - reference tables and record seeds → in-memory rows
//
// All I/O lives here. The reconciliation core only ever sees the
// materialized Vecs these functions return.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::config::AppConfig;
use crate::district::ZipRow;
use crate::entities::{RosterRow, VoteRecord};
use crate::facade::Snapshot;
use crate::store::{get_all_records, setup_record_store};

fn read_csv<T, R>(reader: R, what: &str) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let row: T = result.with_context(|| format!("Failed to deserialize {} row {}", what, line + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Legislators CSV (header row; extra columns ignored)
pub fn load_roster(path: &Path) -> Result<Vec<RosterRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open roster CSV {}", path.display()))?;
    let rows = read_csv(file, "roster")?;
    info!(path = %path.display(), rows = rows.len(), "loaded roster");
    Ok(rows)
}

pub fn parse_roster(data: &str) -> Result<Vec<RosterRow>> {
    read_csv(data.as_bytes(), "roster")
}

/// ZIP → district CSV (`zip, state_abbr, cd`)
pub fn load_zip_table(path: &Path) -> Result<Vec<ZipRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open ZIP CSV {}", path.display()))?;
    let rows = read_csv(file, "zip")?;
    info!(path = %path.display(), rows = rows.len(), "loaded zip table");
    Ok(rows)
}

pub fn parse_zip_table(data: &str) -> Result<Vec<ZipRow>> {
    read_csv(data.as_bytes(), "zip")
}

/// JSON array of vote records
pub fn load_records(path: &Path) -> Result<Vec<VoteRecord>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file {}", path.display()))?;
    let records: Vec<VoteRecord> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse records file {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}

/// Records to import: the configured JSON seed, else the built-in seed
pub fn seed_records(config: &AppConfig) -> Result<Vec<VoteRecord>> {
    match &config.data.records {
        Some(path) => load_records(path),
        None => Ok(VoteRecord::seed()),
    }
}

/// The record collection for a session: the record store when it holds
/// anything, else the seed
pub fn load_record_collection(config: &AppConfig) -> Result<Vec<VoteRecord>> {
    let db_path = &config.database.path;
    if db_path.exists() {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open record store {}", db_path.display()))?;
        setup_record_store(&conn)?;
        let records = get_all_records(&conn)?;
        if !records.is_empty() {
            info!(path = %db_path.display(), records = records.len(), "loaded records from store");
            return Ok(records);
        }
    }
    seed_records(config)
}

/// Load all three tables and build a snapshot
pub fn load_snapshot(config: &AppConfig) -> Result<Snapshot> {
    let roster = load_roster(&config.data.roster)?;
    let zips = load_zip_table(&config.data.zip_districts)?;
    let records = load_record_collection(config)?;
    Ok(Snapshot::build(&roster, &zips, records))
}
