// 💾 Record Store - SQLite persistence for vote records
//
// The reconciliation core never touches this: the binaries load the record
// collection from here once, then hand the Vec to `Snapshot::build`.
// Imports are idempotent: the content hash is UNIQUE.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::info;

use crate::entities::{RecordKind, VoteRecord};

pub fn setup_record_store(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS vote_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            record_id TEXT UNIQUE NOT NULL,
            content_hash TEXT UNIQUE NOT NULL,
            kind TEXT NOT NULL,
            details TEXT NOT NULL,
            politicians TEXT NOT NULL,
            state TEXT,
            timestamp TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_vote_records_timestamp ON vote_records(timestamp)",
        [],
    )?;

    Ok(())
}

/// Insert records, skipping ones already stored (same id or same content).
/// Returns the number actually inserted.
pub fn insert_records(conn: &Connection, records: &[VoteRecord]) -> Result<usize> {
    let mut inserted = 0;
    let mut duplicates = 0;

    for record in records {
        let politicians = serde_json::to_string(&record.politician_names)?;

        let result = conn.execute(
            "INSERT INTO vote_records (
                record_id, content_hash, kind, details, politicians, state, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.content_hash(),
                record.kind.as_str(),
                record.details,
                politicians,
                record.state,
                record.timestamp.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => inserted += 1,
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                duplicates += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(inserted, duplicates, "stored vote records");
    Ok(inserted)
}

/// All stored records, oldest first (ties broken by insertion order)
pub fn get_all_records(conn: &Connection) -> Result<Vec<VoteRecord>> {
    let mut stmt = conn.prepare(
        "SELECT record_id, kind, details, politicians, state, timestamp
         FROM vote_records
         ORDER BY timestamp ASC, id ASC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, kind, details, politicians, state, timestamp)| {
            let kind = RecordKind::parse(&kind)
                .ok_or_else(|| anyhow!("record {}: unknown kind '{}'", id, kind))?;
            let politician_names: Vec<String> = serde_json::from_str(&politicians)
                .with_context(|| format!("record {}: bad politician list", id))?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                .with_context(|| format!("record {}: bad timestamp", id))?
                .with_timezone(&Utc);

            Ok(VoteRecord {
                id,
                kind,
                details,
                politician_names,
                state,
                timestamp,
            })
        })
        .collect()
}

pub fn count_records(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM vote_records", [], |row| row.get(0))?;

    Ok(count)
}
