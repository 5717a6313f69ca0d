// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::env;
use tracing_subscriber::EnvFilter;

use ballot_tracker::{
    count_records, insert_records, load_snapshot, seed_records, setup_record_store, AppConfig,
    Reconciler,
};

const USAGE: &str = "\
usage: ballot-tracker [COMMAND]

commands:
  (none)           interactive terminal UI
  import           load the record seed into the record store
  zip <ZIP>        delegation for a five-digit ZIP code
  name <QUERY>     politicians whose names contain QUERY
  profile <REF>    full profile by bioguide id or exact name";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = AppConfig::load()?;

    match args.get(1).map(String::as_str) {
        None => {
            // UI mode (default); logs would corrupt the alternate screen
            init_tracing("warn");
            run_ui_mode(&config)
        }
        Some("import") => {
            init_tracing("info");
            run_import(&config)
        }
        Some(command @ ("zip" | "name" | "profile")) => {
            init_tracing("warn");
            let Some(argument) = args.get(2) else {
                bail!("missing argument for '{}'\n\n{}", command, USAGE);
            };
            run_query(&config, command, argument)
        }
        Some("help" | "--help" | "-h") => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(other) => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_import(config: &AppConfig) -> Result<()> {
    println!("🗳️  Record Import - seed → SQLite + WAL");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load seed
    println!("\n📂 Loading records...");
    let records = seed_records(config)?;
    println!("✓ Loaded {} records", records.len());

    // 2. Setup record store
    println!("\n🔧 Setting up record store...");
    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(&config.database.path)?;
    setup_record_store(&conn)?;
    println!("✓ Record store ready at {}", config.database.path.display());

    // 3. Insert records
    println!("\n💾 Inserting records...");
    let inserted = insert_records(&conn, &records)?;

    // 4. Verify count
    println!("\n🔍 Verifying record store...");
    let count = count_records(&conn)?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Import complete");
    println!("✓ New records: {}", inserted);
    println!("✓ Already stored: {}", records.len() - inserted);
    println!("✓ Store contains {} records", count);

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_query(config: &AppConfig, command: &str, argument: &str) -> Result<()> {
    let reconciler = Reconciler::new(load_snapshot(config)?);

    match command {
        "zip" => print_json(&reconciler.search_by_zip(argument)?),
        "name" => print_json(&reconciler.search_by_name(argument)?),
        _ => print_json(&reconciler.lookup_profile(argument)?),
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig) -> Result<()> {
    println!("🖥️  Loading Ballot Tracker...\n");

    let snapshot = load_snapshot(config)?;
    println!(
        "✓ Loaded {} legislators, {} ZIP codes, {} records\n",
        snapshot.index.len(),
        snapshot.districts.len(),
        snapshot.linker.len()
    );
    println!("Starting UI... (Press Ctrl+C to quit)\n");

    // Create and run app
    let mut app = ui::App::new(Reconciler::new(snapshot));
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin ballot-server --features server");
    std::process::exit(1);
}
