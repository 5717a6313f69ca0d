// ⚙️ Configuration - where the reference tables and record store live
//
// TOML, every field defaulted. Lookup order:
//   1. $BALLOT_CONFIG
//   2. ./ballot.toml
// A missing file means defaults; a malformed file is an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_ENV: &str = "BALLOT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "ballot.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub roster: PathBuf,
    pub zip_districts: PathBuf,
    /// JSON record seed; the built-in seed is used when unset
    pub records: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            roster: PathBuf::from("data/legislators_current.csv"),
            zip_districts: PathBuf::from("data/zip_districts.csv"),
            records: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from("data/records.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    pub fn parse(text: &str) -> Result<AppConfig> {
        toml::from_str(text).context("Failed to parse configuration")
    }

    pub fn load_from(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(AppConfig::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = AppConfig::parse(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Resolve the config path from the environment, then load it
    pub fn load() -> Result<AppConfig> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        AppConfig::load_from(&path)
    }
}
