//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_settings` / `resolve_db_path` - Settings resolution for every command
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use macrolens_core::{Database, Settings};
use tracing::debug;

/// Load settings from the given file, the data-dir override or built-in defaults
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    Settings::load(config).context("Failed to load settings")
}

/// `--db` wins over the configured database path
pub fn resolve_db_path(cli_db: Option<&Path>, settings: &Settings) -> PathBuf {
    cli_db
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&settings.database_path))
}

/// Open (and migrate) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    debug!(path = path_str, "Opening database");
    Database::new(path_str).with_context(|| format!("Failed to open database {}", db_path.display()))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Browse suggested series: macrolens catalog");
    println!("  2. Fetch one: macrolens sync 432");
    println!("  3. Start the API: macrolens serve");

    Ok(())
}
