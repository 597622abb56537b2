//! Status command implementation

use std::fs;
use std::path::Path;

use anyhow::Result;
use macrolens_core::config::default_config_path;
use macrolens_core::Settings;

use super::open_db;

pub fn cmd_status(db_path: &Path, settings: &Settings) -> Result<()> {
    println!();
    println!("📊 Macrolens Status");
    println!("   ─────────────────────────────────────────────────────────────");

    // Database path
    println!("   Database: {}", db_path.display());

    // Check if database file exists and get size
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    // Settings
    if let Some(path) = default_config_path() {
        let marker = if path.exists() { "" } else { " (not present)" };
        println!("   Settings override: {}{}", path.display(), marker);
    }
    println!("   Upstream: {}", settings.source.base_url);
    println!("   Timeout: {}s", settings.source.timeout_secs);
    println!("   Page size: {}", settings.page_size);

    // Try to open the database and show stats
    if db_path.exists() {
        match open_db(db_path).and_then(|db| Ok(db.series_stats()?)) {
            Ok(stats) => {
                println!();
                println!("   Series: {}", stats.series);
                println!("   Observations: {}", stats.observations);
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
            }
        }
    }

    println!();
    Ok(())
}
