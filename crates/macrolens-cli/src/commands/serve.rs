//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use macrolens_core::Settings;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    settings: Settings,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting {}...", settings.app_name);
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Upstream: {}", settings.source.base_url);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if settings.cors_origins.is_empty() {
        println!("   🌐 CORS: any origin");
    } else {
        println!("   🌐 CORS: {}", settings.cors_origins.join(", "));
    }
    match settings.sync_interval_hours {
        Some(hours) if hours > 0 => println!("   ⏰ Auto re-sync: every {} hours", hours),
        _ => println!("   ⏰ Auto re-sync: disabled"),
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    macrolens_server::serve(db, settings, host, port, static_dir_str).await?;

    Ok(())
}
