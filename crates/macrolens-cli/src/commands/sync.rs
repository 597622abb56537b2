//! Sync command implementation

use anyhow::{Context, Result};
use macrolens_core::{Database, DateRange, SeriesSource, SyncReport, Syncer};

pub async fn cmd_sync(
    db: &Database,
    source: &dyn SeriesSource,
    code: i64,
    range: DateRange,
) -> Result<SyncReport> {
    println!("🔄 Syncing series {} from {}...", code, source.name());
    if let Some(start) = range.start {
        println!("   From: {}", start);
    }
    if let Some(end) = range.end {
        println!("   To: {}", end);
    }

    let report = Syncer::new(db, source)
        .sync_series(code, range)
        .await
        .with_context(|| format!("Failed to sync series {}", code))?;

    println!();
    println!("✅ {}", report.name);
    println!("   New observations: {}", report.inserted);
    println!("   Updated observations: {}", report.updated);
    println!("   Total cached: {}", report.total);

    Ok(report)
}
