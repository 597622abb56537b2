//! Series command implementations (list, show)

use anyhow::{Context, Result};
use macrolens_core::{Database, DateRange, SeriesPage};

use super::truncate;

pub fn cmd_series_list(db: &Database) -> Result<()> {
    let series = db.list_series_summaries()?;

    if series.is_empty() {
        println!("No series cached yet. Fetch one with:");
        println!("  macrolens sync 432");
        return Ok(());
    }

    println!();
    println!("📈 Cached Series");
    println!("   ─────────────────────────────────────────────────────────────");

    for s in series {
        let synced = s
            .last_synced_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "   {:>6} │ {:<40} │ {:>6} obs │ synced {}",
            s.code,
            truncate(&s.name, 40),
            s.total_observations,
            synced
        );
    }

    Ok(())
}

pub fn cmd_show(
    db: &Database,
    code: i64,
    range: DateRange,
    page: i64,
    page_size: i64,
) -> Result<SeriesPage> {
    let result = db
        .series_page(code, range, page, page_size)
        .with_context(|| format!("Failed to load series {}", code))?;

    println!();
    println!("📈 {} ({})", result.name, result.code);
    println!(
        "   Page {} of {} │ {} observations",
        result.page, result.total_pages, result.total_observations
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if result.observations.is_empty() {
        println!("   (no observations on this page)");
    }
    for obs in &result.observations {
        println!("   {} │ {:>14}", obs.date, obs.value);
    }

    Ok(result)
}
