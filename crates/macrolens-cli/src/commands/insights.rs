//! Insights command implementation

use anyhow::{Context, Result};
use macrolens_core::{Database, DateRange, SeriesInsights};

/// Render an optional number, `-` when absent
fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn cmd_insights(
    db: &Database,
    code: i64,
    range: DateRange,
    recent: usize,
    json: bool,
) -> Result<SeriesInsights> {
    let result = db
        .series_insights(code, range, recent)
        .with_context(|| format!("Failed to compute insights for series {}", code))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(result);
    }

    let insights = &result.insights;

    println!();
    println!("🔎 {} ({})", result.name, result.code);
    println!("   ─────────────────────────────────────────────────────────────");
    if let (Some(start), Some(end)) = (insights.start_date, insights.end_date) {
        println!("   Period: {} → {} ({} observations)", start, end, insights.count);
    }
    if let (Some(min), Some(date)) = (insights.min_value, insights.min_date) {
        println!("   📉 Min: {} on {}", min, date);
    }
    if let (Some(max), Some(date)) = (insights.max_value, insights.max_date) {
        println!("   📈 Max: {} on {}", max, date);
    }
    println!("   Mean: {}", fmt_opt(insights.mean));
    println!(
        "   Change: {} ({}%)",
        fmt_opt(insights.absolute_change),
        fmt_opt(insights.percent_change)
    );

    for (label, points) in [
        ("7-point moving average", &insights.moving_average_7),
        ("30-point moving average", &insights.moving_average_30),
    ] {
        match points.last() {
            Some(last) => println!("   {}: {} (as of {})", label, last.value, last.date),
            None => println!("   {}: not enough data", label),
        }
    }

    println!();
    println!("   Recent observations:");
    for obs in &insights.recent_observations {
        println!("   {} │ {:>14}", obs.date, obs.value);
    }

    Ok(result)
}
