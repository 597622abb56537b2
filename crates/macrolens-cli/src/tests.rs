//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::Path;

use chrono::NaiveDate;
use clap::Parser;
use macrolens_core::db::Database;
use macrolens_core::models::{DateRange, ExportFormat, Observation};
use macrolens_core::test_utils::StaticSource;
use macrolens_core::Settings;

use crate::cli::{Cli, Commands};
use crate::commands::{self, truncate};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn test_source() -> StaticSource {
    let values = [10.0, 12.0, 11.0, 15.0, 13.0];
    StaticSource::new().with_series(
        432,
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation::new(d(2024, 1, 1 + i as u32), *v))
            .collect(),
    )
}

/// Database with series 432 synced from the test source
async fn setup_synced_db() -> Database {
    let db = Database::in_memory().unwrap();
    commands::cmd_sync(&db, &test_source(), 432, DateRange::all())
        .await
        .unwrap();
    db
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_sync_args() {
    let cli = Cli::try_parse_from([
        "macrolens", "sync", "432", "--from", "2024-01-01", "--to", "2024-06-30",
    ])
    .unwrap();

    match cli.command {
        Commands::Sync { code, from, to } => {
            assert_eq!(code, 432);
            assert_eq!(from, Some(d(2024, 1, 1)));
            assert_eq!(to, Some(d(2024, 6, 30)));
        }
        _ => panic!("expected sync command"),
    }
}

#[test]
fn test_parse_rejects_bad_date() {
    assert!(Cli::try_parse_from(["macrolens", "sync", "432", "--from", "01/01/2024"]).is_err());
}

#[test]
fn test_parse_global_flags() {
    let cli = Cli::try_parse_from(["macrolens", "series", "--db", "/tmp/x.db", "-v"]).unwrap();
    assert_eq!(cli.db.as_deref(), Some(Path::new("/tmp/x.db")));
    assert!(cli.verbose);
    assert!(cli.config.is_none());
}

#[test]
fn test_parse_export_format() {
    let cli = Cli::try_parse_from(["macrolens", "export", "432", "--format", "json"]).unwrap();
    match cli.command {
        Commands::Export { format, output, .. } => {
            assert_eq!(format, ExportFormat::Json);
            assert!(output.is_none());
        }
        _ => panic!("expected export command"),
    }

    assert!(Cli::try_parse_from(["macrolens", "export", "432", "--format", "xml"]).is_err());
}

#[test]
fn test_parse_insights_defaults() {
    let cli = Cli::try_parse_from(["macrolens", "insights", "432"]).unwrap();
    match cli.command {
        Commands::Insights { recent, json, .. } => {
            assert_eq!(recent, 10);
            assert!(!json);
        }
        _ => panic!("expected insights command"),
    }
}

// ========== Core Command Tests ==========

#[test]
fn test_resolve_db_path() {
    let settings = Settings::default();
    assert_eq!(
        commands::resolve_db_path(None, &settings),
        Path::new("macrolens.db")
    );
    assert_eq!(
        commands::resolve_db_path(Some(Path::new("/tmp/other.db")), &settings),
        Path::new("/tmp/other.db")
    );
}

#[test]
fn test_cmd_init() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("init.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    // Idempotent
    commands::cmd_init(&path).unwrap();
}

#[test]
fn test_load_settings_missing_file() {
    let result = commands::load_settings(Some(Path::new("/nonexistent/macrolens.toml")));
    assert!(result.is_err());
}

#[test]
fn test_cmd_catalog() {
    assert!(commands::cmd_catalog().is_ok());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("IPCA – variação mensal", 10), "IPCA – ...");
}

// ========== Sync Command Tests ==========

#[tokio::test]
async fn test_cmd_sync() {
    let db = Database::in_memory().unwrap();
    let report = commands::cmd_sync(&db, &test_source(), 432, DateRange::all())
        .await
        .unwrap();

    assert_eq!(report.inserted, 5);
    assert_eq!(db.series_stats().unwrap().observations, 5);
}

#[tokio::test]
async fn test_cmd_sync_unknown_series() {
    let db = Database::in_memory().unwrap();
    let result = commands::cmd_sync(&db, &test_source(), 1, DateRange::all()).await;
    assert!(result.is_err());
}

// ========== Series Command Tests ==========

#[test]
fn test_cmd_series_list_empty() {
    let db = Database::in_memory().unwrap();
    assert!(commands::cmd_series_list(&db).is_ok());
}

#[tokio::test]
async fn test_cmd_series_list() {
    let db = setup_synced_db().await;
    assert!(commands::cmd_series_list(&db).is_ok());
}

#[tokio::test]
async fn test_cmd_show() {
    let db = setup_synced_db().await;
    let page = commands::cmd_show(&db, 432, DateRange::all(), 2, 2).unwrap();
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.observations.len(), 2);
}

#[tokio::test]
async fn test_cmd_show_invalid_page() {
    let db = setup_synced_db().await;
    assert!(commands::cmd_show(&db, 432, DateRange::all(), 0, 2).is_err());
}

// ========== Insights Command Tests ==========

#[tokio::test]
async fn test_cmd_insights() {
    let db = setup_synced_db().await;
    let result = commands::cmd_insights(&db, 432, DateRange::all(), 3, false).unwrap();

    assert_eq!(result.insights.count, 5);
    assert_eq!(result.insights.mean, Some(12.2));
    assert_eq!(result.insights.recent_observations.len(), 3);
}

#[tokio::test]
async fn test_cmd_insights_json() {
    let db = setup_synced_db().await;
    assert!(commands::cmd_insights(&db, 432, DateRange::all(), 10, true).is_ok());
}

#[test]
fn test_cmd_insights_not_cached() {
    let db = Database::in_memory().unwrap();
    assert!(commands::cmd_insights(&db, 432, DateRange::all(), 10, false).is_err());
}

// ========== Export Command Tests ==========

#[tokio::test]
async fn test_cmd_export_csv_file() {
    let db = setup_synced_db().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selic.csv");

    let range = DateRange::new(Some(d(2024, 1, 4)), None);
    commands::cmd_export(&db, 432, range, ExportFormat::Csv, Some(&path)).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "date,value\n2024-01-04,15\n2024-01-05,13\n");
}

#[tokio::test]
async fn test_cmd_export_json_file() {
    let db = setup_synced_db().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selic.json");

    commands::cmd_export(&db, 432, DateRange::all(), ExportFormat::Json, Some(&path)).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: Vec<Observation> = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.len(), 5);
}

#[test]
fn test_cmd_export_unknown_series() {
    let db = Database::in_memory().unwrap();
    assert!(commands::cmd_export(&db, 432, DateRange::all(), ExportFormat::Csv, None).is_err());
}

// ========== Status Command Tests ==========

#[tokio::test]
async fn test_cmd_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.db");
    let db = commands::open_db(&path).unwrap();
    commands::cmd_sync(&db, &test_source(), 432, DateRange::all())
        .await
        .unwrap();

    assert!(commands::cmd_status(&path, &Settings::default()).is_ok());
}

#[test]
fn test_cmd_status_missing_db() {
    let path = Path::new("/nonexistent/macrolens.db");
    assert!(commands::cmd_status(path, &Settings::default()).is_ok());
}
