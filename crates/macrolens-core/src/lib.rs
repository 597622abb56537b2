//! Macrolens Core Library
//!
//! Shared functionality for the macrolens series service:
//! - Settings (embedded defaults, override file, environment)
//! - SQLite cache of series and observations
//! - Pluggable upstream sources (BCB SGS client)
//! - Fetch-then-upsert synchronization
//! - Insight engine (extremes, change, mean, moving averages)
//! - CSV/JSON export

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;
pub mod query;
pub mod source;
pub mod sync;

/// Test utilities including mock SGS server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{Settings, SourceSettings};
pub use db::{Database, DatabaseStats, UpsertCounts};
pub use error::{Error, Result};
pub use insights::{InsightResult, SeriesInsights};
pub use models::{
    CatalogEntry, DateRange, ExportFormat, Observation, Series, SeriesPage, SeriesSummary,
    SyncReport,
};
pub use query::MAX_RECENT_COUNT;
pub use source::{SeriesSource, SgsClient};
pub use sync::Syncer;
