//! Domain models for macrolens

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single dated value within a series
///
/// Also the wire shape of every `{date, value}` point the API emits
/// (moving-average points, recent observations, paginated rows).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A series row in the local cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub id: i64,
    /// Upstream SGS code
    pub code: i64,
    pub name: String,
    pub description: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Series listing entry with cached observation count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub code: i64,
    pub name: String,
    pub description: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub total_observations: i64,
}

/// One page of a series' observations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPage {
    pub code: i64,
    pub name: String,
    pub page: i64,
    pub total_pages: i64,
    pub total_observations: i64,
    pub observations: Vec<Observation>,
}

/// Outcome of a sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub code: i64,
    pub name: String,
    pub inserted: usize,
    pub updated: usize,
    /// Observations stored for the series after the sync
    pub total: i64,
    pub message: String,
}

/// Entry in the static catalog of suggested series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub code: i64,
    pub name: &'static str,
}

/// Inclusive date bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Whole history
    pub fn all() -> Self {
        Self::default()
    }

    /// A range whose start lies after its end can never match anything
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
