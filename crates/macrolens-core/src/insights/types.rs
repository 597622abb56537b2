//! Insight result types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Observation;

/// Descriptive metrics computed over one observation window
///
/// Every `Option` serializes as `null` when the metric is not computable
/// (empty window, or a zero first value for `percent_change`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightResult {
    pub count: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    // Extremes
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,

    // Change over the window
    pub absolute_change: Option<f64>,
    pub percent_change: Option<f64>,

    // Averages
    pub mean: Option<f64>,
    pub moving_average_7: Vec<Observation>,
    pub moving_average_30: Vec<Observation>,

    pub recent_observations: Vec<Observation>,
}

impl InsightResult {
    /// Result for a window with no observations
    pub fn empty() -> Self {
        Self {
            count: 0,
            start_date: None,
            end_date: None,
            min_value: None,
            max_value: None,
            min_date: None,
            max_date: None,
            absolute_change: None,
            percent_change: None,
            mean: None,
            moving_average_7: vec![],
            moving_average_30: vec![],
            recent_observations: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Insights for a named series, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesInsights {
    pub code: i64,
    pub name: String,
    #[serde(flatten)]
    pub insights: InsightResult,
}
