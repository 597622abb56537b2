//! Insights over cached series
//!
//! - `engine` - Extremes, change, mean, moving averages and recent points
//! - `types` - Result types

mod engine;
mod types;

pub use engine::{
    compensated_sum, compute, moving_average, recent, round_to, DEFAULT_RECENT_COUNT, LONG_WINDOW,
    MAX_OUTPUT_POINTS, SHORT_WINDOW,
};
pub use types::{InsightResult, SeriesInsights};
