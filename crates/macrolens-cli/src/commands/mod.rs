//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (settings, open_db) and init
//! - `catalog` - Suggested series codes
//! - `export` - CSV/JSON export of cached observations
//! - `insights` - Insight report over a cached series
//! - `series` - Cached series listing and paginated detail
//! - `serve` - Web server command
//! - `status` - Database and settings status
//! - `sync` - Fetch a series from SGS into the cache

pub mod catalog;
pub mod core;
pub mod export;
pub mod insights;
pub mod series;
pub mod serve;
pub mod status;
pub mod sync;

// Re-export command functions for main.rs
pub use catalog::*;
pub use core::*;
pub use export::*;
pub use insights::*;
pub use series::*;
pub use serve::*;
pub use status::*;
pub use sync::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
