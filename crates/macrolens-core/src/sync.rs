//! Fetch-then-store synchronization of cached series
//!
//! The upstream fetch completes before the write transaction opens, so a slow
//! or failing source never holds a database lock and never leaves a
//! half-written series behind.

use tracing::{info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{DateRange, SyncReport};
use crate::source::{series_name, SeriesSource};

/// Syncs series from an upstream source into the local cache
pub struct Syncer<'a> {
    db: &'a Database,
    source: &'a dyn SeriesSource,
}

impl<'a> Syncer<'a> {
    pub fn new(db: &'a Database, source: &'a dyn SeriesSource) -> Self {
        Self { db, source }
    }

    /// Fetch `code` within `range` and upsert the result
    ///
    /// An empty fetch is `Error::NotFound` and leaves the cache untouched.
    pub async fn sync_series(&self, code: i64, range: DateRange) -> Result<SyncReport> {
        if range.is_inverted() {
            return Err(Error::InvalidData(
                "start_date must not be after end_date".into(),
            ));
        }

        let observations = self.source.fetch(code, range).await?;
        if observations.is_empty() {
            return Err(Error::NotFound(format!(
                "No data returned for series {}",
                code
            )));
        }

        // Keep the name of an already-cached series
        let name = match self.db.get_series(code)? {
            Some(series) => series.name,
            None => series_name(code),
        };

        let counts = self.db.upsert_observations(code, &name, &observations)?;
        let total = self.db.count_observations(counts.series_id, DateRange::all())?;

        info!(
            code,
            source = self.source.name(),
            inserted = counts.inserted,
            updated = counts.updated,
            total,
            "Series synced"
        );

        Ok(SyncReport {
            code,
            name,
            inserted: counts.inserted,
            updated: counts.updated,
            total,
            message: format!(
                "Sync complete: {} new, {} updated.",
                counts.inserted, counts.updated
            ),
        })
    }

    /// Re-sync the full history of every cached series
    ///
    /// One failing series does not stop the rest; each outcome is returned.
    pub async fn sync_all(&self) -> Result<Vec<(i64, Result<SyncReport>)>> {
        let codes: Vec<i64> = self.db.list_series()?.iter().map(|s| s.code).collect();
        let mut outcomes = Vec::with_capacity(codes.len());

        for code in codes {
            let outcome = self.sync_series(code, DateRange::all()).await;
            if let Err(e) = &outcome {
                warn!(code, error = %e, "Series re-sync failed");
            }
            outcomes.push((code, outcome));
        }

        Ok(outcomes)
    }
}
