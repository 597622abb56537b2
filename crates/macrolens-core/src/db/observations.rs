//! Observation operations
//!
//! Observations are keyed by (series, date). A sync writes the whole batch in
//! one transaction: new dates are inserted, changed values updated, and
//! unchanged values left alone.

use rusqlite::{params, OptionalExtension};
use serde::Serialize;
use tracing::debug;

use super::{date_column, Database};
use crate::error::Result;
use crate::models::{DateRange, Observation};

/// What a sync batch did to the stored observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertCounts {
    /// Series row id the batch was written to
    pub series_id: i64,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Bounds as bind parameters (`NULL` = open)
fn range_params(range: DateRange) -> (Option<String>, Option<String>) {
    (
        range.start.map(|d| d.to_string()),
        range.end.map(|d| d.to_string()),
    )
}

const RANGE_FILTER: &str =
    "series_id = ?1 AND (?2 IS NULL OR date >= ?2) AND (?3 IS NULL OR date <= ?3)";

impl Database {
    /// Store a fetched batch for `code`, creating the series row if needed
    ///
    /// Runs as a single transaction: either every observation and the
    /// `last_synced_at` stamp are committed, or nothing is.
    pub fn upsert_observations(
        &self,
        code: i64,
        name: &str,
        observations: &[Observation],
    ) -> Result<UpsertCounts> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM series WHERE code = ?",
                params![code],
                |row| row.get(0),
            )
            .optional()?;

        let series_id = match existing {
            Some(id) => id,
            None => {
                tx.execute(
                    "INSERT INTO series (code, name) VALUES (?, ?)",
                    params![code, name],
                )?;
                tx.last_insert_rowid()
            }
        };

        let mut counts = UpsertCounts {
            series_id,
            ..Default::default()
        };

        {
            let mut find = tx.prepare_cached(
                "SELECT id, value FROM observations WHERE series_id = ? AND date = ?",
            )?;
            let mut insert = tx.prepare_cached(
                "INSERT INTO observations (series_id, date, value) VALUES (?, ?, ?)",
            )?;
            let mut update = tx.prepare_cached("UPDATE observations SET value = ? WHERE id = ?")?;

            for obs in observations {
                let date = obs.date.to_string();
                let stored: Option<(i64, f64)> = find
                    .query_row(params![series_id, date], |row| {
                        Ok((row.get(0)?, row.get(1)?))
                    })
                    .optional()?;

                match stored {
                    Some((id, value)) if value != obs.value => {
                        update.execute(params![obs.value, id])?;
                        counts.updated += 1;
                    }
                    Some(_) => counts.unchanged += 1,
                    None => {
                        insert.execute(params![series_id, date, obs.value])?;
                        counts.inserted += 1;
                    }
                }
            }
        }

        tx.execute(
            "UPDATE series SET last_synced_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![series_id],
        )?;
        tx.commit()?;

        debug!(
            code,
            inserted = counts.inserted,
            updated = counts.updated,
            unchanged = counts.unchanged,
            "Stored observations"
        );

        Ok(counts)
    }

    /// Count observations for a series within `range`
    pub fn count_observations(&self, series_id: i64, range: DateRange) -> Result<i64> {
        let conn = self.conn()?;
        let (start, end) = range_params(range);
        let count = conn.query_row(
            &format!("SELECT COUNT(*) FROM observations WHERE {}", RANGE_FILTER),
            params![series_id, start, end],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// All observations for a series within `range`, ascending by date
    pub fn get_observations(&self, series_id: i64, range: DateRange) -> Result<Vec<Observation>> {
        let conn = self.conn()?;
        let (start, end) = range_params(range);
        let mut stmt = conn.prepare(&format!(
            "SELECT date, value FROM observations WHERE {} ORDER BY date",
            RANGE_FILTER
        ))?;

        let observations = stmt
            .query_map(params![series_id, start, end], |row| {
                Ok(Observation::new(date_column(row, 0)?, row.get(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(observations)
    }

    /// One page of observations for a series within `range`, ascending by date
    pub fn get_observations_page(
        &self,
        series_id: i64,
        range: DateRange,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Observation>> {
        let conn = self.conn()?;
        let (start, end) = range_params(range);
        let mut stmt = conn.prepare(&format!(
            "SELECT date, value FROM observations WHERE {} ORDER BY date LIMIT ?4 OFFSET ?5",
            RANGE_FILTER
        ))?;

        let observations = stmt
            .query_map(params![series_id, start, end, limit, offset], |row| {
                Ok(Observation::new(date_column(row, 0)?, row.get(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(observations)
    }
}
