//! Series operations

use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Series, SeriesSummary};

/// Row counts for status output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    pub series: i64,
    pub observations: i64,
}

const SERIES_COLUMNS: &str = "id, code, name, description, last_synced_at, created_at";

fn series_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Series> {
    let last_synced_str: Option<String> = row.get(4)?;
    let created_at_str: String = row.get(5)?;

    Ok(Series {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        last_synced_at: last_synced_str.as_deref().map(parse_datetime),
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Get a series by its upstream code
    pub fn get_series(&self, code: i64) -> Result<Option<Series>> {
        let conn = self.conn()?;
        let series = conn
            .query_row(
                &format!("SELECT {} FROM series WHERE code = ?", SERIES_COLUMNS),
                params![code],
                series_from_row,
            )
            .optional()?;

        Ok(series)
    }

    /// List all cached series ordered by code
    pub fn list_series(&self) -> Result<Vec<Series>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM series ORDER BY code",
            SERIES_COLUMNS
        ))?;

        let series = stmt
            .query_map([], series_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(series)
    }

    /// List cached series with their observation totals, ordered by code
    pub fn list_series_summaries(&self) -> Result<Vec<SeriesSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.code, s.name, s.description, s.last_synced_at, COUNT(o.id)
            FROM series s
            LEFT JOIN observations o ON o.series_id = s.id
            GROUP BY s.id
            ORDER BY s.code
            "#,
        )?;

        let summaries = stmt
            .query_map([], |row| {
                let last_synced_str: Option<String> = row.get(3)?;
                Ok(SeriesSummary {
                    code: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    last_synced_at: last_synced_str.as_deref().map(parse_datetime),
                    total_observations: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    /// Count series and observations
    pub fn series_stats(&self) -> Result<DatabaseStats> {
        let conn = self.conn()?;
        let series = conn.query_row("SELECT COUNT(*) FROM series", [], |row| row.get(0))?;
        let observations =
            conn.query_row("SELECT COUNT(*) FROM observations", [], |row| row.get(0))?;
        Ok(DatabaseStats {
            series,
            observations,
        })
    }
}
