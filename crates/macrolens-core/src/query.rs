//! Read-side views over cached series: paginated detail and insights

use tracing::debug;

use crate::config::MAX_PAGE_SIZE;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::insights::{self, SeriesInsights};
use crate::models::{DateRange, Series, SeriesPage};

/// Largest `recent_count` accepted for insights
pub const MAX_RECENT_COUNT: usize = 100;

impl Database {
    fn require_series(&self, code: i64) -> Result<Series> {
        self.get_series(code)?
            .ok_or_else(|| Error::NotFound(format!("Series {} not found", code)))
    }

    /// One page of cached observations for `code`, ascending by date
    ///
    /// `page` is 1-based. Pages past the end are empty but carry the totals.
    pub fn series_page(
        &self,
        code: i64,
        range: DateRange,
        page: i64,
        page_size: i64,
    ) -> Result<SeriesPage> {
        if page < 1 {
            return Err(Error::InvalidData(format!(
                "page must be at least 1, got {}",
                page
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(Error::InvalidData(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }

        let series = self.require_series(code)?;
        let total = self.count_observations(series.id, range)?;
        let total_pages = ((total + page_size - 1) / page_size).max(1);
        let offset = (page - 1).saturating_mul(page_size);

        let observations = self.get_observations_page(series.id, range, page_size, offset)?;

        Ok(SeriesPage {
            code,
            name: series.name,
            page,
            total_pages,
            total_observations: total,
            observations,
        })
    }

    /// Insights for the cached observations of `code` within `range`
    ///
    /// A series with nothing cached, or a window that matches nothing, is
    /// `Error::NotFound`.
    pub fn series_insights(
        &self,
        code: i64,
        range: DateRange,
        recent_count: usize,
    ) -> Result<SeriesInsights> {
        if !(1..=MAX_RECENT_COUNT).contains(&recent_count) {
            return Err(Error::InvalidData(format!(
                "recent_count must be between 1 and {}, got {}",
                MAX_RECENT_COUNT, recent_count
            )));
        }

        let series = self.require_series(code)?;
        if self.count_observations(series.id, DateRange::all())? == 0 {
            return Err(Error::NotFound(format!(
                "Series {} has no cached observations",
                code
            )));
        }

        let observations = self.get_observations(series.id, range)?;
        if observations.is_empty() {
            return Err(Error::NotFound(format!(
                "No observations for series {} in the requested period",
                code
            )));
        }

        debug!(code, count = observations.len(), "Computing insights");

        Ok(SeriesInsights {
            code,
            name: series.name,
            insights: insights::compute(&observations, recent_count),
        })
    }
}
