//! Upstream time-series sources
//!
//! `SeriesSource` is the seam between sync and the outside world. The
//! production implementation is [`SgsClient`] (Banco Central do Brasil
//! SGS/BCData); tests plug in their own.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{DateRange, Observation};

mod catalog;
mod sgs;

pub use catalog::{series_name, CATALOG};
pub use sgs::{format_sgs_date, parse_records, parse_sgs_date, SgsClient, SgsRecord};

/// A provider of dated numeric observations
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Fetch observations for `code` within `range`
    ///
    /// Records without a numeric value are dropped. An empty vector means the
    /// source has no data for the request; an unknown series is
    /// `Error::NotFound`; transport and status failures are upstream errors.
    async fn fetch(&self, code: i64, range: DateRange) -> Result<Vec<Observation>>;
}
