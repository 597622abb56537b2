//! Background task scheduler for automatic re-sync
//!
//! Enabled by `sync_interval_hours` in the settings file or the
//! `MACROLENS_SYNC_INTERVAL` environment variable (hours; 0 disables it).
//!
//! On every tick the scheduler re-fetches the full history of each cached
//! series. Failures are logged and the loop keeps running.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info, warn};

use macrolens_core::{Database, SeriesSource, Settings, Syncer};

/// Configuration for scheduled re-sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncScheduleConfig {
    /// Interval between runs in hours
    pub interval_hours: u64,
}

impl SyncScheduleConfig {
    /// Read the schedule from resolved settings
    ///
    /// Returns None if scheduling is not configured or set to 0
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        let interval_hours = settings.sync_interval_hours?;

        if interval_hours == 0 {
            warn!("sync_interval_hours is 0, automatic re-sync disabled");
            return None;
        }

        Some(Self { interval_hours })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours.saturating_mul(3600))
    }
}

/// Start the re-sync scheduler as a background task
///
/// This function spawns a tokio task that runs indefinitely, re-syncing
/// every cached series at the configured interval.
pub fn start_sync_scheduler(
    db: Database,
    source: Arc<dyn SeriesSource>,
    config: SyncScheduleConfig,
) -> tokio::task::JoinHandle<()> {
    info!(
        "Starting sync scheduler: every {} hours",
        config.interval_hours
    );

    tokio::spawn(async move {
        let mut ticker = interval(config.interval());

        // Skip the first immediate tick - no re-sync on startup
        ticker.tick().await;

        loop {
            ticker.tick().await;
            run_scheduled_sync(&db, source.as_ref()).await;
        }
    })
}

/// Run a single re-sync pass, returning how many series succeeded
pub async fn run_scheduled_sync(db: &Database, source: &dyn SeriesSource) -> usize {
    info!("Running scheduled re-sync...");

    let outcomes = match Syncer::new(db, source).sync_all().await {
        Ok(outcomes) => outcomes,
        Err(e) => {
            error!("Scheduled re-sync failed: {}", e);
            return 0;
        }
    };

    let total = outcomes.len();
    let succeeded = outcomes.iter().filter(|(_, r)| r.is_ok()).count();

    info!(
        "Scheduled re-sync completed: {}/{} series updated",
        succeeded, total
    );

    succeeded
}
