//! Series handlers: listing, detail, sync and insights

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use macrolens_core::insights::DEFAULT_RECENT_COUNT;
use macrolens_core::{DateRange, SeriesInsights, SeriesPage, SeriesSummary, SyncReport, Syncer};

/// Optional body for a sync request
#[derive(Debug, Default, Deserialize)]
pub struct SyncRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for series detail
#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    /// Falls back to the configured page size
    pub page_size: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn default_page() -> i64 {
    1
}

/// Query parameters for insights
#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
}

fn default_recent_count() -> usize {
    DEFAULT_RECENT_COUNT
}

/// GET /series - Cached series with observation totals, ordered by code
pub async fn list_series(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SeriesSummary>>, AppError> {
    let summaries = state.db.list_series_summaries()?;
    Ok(Json(summaries))
}

/// GET /series/:code - One page of cached observations
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(code): Path<i64>,
    Query(params): Query<SeriesQuery>,
) -> Result<Json<SeriesPage>, AppError> {
    let range = DateRange::new(params.start_date, params.end_date);
    let page_size = params.page_size.unwrap_or(state.settings.page_size);

    let page = state
        .db
        .series_page(code, range, params.page, page_size)
        .map_err(AppError::from_core)?;

    Ok(Json(page))
}

/// POST /series/:code/sync - Fetch from upstream and upsert into the cache
///
/// The body is optional; without it the full history is requested. A body
/// that is present but malformed is rejected.
pub async fn sync_series(
    State(state): State<Arc<AppState>>,
    Path(code): Path<i64>,
    body: Bytes,
) -> Result<Json<SyncReport>, AppError> {
    let request = parse_sync_request(&body)?;
    let range = DateRange::new(request.start_date, request.end_date);

    info!(code, ?range, "Sync requested");

    let report = Syncer::new(&state.db, state.source.as_ref())
        .sync_series(code, range)
        .await
        .map_err(AppError::from_core)?;

    Ok(Json(report))
}

fn parse_sync_request(body: &[u8]) -> Result<SyncRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SyncRequest::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request(&format!("Invalid sync request body: {}", e)))
}

/// GET /series/:code/insights - Descriptive metrics over cached observations
pub async fn get_series_insights(
    State(state): State<Arc<AppState>>,
    Path(code): Path<i64>,
    Query(params): Query<InsightsQuery>,
) -> Result<Json<SeriesInsights>, AppError> {
    let range = DateRange::new(params.start_date, params.end_date);

    let insights = state
        .db
        .series_insights(code, range, params.recent_count)
        .map_err(AppError::from_core)?;

    Ok(Json(insights))
}
