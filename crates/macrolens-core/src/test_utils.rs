//! Test utilities for macrolens-core
//!
//! This module provides testing infrastructure including a mock SGS server
//! that speaks the BCData wire format, and an in-process `SeriesSource`
//! double for tests that do not need HTTP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::models::{DateRange, Observation};
use crate::source::{format_sgs_date, parse_sgs_date, SeriesSource};

/// Canned answer for one series code
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with these SGS records (filtered by the request's date bounds)
    Records(Value),
    /// Bare HTTP status with an empty body
    Status(u16),
}

/// A request the mock server received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub code: i64,
    pub params: HashMap<String, String>,
}

#[derive(Default)]
struct MockState {
    responses: Mutex<HashMap<i64, MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock BCB SGS server for testing and development
///
/// Codes without a configured response answer 404, like the real API.
pub struct MockSgsServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockSgsServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/:series/dados", get(handle_dados))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL to configure an `SgsClient` with
    pub fn base_url(&self) -> String {
        format!("http://{}/bcdata.sgs", self.addr)
    }

    /// Serve `records` (an SGS JSON array) for `code`
    pub fn set_records(&self, code: i64, records: Value) {
        self.set_response(code, MockResponse::Records(records));
    }

    /// Answer requests for `code` with a bare status
    pub fn set_status(&self, code: i64, status: u16) {
        self.set_response(code, MockResponse::Status(status));
    }

    pub fn set_response(&self, code: i64, response: MockResponse) {
        self.state.responses.lock().unwrap().insert(code, response);
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockSgsServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// `GET /bcdata.sgs.{code}/dados`
async fn handle_dados(
    State(state): State<Arc<MockState>>,
    Path(series): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(code) = series
        .rsplit('.')
        .next()
        .and_then(|c| c.parse::<i64>().ok())
    else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        code,
        params: params.clone(),
    });

    let response = state.responses.lock().unwrap().get(&code).cloned();
    match response {
        Some(MockResponse::Records(records)) => {
            let range = DateRange::new(
                params.get("dataInicial").and_then(|d| parse_sgs_date(d).ok()),
                params.get("dataFinal").and_then(|d| parse_sgs_date(d).ok()),
            );
            Json(filter_records(records, range)).into_response()
        }
        Some(MockResponse::Status(status)) => StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Keep records whose `data` falls in `range`; unparseable dates pass through
fn filter_records(records: Value, range: DateRange) -> Value {
    match records {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|item| {
                    item.get("data")
                        .and_then(Value::as_str)
                        .and_then(|d| parse_sgs_date(d).ok())
                        .map_or(true, |d| range.contains(d))
                })
                .collect(),
        ),
        other => other,
    }
}

/// Build an SGS JSON array from `(date, valor)` pairs
pub fn sgs_records(points: &[(NaiveDate, &str)]) -> Value {
    Value::Array(
        points
            .iter()
            .map(|(date, valor)| json!({"data": format_sgs_date(*date), "valor": valor}))
            .collect(),
    )
}

/// Consecutive daily SGS records starting at `start`
pub fn daily_sgs_records(start: NaiveDate, values: &[f64]) -> Value {
    Value::Array(
        values
            .iter()
            .zip(start.iter_days())
            .map(|(v, date)| json!({"data": format_sgs_date(date), "valor": v.to_string()}))
            .collect(),
    )
}

/// In-process `SeriesSource` serving fixed observations
///
/// Unknown codes are `Error::NotFound`; a failing source returns an upstream
/// error for every request.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    series: HashMap<i64, Vec<Observation>>,
    fail: bool,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, code: i64, observations: Vec<Observation>) -> Self {
        self.series.insert(code, observations);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl SeriesSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self, code: i64, range: DateRange) -> Result<Vec<Observation>> {
        if self.fail {
            return Err(Error::Upstream("static source configured to fail".into()));
        }
        let observations = self
            .series
            .get(&code)
            .ok_or_else(|| Error::NotFound(format!("Series {} not found upstream", code)))?;
        Ok(observations
            .iter()
            .copied()
            .filter(|o| range.contains(o.date))
            .collect())
    }
}
