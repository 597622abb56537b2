//! BCB SGS (BCData) HTTP client
//!
//! `GET {base_url}.{code}/dados?formato=json[&dataInicial=dd/mm/yyyy][&dataFinal=dd/mm/yyyy]`
//! returns `[{"data": "dd/mm/yyyy", "valor": "1.23"}, ...]`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::SourceSettings;
use crate::error::{Error, Result};
use crate::models::{DateRange, Observation};

use super::SeriesSource;

/// Date format used by SGS in both requests and responses
const SGS_DATE_FORMAT: &str = "%d/%m/%Y";

/// One raw SGS record
#[derive(Debug, Clone, Deserialize)]
pub struct SgsRecord {
    pub data: String,
    /// Usually a decimal string; may be empty, null or missing
    #[serde(default)]
    pub valor: serde_json::Value,
}

/// HTTP client for the SGS API
#[derive(Clone)]
pub struct SgsClient {
    http_client: Client,
    base_url: String,
}

impl SgsClient {
    /// Create a client with a request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &SourceSettings) -> Result<Self> {
        Self::new(&settings.base_url, settings.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn series_url(&self, code: i64) -> String {
        format!("{}.{}/dados", self.base_url, code)
    }
}

#[async_trait]
impl SeriesSource for SgsClient {
    fn name(&self) -> &'static str {
        "bcb-sgs"
    }

    async fn fetch(&self, code: i64, range: DateRange) -> Result<Vec<Observation>> {
        let url = self.series_url(code);

        let mut params = vec![("formato", "json".to_string())];
        if let Some(start) = range.start {
            params.push(("dataInicial", format_sgs_date(start)));
        }
        if let Some(end) = range.end {
            params.push(("dataFinal", format_sgs_date(end)));
        }

        info!(code, url = %url, ?params, "SGS request");

        let response = self.http_client.get(&url).query(&params).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(Error::NotFound(format!("Series {} not found upstream", code)));
            }
            status if !status.is_success() => {
                return Err(Error::Upstream(format!(
                    "SGS returned HTTP {} for series {}",
                    status, code
                )));
            }
            _ => {}
        }

        let records: Vec<SgsRecord> = response.json().await?;
        info!(code, count = records.len(), "SGS returned records");

        // Malformed records are an upstream failure
        let observations = parse_records(records).map_err(|e| {
            Error::Upstream(format!("Malformed SGS payload for series {}: {}", code, e))
        })?;
        debug!(code, kept = observations.len(), "Parsed SGS records");
        Ok(observations)
    }
}

/// Convert raw records, dropping those without a finite numeric value
pub fn parse_records(records: Vec<SgsRecord>) -> Result<Vec<Observation>> {
    let mut observations = Vec::with_capacity(records.len());

    for record in records {
        let Some(value) = parse_value(&record.valor) else {
            continue;
        };
        observations.push(Observation::new(parse_sgs_date(&record.data)?, value));
    }

    Ok(observations)
}

/// Parse an SGS `dd/mm/yyyy` date
pub fn parse_sgs_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), SGS_DATE_FORMAT)
        .map_err(|e| Error::InvalidData(format!("Invalid SGS date '{}': {}", raw, e)))
}

/// Format a date for SGS query parameters
pub fn format_sgs_date(date: NaiveDate) -> String {
    date.format(SGS_DATE_FORMAT).to_string()
}

fn parse_value(raw: &serde_json::Value) -> Option<f64> {
    let value = match raw {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        serde_json::Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}
