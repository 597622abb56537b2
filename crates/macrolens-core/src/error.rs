//! Error types for macrolens

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream source error: {0}")]
    Upstream(String),
}

impl Error {
    /// True for failures talking to the upstream data source (transport or HTTP status)
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Upstream(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
