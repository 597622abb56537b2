//! Macrolens Web Server
//!
//! Axum-based REST API over the local series cache.
//!
//! - Sync series from the upstream source on demand
//! - Paginated series detail and insights over cached data
//! - Configurable CORS policy (permissive when no origins are configured)
//! - Sanitized error responses
//! - Optional background re-sync of every cached series

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use macrolens_core::{Database, SeriesSource, Settings, SgsClient};

mod handlers;
mod scheduler;

pub use scheduler::{start_sync_scheduler, SyncScheduleConfig};

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    /// Upstream series provider used by sync
    pub source: Arc<dyn SeriesSource>,
}

/// Create the application router
pub fn create_router(
    db: Database,
    source: Arc<dyn SeriesSource>,
    settings: Settings,
    static_dir: Option<&str>,
) -> Router {
    let cors = cors_layer(&settings.cors_origins);

    let state = Arc::new(AppState {
        db,
        settings,
        source,
    });

    let mut app = Router::new()
        .route("/", get(handlers::health))
        .route("/series", get(handlers::list_series))
        .route("/series/catalog", get(handlers::list_catalog))
        .route("/series/:code", get(handlers::get_series))
        .route("/series/:code/sync", post(handlers::sync_series))
        .route("/series/:code/insights", get(handlers::get_series_insights))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// CORS policy: listed origins, or any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(origins)
    }
}

/// Start the server against the real SGS source
pub async fn serve(
    db: Database,
    settings: Settings,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    let source: Arc<dyn SeriesSource> = Arc::new(SgsClient::from_settings(&settings.source)?);
    serve_with_source(db, source, settings, host, port, static_dir).await
}

/// Start the server with an explicit upstream source
pub async fn serve_with_source(
    db: Database,
    source: Arc<dyn SeriesSource>,
    settings: Settings,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    if settings.cors_origins.is_empty() {
        info!("ℹ️  No CORS origins configured, allowing any origin");
    }

    // Start re-sync scheduler if configured
    if let Some(schedule) = SyncScheduleConfig::from_settings(&settings) {
        start_sync_scheduler(db.clone(), source.clone(), schedule);
    }

    let app = create_router(db, source, settings, static_dir);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_gateway(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error onto the matching HTTP status
    ///
    /// Anything that is not the caller's fault or the upstream's is a
    /// sanitized 500.
    pub fn from_core(err: macrolens_core::Error) -> Self {
        use macrolens_core::Error;

        match err {
            Error::NotFound(msg) => Self::not_found(&msg),
            Error::InvalidData(msg) => Self::bad_request(&msg),
            Error::Upstream(msg) => {
                error!(error = %msg, "Upstream source failed");
                Self::bad_gateway(&format!("Upstream data source error: {}", msg))
            }
            err if err.is_upstream() => {
                error!(error = %err, "Upstream source failed");
                Self::bad_gateway(&format!("Upstream data source error: {}", err))
            }
            err => Self::from(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
