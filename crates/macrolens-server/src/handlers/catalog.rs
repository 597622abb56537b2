//! Series catalog handler

use axum::Json;

use macrolens_core::source::CATALOG;
use macrolens_core::CatalogEntry;

/// GET /series/catalog - Suggested SGS series codes with friendly names
pub async fn list_catalog() -> Json<&'static [CatalogEntry]> {
    Json(&CATALOG)
}
