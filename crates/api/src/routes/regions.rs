//! Route definitions for the region cache.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::regions;
use crate::state::AppState;

/// Province routes mounted at `/regions`.
///
/// ```text
/// GET    /                    -> list_regions
/// POST   /reload              -> reload_regions
/// GET    /search              -> search_regions
/// GET    /stats               -> region_stats
/// GET    /{id}/sub-regions    -> list_sub_regions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(regions::list_regions))
        .route("/reload", post(regions::reload_regions))
        .route("/search", get(regions::search_regions))
        .route("/stats", get(regions::region_stats))
        .route("/{id}/sub-regions", get(regions::list_sub_regions))
}

/// City/regency routes mounted at `/sub-regions`.
pub fn sub_region_router() -> Router<AppState> {
    Router::new().route("/search", get(regions::search_sub_regions))
}
