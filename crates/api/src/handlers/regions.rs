//! Handlers for the province and city/regency lookups.
//!
//! Lists are returned sorted by name; the cache itself keeps fetch order.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sketchform_core::region::{sorted_by_name, validate_region_id};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/regions
pub async fn list_regions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.regions.sorted_regions(),
    }))
}

/// POST /api/v1/regions/reload
///
/// Re-fetch the province list. Falls back to the offline list on failure.
pub async fn reload_regions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let loaded = state.regions.load_regions().await;
    Ok(Json(DataResponse {
        data: sorted_by_name(&loaded),
    }))
}

/// GET /api/v1/regions/search?q=
pub async fn search_regions(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let matches = state.regions.search_regions(&params.q);
    Ok(Json(DataResponse {
        data: sorted_by_name(&matches),
    }))
}

/// GET /api/v1/regions/stats
pub async fn region_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.regions.stats(),
    }))
}

/// GET /api/v1/regions/{id}/sub-regions
///
/// Cities/regencies of one province. A malformed id is a 400; an
/// unavailable upstream yields an empty list and the failure is reported
/// through notifications.
pub async fn list_sub_regions(
    State(state): State<AppState>,
    Path(region_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_region_id(&region_id)?;
    let list = state.regions.sub_regions_or_empty(&region_id).await;
    Ok(Json(DataResponse {
        data: sorted_by_name(&list),
    }))
}

/// GET /api/v1/sub-regions/search?q=
pub async fn search_sub_regions(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.regions.search_sub_regions(&params.q),
    }))
}
