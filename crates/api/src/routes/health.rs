use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    regions_loaded: usize,
    records: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let records = state.records.lock().await.store.len();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        regions_loaded: state.regions.regions().len(),
        records,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
