//! Handlers for the positional record list.
//!
//! Records are addressed by their current position. Every mutation
//! publishes exactly one notification: success when applied and saved, an
//! error when the position was out of range or the change could not be
//! saved.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use sketchform_core::notification::Notification;
use sketchform_core::record::{Record, RecordInput};
use sketchform_store::RecordStoreError;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PositionedRecord {
    pub index: usize,
    pub record: Record,
}

/// Validate `input` and resolve region names from the cache. Names the
/// client sent are kept when the cache does not know the id.
pub(crate) fn build_record(state: &AppState, input: RecordInput) -> AppResult<Record> {
    let region_name = state.regions.find_region_name(&input.region_id);
    let sub_region_name = state
        .regions
        .find_sub_region_name(&input.region_id, &input.sub_region_id);
    Ok(Record::from_input(input, &region_name, &sub_region_name)?)
}

/// Publish the notification matching a mutation result.
pub(crate) fn announce<T>(
    state: &AppState,
    result: &Result<T, RecordStoreError>,
    success: &str,
) {
    match result {
        Ok(_) => state.event_bus.publish(Notification::success(success)),
        Err(RecordStoreError::Persist(_)) => state.event_bus.publish(Notification::error(
            "Change applied but could not be saved",
        )),
        Err(RecordStoreError::Core(err)) => {
            state.event_bus.publish(Notification::error(err.to_string()))
        }
    }
}

/// GET /api/v1/records
pub async fn list_records(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let desk = state.records.lock().await;
    Ok(Json(DataResponse {
        data: desk.store.list().to_vec(),
    }))
}

/// POST /api/v1/records
pub async fn create_record(
    State(state): State<AppState>,
    Json(input): Json<RecordInput>,
) -> AppResult<impl IntoResponse> {
    let record = build_record(&state, input)?;

    let mut desk = state.records.lock().await;
    let result = desk.store.create(record).await;
    announce(&state, &result, "Record added");
    let len = result?;

    let index = len - 1;
    let record = desk.store.get(index)?.clone();
    tracing::info!(index, id = %record.id, "Record created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PositionedRecord { index, record },
        }),
    ))
}

/// GET /api/v1/records/{index}
pub async fn get_record(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> AppResult<impl IntoResponse> {
    let desk = state.records.lock().await;
    let record = desk.store.get(index)?.clone();
    Ok(Json(DataResponse {
        data: PositionedRecord { index, record },
    }))
}

/// PUT /api/v1/records/{index}
pub async fn update_record(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(input): Json<RecordInput>,
) -> AppResult<impl IntoResponse> {
    let record = build_record(&state, input)?;

    let mut desk = state.records.lock().await;
    let result = desk.store.update_at(index, record).await;
    announce(&state, &result, "Record updated");
    let record = result?;
    tracing::info!(index, id = %record.id, "Record updated");

    Ok(Json(DataResponse {
        data: PositionedRecord { index, record },
    }))
}

/// DELETE /api/v1/records/{index}
pub async fn delete_record(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> AppResult<impl IntoResponse> {
    let mut desk = state.records.lock().await;
    let result = desk.store.delete_at(index).await;
    announce(&state, &result, "Record deleted");
    let removed = result?;
    tracing::info!(index, id = %removed.id, "Record deleted");

    Ok(StatusCode::NO_CONTENT)
}
