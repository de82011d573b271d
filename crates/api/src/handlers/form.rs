//! Handlers for the edit-form binding.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use sketchform_core::notification::Notification;
use sketchform_core::record::{Record, RecordInput};
use sketchform_store::{FormState, SubmitOutcome};

use super::records::{announce, build_record};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::{AppState, RecordDesk};

#[derive(Debug, Serialize)]
pub struct FormView {
    pub state: FormState,
    /// The record under edit, if it still exists.
    pub record: Option<Record>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub outcome: SubmitOutcome,
    pub record: Record,
}

fn view(desk: &RecordDesk) -> FormView {
    let record = match desk.binding.state() {
        FormState::Idle => None,
        FormState::Editing { id, .. } => desk
            .store
            .position_of(id)
            .and_then(|i| desk.store.get(i).ok())
            .cloned(),
    };
    FormView {
        state: desk.binding.state(),
        record,
    }
}

/// GET /api/v1/form
pub async fn form_state(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let desk = state.records.lock().await;
    Ok(Json(DataResponse { data: view(&desk) }))
}

/// POST /api/v1/form/edit/{index}
///
/// Load the record at `index` into the form. Replaces any edit in progress.
pub async fn begin_edit(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> AppResult<impl IntoResponse> {
    let mut guard = state.records.lock().await;
    let desk = &mut *guard;
    if let Err(e) = desk.binding.begin_edit(&desk.store, index) {
        state.event_bus.publish(Notification::error(e.to_string()));
        return Err(e.into());
    }

    state.event_bus.publish(Notification::info(
        "Edit mode active. Change the data and submit to update.",
    ));
    Ok(Json(DataResponse { data: view(desk) }))
}

/// DELETE /api/v1/form/edit
pub async fn cancel_edit(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut desk = state.records.lock().await;
    if desk.binding.cancel() {
        state.event_bus.publish(Notification::info("Edit cancelled"));
    }
    Ok(Json(DataResponse { data: view(&desk) }))
}

/// POST /api/v1/form/submit
///
/// Create a record, or update the one under edit. The form returns to idle
/// either way.
pub async fn submit_form(
    State(state): State<AppState>,
    Json(input): Json<RecordInput>,
) -> AppResult<impl IntoResponse> {
    let record = build_record(&state, input)?;

    let mut guard = state.records.lock().await;
    let desk = &mut *guard;
    let editing = desk.binding.is_editing();
    let result = desk.binding.submit(&mut desk.store, record).await;
    announce(
        &state,
        &result,
        if editing { "Record updated" } else { "Record added" },
    );
    let outcome = result?;

    let index = match outcome {
        SubmitOutcome::Created { index } | SubmitOutcome::Updated { index } => index,
    };
    let record = desk.store.get(index)?.clone();
    tracing::info!(?outcome, id = %record.id, "Form submitted");

    Ok(Json(DataResponse {
        data: SubmitResponse { outcome, record },
    }))
}
