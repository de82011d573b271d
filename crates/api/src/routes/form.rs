use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::form;
use crate::state::AppState;

/// Edit-form routes mounted at `/form`.
///
/// ```text
/// GET    /               -> form_state
/// POST   /edit/{index}   -> begin_edit
/// DELETE /edit           -> cancel_edit
/// POST   /submit         -> submit_form
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(form::form_state))
        .route("/edit/{index}", post(form::begin_edit))
        .route("/edit", delete(form::cancel_edit))
        .route("/submit", post(form::submit_form))
}
