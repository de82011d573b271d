use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::canvas;
use crate::state::AppState;

/// Drawing board routes mounted at `/canvas`.
///
/// ```text
/// GET    /           -> canvas_info
/// GET    /image      -> download_image
/// PUT    /brush      -> update_brush
/// POST   /strokes    -> draw_stroke
/// POST   /undo       -> undo
/// POST   /redo       -> redo
/// POST   /clear      -> clear
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(canvas::canvas_info))
        .route("/image", get(canvas::download_image))
        .route("/brush", put(canvas::update_brush))
        .route("/strokes", post(canvas::draw_stroke))
        .route("/undo", post(canvas::undo))
        .route("/redo", post(canvas::redo))
        .route("/clear", post(canvas::clear))
}
