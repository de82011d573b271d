//! Handlers for the drawing board.

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sketchform_canvas::{CanvasError, Point, Tool};
use sketchform_core::notification::Notification;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Partial brush update. Omitted fields stay as they are.
#[derive(Debug, Deserialize)]
pub struct BrushUpdate {
    pub tool: Option<Tool>,
    pub color: Option<String>,
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct StrokeRequest {
    pub points: Vec<Point>,
}

/// GET /api/v1/canvas
pub async fn canvas_info(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let board = state.board.lock().await;
    Ok(Json(DataResponse { data: board.info() }))
}

/// GET /api/v1/canvas/image
///
/// Download the current drawing as PNG.
pub async fn download_image(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let png = state.board.lock().await.export_png()?;
    let file_name = format!("drawing-{}.png", chrono::Utc::now().timestamp_millis());

    state
        .event_bus
        .publish(Notification::success("Drawing saved"));

    Ok((
        [
            (CONTENT_TYPE, "image/png".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        png,
    ))
}

/// PUT /api/v1/canvas/brush
///
/// All fields are validated before any is applied.
pub async fn update_brush(
    State(state): State<AppState>,
    Json(update): Json<BrushUpdate>,
) -> AppResult<impl IntoResponse> {
    let mut board = state.board.lock().await;

    let mut brush = board.brush().clone();
    if let Some(tool) = update.tool {
        brush.set_tool(tool);
    }
    if let Some(color) = update.color.as_deref() {
        brush.set_color(color)?;
    }
    if let Some(size) = update.size {
        brush.set_size(size)?;
    }
    *board.brush_mut() = brush;

    if let Some(tool) = update.tool {
        state
            .event_bus
            .publish(Notification::info(format!("{} selected", tool.display_name())));
    }
    if update.color.is_some() {
        state.event_bus.publish(Notification::info(format!(
            "Colour {} selected",
            board.brush().color_hex()
        )));
    }

    Ok(Json(DataResponse { data: board.info() }))
}

/// POST /api/v1/canvas/strokes
///
/// Draw one pointer-down-to-pointer-up stroke through `points`. Points must
/// be finite and near the surface; see [`sketchform_canvas::DrawingBoard::draw_stroke`].
pub async fn draw_stroke(
    State(state): State<AppState>,
    Json(stroke): Json<StrokeRequest>,
) -> AppResult<impl IntoResponse> {
    if stroke.points.is_empty() {
        return Err(AppError::BadRequest(
            "A stroke needs at least one point".into(),
        ));
    }

    let mut board = state.board.lock().await;
    board.draw_stroke(&stroke.points)?;
    tracing::debug!(points = stroke.points.len(), tool = board.brush().tool().as_str(), "Stroke drawn");

    Ok(Json(DataResponse { data: board.info() }))
}

/// POST /api/v1/canvas/undo
pub async fn undo(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut board = state.board.lock().await;
    match board.undo().await {
        Ok(()) => state
            .event_bus
            .publish(Notification::info("Last action undone")),
        Err(CanvasError::NothingToUndo) => {
            state
                .event_bus
                .publish(Notification::error("There is nothing to undo"));
            return Err(CanvasError::NothingToUndo.into());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Json(DataResponse { data: board.info() }))
}

/// POST /api/v1/canvas/redo
pub async fn redo(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut board = state.board.lock().await;
    match board.redo().await {
        Ok(()) => state
            .event_bus
            .publish(Notification::info("Action redone")),
        Err(CanvasError::NothingToRedo) => {
            state
                .event_bus
                .publish(Notification::error("There is nothing to redo"));
            return Err(CanvasError::NothingToRedo.into());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Json(DataResponse { data: board.info() }))
}

/// POST /api/v1/canvas/clear
pub async fn clear(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut board = state.board.lock().await;
    board.clear()?;
    state
        .event_bus
        .publish(Notification::success("Canvas cleared"));
    Ok(Json(DataResponse { data: board.info() }))
}
