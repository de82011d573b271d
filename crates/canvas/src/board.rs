//! Stroke lifecycle over one surface: begin, extend, end.

use serde::Serialize;
use sketchform_core::error::CoreError;

use crate::brush::{Brush, Tool};
use crate::error::CanvasError;
use crate::history::HistoryStack;
use crate::renderer::StrokeRenderer;
use crate::surface::{Point, RasterSurface};

/// Most points one submitted stroke may carry.
pub const MAX_STROKE_POINTS: usize = 10_000;

/// Snapshot of the board state for clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasInfo {
    pub width: u32,
    pub height: u32,
    pub tool: Tool,
    pub color: String,
    pub size: u32,
    pub total_actions: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

pub struct DrawingBoard {
    surface: RasterSurface,
    brush: Brush,
    renderer: StrokeRenderer,
    history: HistoryStack,
    cursor: Option<Point>,
}

impl DrawingBoard {
    pub fn new(width: u32, height: u32, history_limit: usize) -> Result<Self, CanvasError> {
        Self::with_renderer(width, height, history_limit, StrokeRenderer::new())
    }

    pub fn with_renderer(
        width: u32,
        height: u32,
        history_limit: usize,
        renderer: StrokeRenderer,
    ) -> Result<Self, CanvasError> {
        let surface = RasterSurface::new(width, height);
        let history = HistoryStack::new(history_limit, &surface)?;
        Ok(Self {
            surface,
            brush: Brush::default(),
            renderer,
            history,
            cursor: None,
        })
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn is_drawing(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn begin_stroke(&mut self, at: Point) {
        self.cursor = Some(at);
    }

    /// Render from the last point to `to`. Ignored when no stroke is active.
    pub fn extend_stroke(&mut self, to: Point) {
        let Some(from) = self.cursor else {
            return;
        };
        self.renderer
            .render_segment(&mut self.surface, &self.brush, from, to);
        self.cursor = Some(to);
    }

    /// Finish the active stroke and record a snapshot. Returns `false`
    /// when no stroke was active.
    pub fn end_stroke(&mut self) -> Result<bool, CanvasError> {
        if self.cursor.take().is_none() {
            return Ok(false);
        }
        self.history.snapshot(&self.surface)?;
        Ok(true)
    }

    /// Draw a whole stroke through `points`. A single point only moves the
    /// cursor, exactly like a click without movement.
    ///
    /// The stroke is rejected before anything is drawn when it has more than
    /// [`MAX_STROKE_POINTS`] points, a non-finite coordinate, or a point
    /// further outside the surface than the current line width.
    pub fn draw_stroke(&mut self, points: &[Point]) -> Result<bool, CanvasError> {
        self.check_stroke(points)?;
        let Some((first, rest)) = points.split_first() else {
            return Ok(false);
        };
        self.begin_stroke(*first);
        for point in rest {
            self.extend_stroke(*point);
        }
        self.end_stroke()
    }

    fn check_stroke(&self, points: &[Point]) -> Result<(), CoreError> {
        if points.len() > MAX_STROKE_POINTS {
            return Err(CoreError::Validation(format!(
                "A stroke may have at most {MAX_STROKE_POINTS} points, got {}",
                points.len()
            )));
        }

        let margin = self.brush.line_width().max(1.0);
        let (width, height) = (self.surface.width() as f32, self.surface.height() as f32);
        for point in points {
            if !point.is_finite() {
                return Err(CoreError::Validation(
                    "Stroke coordinates must be finite numbers".to_string(),
                ));
            }
            let inside = (-margin..=width + margin).contains(&point.x)
                && (-margin..=height + margin).contains(&point.y);
            if !inside {
                return Err(CoreError::Validation(format!(
                    "Stroke point ({}, {}) lies outside the {width}x{height} canvas",
                    point.x, point.y
                )));
            }
        }
        Ok(())
    }

    pub async fn undo(&mut self) -> Result<(), CanvasError> {
        self.cursor = None;
        self.history.undo(&mut self.surface).await
    }

    pub async fn redo(&mut self) -> Result<(), CanvasError> {
        self.cursor = None;
        self.history.redo(&mut self.surface).await
    }

    pub fn clear(&mut self) -> Result<(), CanvasError> {
        self.cursor = None;
        self.history.clear(&mut self.surface)
    }

    pub fn info(&self) -> CanvasInfo {
        CanvasInfo {
            width: self.surface.width(),
            height: self.surface.height(),
            tool: self.brush.tool(),
            color: self.brush.color_hex(),
            size: self.brush.size(),
            total_actions: self.history.cursor(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    /// Current surface as a PNG download.
    pub fn export_png(&self) -> Result<Vec<u8>, CanvasError> {
        self.surface.encode_png()
    }
}
