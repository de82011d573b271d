//! Raster drawing surface with per-tool stroke compositing and a bounded
//! undo history.

pub mod board;
pub mod brush;
pub mod error;
pub mod history;
pub mod renderer;
pub mod surface;

pub use board::{CanvasInfo, DrawingBoard, MAX_STROKE_POINTS};
pub use brush::{Brush, Composite, Tool, ToolStyle};
pub use error::CanvasError;
pub use history::{HistoryStack, DEFAULT_HISTORY_LIMIT};
pub use renderer::StrokeRenderer;
pub use surface::{Point, RasterSurface};
