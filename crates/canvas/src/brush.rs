//! Drawing tools and the current brush state.

use serde::{Deserialize, Serialize};
use sketchform_core::color::{format_hex_color, parse_hex_color, DEFAULT_COLOR};
use sketchform_core::error::CoreError;

pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 100;
pub const DEFAULT_BRUSH_SIZE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    #[serde(alias = "basic-pen")]
    Pen,
    #[serde(alias = "soft-brush")]
    Brush,
    #[serde(alias = "textured-pencil")]
    Pencil,
    #[serde(alias = "translucent-marker")]
    Marker,
    Eraser,
}

/// How a tool's pixels combine with the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    SourceOver,
    DestinationOut,
}

/// Fixed rendering parameters of a tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolStyle {
    pub composite: Composite,
    pub width_factor: f32,
    pub opacity: f32,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Pen,
        Tool::Brush,
        Tool::Pencil,
        Tool::Marker,
        Tool::Eraser,
    ];

    pub fn style(self) -> ToolStyle {
        let (composite, width_factor, opacity) = match self {
            Tool::Pen => (Composite::SourceOver, 1.0, 1.0),
            Tool::Brush => (Composite::SourceOver, 1.5, 0.8),
            Tool::Pencil => (Composite::SourceOver, 0.8, 0.7),
            Tool::Marker => (Composite::SourceOver, 2.0, 0.6),
            Tool::Eraser => (Composite::DestinationOut, 2.0, 1.0),
        };
        ToolStyle {
            composite,
            width_factor,
            opacity,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Brush => "brush",
            Tool::Pencil => "pencil",
            Tool::Marker => "marker",
            Tool::Eraser => "eraser",
        }
    }

    /// Human-readable name used in notifications.
    pub fn display_name(self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Brush => "Brush",
            Tool::Pencil => "Pencil",
            Tool::Marker => "Marker",
            Tool::Eraser => "Eraser",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    tool: Tool,
    color: [u8; 3],
    size: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            color: parse_hex_color(DEFAULT_COLOR).unwrap_or([0x66, 0x7e, 0xea]),
            size: DEFAULT_BRUSH_SIZE,
        }
    }
}

impl Brush {
    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    pub fn color_hex(&self) -> String {
        format_hex_color(self.color)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_color(&mut self, hex: &str) -> Result<(), CoreError> {
        self.color = parse_hex_color(hex)?;
        Ok(())
    }

    pub fn set_size(&mut self, size: u32) -> Result<(), CoreError> {
        if !(MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).contains(&size) {
            return Err(CoreError::Validation(format!(
                "Brush size must be between {MIN_BRUSH_SIZE} and {MAX_BRUSH_SIZE}, got {size}"
            )));
        }
        self.size = size;
        Ok(())
    }

    /// Stroke width in pixels for the current tool.
    pub fn line_width(&self) -> f32 {
        self.size as f32 * self.tool.style().width_factor
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn tool_names_accept_long_aliases() {
        let tool: Tool = serde_json::from_str("\"soft-brush\"").unwrap();
        assert_eq!(tool, Tool::Brush);
        let tool: Tool = serde_json::from_str("\"eraser\"").unwrap();
        assert_eq!(tool, Tool::Eraser);
        assert_eq!(serde_json::to_string(&Tool::Marker).unwrap(), "\"marker\"");
    }

    #[test]
    fn only_eraser_uses_destination_out() {
        for tool in Tool::ALL {
            let expected = if tool == Tool::Eraser {
                Composite::DestinationOut
            } else {
                Composite::SourceOver
            };
            assert_eq!(tool.style().composite, expected, "{}", tool.as_str());
        }
    }

    #[test]
    fn default_brush_uses_default_color() {
        let brush = Brush::default();
        assert_eq!(brush.color_hex(), DEFAULT_COLOR);
        assert_eq!(brush.tool(), Tool::Pen);
    }

    #[test]
    fn size_is_bounded() {
        let mut brush = Brush::default();
        assert!(brush.set_size(100).is_ok());
        assert_matches!(brush.set_size(0), Err(CoreError::Validation(_)));
        assert_matches!(brush.set_size(101), Err(CoreError::Validation(_)));
        assert_eq!(brush.size(), 100);
    }

    #[test]
    fn line_width_follows_tool_factor() {
        let mut brush = Brush::default();
        brush.set_size(10).unwrap();
        brush.set_tool(Tool::Marker);
        assert_eq!(brush.line_width(), 20.0);
        brush.set_tool(Tool::Pencil);
        assert_eq!(brush.line_width(), 8.0);
    }
}
