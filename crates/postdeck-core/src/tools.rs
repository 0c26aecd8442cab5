//! Tool selection and the settings the drawing and placement tools read.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::layers::{ShapeContent, ShapePreset};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Text,
    Shape,
    Image,
    Pen,
    Marker,
    Eraser,
    Line,
    Curve,
}

impl ToolKind {
    /// Tools that paint onto a raster surface.
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            ToolKind::Pen | ToolKind::Marker | ToolKind::Eraser | ToolKind::Line | ToolKind::Curve
        )
    }
}

/// Values of the tool controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Pen color, also the stroke of lines, curves and new shapes.
    pub stroke_color: Color,
    /// Width of pen and marker strokes.
    pub brush_size: f64,
    /// Width of lines, curves and new shape outlines.
    pub stroke_width: f64,
    pub fill_color: Color,
    pub shape_preset: ShapePreset,
    /// Paint onto the primary selection's local surface instead of the canvas.
    pub draw_on_selection: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            stroke_color: Color::white(),
            brush_size: 4.0,
            stroke_width: 3.0,
            fill_color: Color::rgb(0x38, 0xbd, 0xf8),
            shape_preset: ShapePreset::Rect,
            draw_on_selection: false,
        }
    }
}

impl ToolSettings {
    /// Content for a shape layer placed with the shape tool.
    pub fn shape_content(&self) -> ShapeContent {
        ShapeContent {
            preset: self.shape_preset,
            fill_color: self.fill_color,
            stroke_color: self.stroke_color,
            stroke_width: self.stroke_width,
        }
    }
}
