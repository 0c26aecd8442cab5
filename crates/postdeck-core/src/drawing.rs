//! Freehand drawing gestures on raster surfaces.

use kurbo::{BezPath, Point, Rect};

use crate::config::EditorConfig;
use crate::surface::{DrawTarget, RasterSurface, SurfaceSnapshot};
use crate::tools::{ToolKind, ToolSettings};

#[derive(Debug, Clone)]
enum Gesture {
    /// Pen or marker: each move strokes the segment from the last point.
    Freehand { marker: bool, last: Point },
    Erase,
    /// Line or curve: each move restores `snapshot` and strokes a fresh preview.
    Preview {
        curve: bool,
        anchor: Point,
        snapshot: SurfaceSnapshot,
    },
}

/// State of the in-flight drawing gesture, if any.
#[derive(Debug, Clone, Default)]
pub struct DrawingEngine {
    gesture: Option<(DrawTarget, Gesture)>,
}

impl DrawingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Surface the active gesture paints on.
    pub fn target(&self) -> Option<DrawTarget> {
        self.gesture.as_ref().map(|(target, _)| *target)
    }

    /// Start a gesture at `point` (local to `surface`). Non-drawing tools are ignored.
    pub fn begin(&mut self, tool: ToolKind, target: DrawTarget, surface: &RasterSurface, point: Point) {
        let gesture = match tool {
            ToolKind::Pen | ToolKind::Marker => Gesture::Freehand {
                marker: tool == ToolKind::Marker,
                last: point,
            },
            ToolKind::Eraser => Gesture::Erase,
            ToolKind::Line | ToolKind::Curve => Gesture::Preview {
                curve: tool == ToolKind::Curve,
                anchor: point,
                snapshot: surface.snapshot(),
            },
            _ => return,
        };
        self.gesture = Some((target, gesture));
    }

    /// Continue the gesture to `point` (local to `surface`).
    pub fn extend(
        &mut self,
        surface: &mut RasterSurface,
        point: Point,
        settings: &ToolSettings,
        config: &EditorConfig,
    ) {
        let Some((_, gesture)) = self.gesture.as_mut() else {
            return;
        };
        match gesture {
            Gesture::Freehand { marker, last } => {
                let color = if *marker {
                    config.marker_color
                } else {
                    settings.stroke_color
                };
                let mut path = BezPath::new();
                path.move_to(*last);
                path.line_to(point);
                surface.stroke(&path, color, settings.brush_size);
                *last = point;
            }
            Gesture::Erase => {
                let half = config.eraser_size / 2.0;
                surface.clear_rect(Rect::new(
                    point.x - half,
                    point.y - half,
                    point.x + half,
                    point.y + half,
                ));
            }
            Gesture::Preview {
                curve,
                anchor,
                snapshot,
            } => {
                if !surface.restore(snapshot) {
                    *snapshot = surface.snapshot();
                }
                let mut path = BezPath::new();
                path.move_to(*anchor);
                if *curve {
                    let control = anchor.midpoint(point) + config.curve_bias;
                    path.quad_to(control, point);
                } else {
                    path.line_to(point);
                }
                surface.stroke(&path, settings.stroke_color, settings.stroke_width);
            }
        }
    }

    /// Finish the gesture. Marks already on the surface stay; a line or curve
    /// keeps its last preview.
    pub fn end(&mut self) -> bool {
        self.gesture.take().is_some()
    }
}
