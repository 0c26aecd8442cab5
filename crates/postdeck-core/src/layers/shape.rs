//! Preset shape catalogue and shape layer content.

use kurbo::{Affine, BezPath, Circle, Point, Rect, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Side of the square view box every preset is authored in.
pub const PRESET_VIEW_BOX: f64 = 100.0;

const TOLERANCE: f64 = 0.1;

/// Fixed shape outlines available to shape layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapePreset {
    #[default]
    Rect,
    Circle,
    Triangle,
    Heart,
    Star,
    Moon,
    Diamond,
    Hexagon,
    Pentagon,
    Arrow,
    Speech,
    Cross,
    Blob,
    Ring,
    Burst,
    Cloud,
    Chevron,
    Pill,
    Parallelogram,
    Ticket,
}

enum Outline {
    RoundedRect { rect: Rect, radius: f64 },
    Circle { center: Point, radius: f64 },
    Polygon(&'static [(f64, f64)]),
    Svg(&'static str),
}

impl ShapePreset {
    pub const ALL: [ShapePreset; 20] = [
        ShapePreset::Rect,
        ShapePreset::Circle,
        ShapePreset::Triangle,
        ShapePreset::Heart,
        ShapePreset::Star,
        ShapePreset::Moon,
        ShapePreset::Diamond,
        ShapePreset::Hexagon,
        ShapePreset::Pentagon,
        ShapePreset::Arrow,
        ShapePreset::Speech,
        ShapePreset::Cross,
        ShapePreset::Blob,
        ShapePreset::Ring,
        ShapePreset::Burst,
        ShapePreset::Cloud,
        ShapePreset::Chevron,
        ShapePreset::Pill,
        ShapePreset::Parallelogram,
        ShapePreset::Ticket,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShapePreset::Rect => "rect",
            ShapePreset::Circle => "circle",
            ShapePreset::Triangle => "triangle",
            ShapePreset::Heart => "heart",
            ShapePreset::Star => "star",
            ShapePreset::Moon => "moon",
            ShapePreset::Diamond => "diamond",
            ShapePreset::Hexagon => "hexagon",
            ShapePreset::Pentagon => "pentagon",
            ShapePreset::Arrow => "arrow",
            ShapePreset::Speech => "speech",
            ShapePreset::Cross => "cross",
            ShapePreset::Blob => "blob",
            ShapePreset::Ring => "ring",
            ShapePreset::Burst => "burst",
            ShapePreset::Cloud => "cloud",
            ShapePreset::Chevron => "chevron",
            ShapePreset::Pill => "pill",
            ShapePreset::Parallelogram => "parallelogram",
            ShapePreset::Ticket => "ticket",
        }
    }

    /// Look up a preset by its select-box name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }

    fn outline(&self) -> Outline {
        match self {
            ShapePreset::Rect => Outline::RoundedRect {
                rect: Rect::new(5.0, 5.0, 95.0, 95.0),
                radius: 12.0,
            },
            ShapePreset::Circle => Outline::Circle {
                center: Point::new(50.0, 50.0),
                radius: 45.0,
            },
            ShapePreset::Triangle => Outline::Polygon(&[(50.0, 5.0), (95.0, 95.0), (5.0, 95.0)]),
            ShapePreset::Heart => Outline::Svg(
                "M50 85 C20 65 0 40 15 20 C30 0 50 15 50 30 C50 15 70 0 85 20 C100 40 80 65 50 85 Z",
            ),
            ShapePreset::Star => Outline::Polygon(&[
                (50.0, 0.0),
                (61.0, 35.0),
                (98.0, 35.0),
                (68.0, 57.0),
                (79.0, 91.0),
                (50.0, 70.0),
                (21.0, 91.0),
                (32.0, 57.0),
                (2.0, 35.0),
                (39.0, 35.0),
            ]),
            ShapePreset::Moon => Outline::Svg("M70 5 A45 45 0 1 0 70 95 A28 45 0 1 1 70 5 Z"),
            ShapePreset::Diamond => {
                Outline::Polygon(&[(50.0, 5.0), (95.0, 50.0), (50.0, 95.0), (5.0, 50.0)])
            }
            ShapePreset::Hexagon => Outline::Polygon(&[
                (25.0, 5.0),
                (75.0, 5.0),
                (95.0, 50.0),
                (75.0, 95.0),
                (25.0, 95.0),
                (5.0, 50.0),
            ]),
            ShapePreset::Pentagon => Outline::Polygon(&[
                (50.0, 5.0),
                (95.0, 40.0),
                (80.0, 95.0),
                (20.0, 95.0),
                (5.0, 40.0),
            ]),
            ShapePreset::Arrow => Outline::Polygon(&[
                (5.0, 35.0),
                (65.0, 35.0),
                (65.0, 10.0),
                (95.0, 50.0),
                (65.0, 90.0),
                (65.0, 65.0),
                (5.0, 65.0),
            ]),
            ShapePreset::Speech => Outline::Polygon(&[
                (5.0, 5.0),
                (95.0, 5.0),
                (95.0, 80.0),
                (60.0, 80.0),
                (45.0, 95.0),
                (45.0, 80.0),
                (5.0, 80.0),
            ]),
            ShapePreset::Cross => Outline::Polygon(&[
                (35.0, 0.0),
                (65.0, 0.0),
                (65.0, 35.0),
                (100.0, 35.0),
                (100.0, 65.0),
                (65.0, 65.0),
                (65.0, 100.0),
                (35.0, 100.0),
                (35.0, 65.0),
                (0.0, 65.0),
                (0.0, 35.0),
                (35.0, 35.0),
            ]),
            ShapePreset::Blob => Outline::Svg(
                "M20 10 C35 0 70 0 85 20 C100 40 95 70 75 85 C55 100 25 95 10 70 C-5 45 5 20 20 10 Z",
            ),
            ShapePreset::Ring => {
                Outline::Svg("M50 5 A45 45 0 1 1 49.9 5 Z M50 22 A28 28 0 1 0 50.1 22 Z")
            }
            ShapePreset::Burst => Outline::Polygon(&[
                (50.0, 0.0),
                (58.0, 20.0),
                (80.0, 8.0),
                (72.0, 30.0),
                (95.0, 30.0),
                (75.0, 45.0),
                (95.0, 60.0),
                (72.0, 60.0),
                (80.0, 82.0),
                (58.0, 70.0),
                (50.0, 100.0),
                (42.0, 70.0),
                (20.0, 82.0),
                (28.0, 60.0),
                (5.0, 60.0),
                (25.0, 45.0),
                (5.0, 30.0),
                (28.0, 30.0),
                (20.0, 8.0),
                (42.0, 20.0),
            ]),
            ShapePreset::Cloud => Outline::Svg(
                "M25 70 C10 70 10 50 25 48 C28 35 40 30 50 35 C60 25 80 30 82 45 C95 48 95 70 80 70 Z",
            ),
            ShapePreset::Chevron => Outline::Polygon(&[
                (10.0, 20.0),
                (50.0, 80.0),
                (90.0, 20.0),
                (70.0, 20.0),
                (50.0, 50.0),
                (30.0, 20.0),
            ]),
            ShapePreset::Pill => Outline::RoundedRect {
                rect: Rect::new(5.0, 25.0, 95.0, 75.0),
                radius: 25.0,
            },
            ShapePreset::Parallelogram => {
                Outline::Polygon(&[(20.0, 10.0), (100.0, 10.0), (80.0, 90.0), (0.0, 90.0)])
            }
            ShapePreset::Ticket => Outline::Svg(
                "M10 20 H90 V40 A10 10 0 0 0 90 60 V80 H10 V60 A10 10 0 0 0 10 40 Z",
            ),
        }
    }

    /// Outline in the 0..100 view box.
    pub fn path(&self) -> BezPath {
        match self.outline() {
            Outline::RoundedRect { rect, radius } => {
                RoundedRect::from_rect(rect, radius).to_path(TOLERANCE)
            }
            Outline::Circle { center, radius } => Circle::new(center, radius).to_path(TOLERANCE),
            Outline::Polygon(points) => {
                let mut path = BezPath::new();
                for (i, &(x, y)) in points.iter().enumerate() {
                    if i == 0 {
                        path.move_to((x, y));
                    } else {
                        path.line_to((x, y));
                    }
                }
                path.close_path();
                path
            }
            Outline::Svg(d) => BezPath::from_svg(d).unwrap_or_else(|err| {
                log::warn!("Invalid outline for preset {}: {err}", self.name());
                BezPath::new()
            }),
        }
    }

    /// Outline stretched to a `width` x `height` box at the origin, without
    /// preserving the aspect ratio.
    pub fn path_in_box(&self, width: f64, height: f64) -> BezPath {
        let mut path = self.path();
        path.apply_affine(Affine::scale_non_uniform(
            width / PRESET_VIEW_BOX,
            height / PRESET_VIEW_BOX,
        ));
        path
    }
}

/// Style of a shape layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeContent {
    pub preset: ShapePreset,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f64,
}

impl Default for ShapeContent {
    fn default() -> Self {
        Self {
            preset: ShapePreset::Rect,
            fill_color: Color::rgb(0x38, 0xbd, 0xf8),
            stroke_color: Color::white(),
            stroke_width: 0.0,
        }
    }
}
