//! Property panel: commands that edit the primary selection and the values
//! shown for it.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::layers::{Layer, LayerContent, LayerId, LayerKind, ShapePreset, TextAlign};
use crate::scene::Scene;
use crate::selection::Selection;

/// An edit issued from the property panel.
///
/// Color payloads are raw color-input strings. Values that do not parse, and
/// commands that do not fit the primary layer's kind, are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InspectorCommand {
    FontSize(f64),
    FontFamily(String),
    TextColor(String),
    LetterSpacing(f64),
    LineHeight(f64),
    Align(TextAlign),
    ToggleBold,
    ToggleItalic,
    ToggleUppercase,
    FillColor(String),
    StrokeColor(String),
    StrokeWidth(f64),
    ShapePreset(ShapePreset),
    ImageWidth(f64),
    ImageHeight(f64),
    Rotation(f64),
    Background(String),
    BringToFront,
    SendToBack,
    Delete,
}

/// What applying a layer-local command changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Nothing,
    Style,
    Geometry,
}

/// Apply a layer-local command. Scene-wide commands (background, z-order,
/// delete) are handled by the editor and report [`Applied::Nothing`] here.
pub fn apply_to_layer(layer: &mut Layer, command: &InspectorCommand) -> Applied {
    use InspectorCommand as C;

    let finite = |v: f64| v.is_finite();
    match (command, &mut layer.content) {
        (C::FontSize(v), LayerContent::Text(t)) if finite(*v) && *v > 0.0 => t.font_size = *v,
        (C::FontFamily(family), LayerContent::Text(t)) if !family.trim().is_empty() => {
            t.font_family = family.trim().to_string()
        }
        (C::TextColor(hex), LayerContent::Text(t)) => match Color::from_hex(hex) {
            Some(color) => t.color = color,
            None => return ignored(command),
        },
        (C::LetterSpacing(v), LayerContent::Text(t)) if finite(*v) => t.letter_spacing = *v,
        (C::LineHeight(v), LayerContent::Text(t)) if finite(*v) && *v > 0.0 => t.line_height = *v,
        (C::Align(align), LayerContent::Text(t)) => t.align = *align,
        (C::ToggleBold, LayerContent::Text(t)) => t.bold = !t.bold,
        (C::ToggleItalic, LayerContent::Text(t)) => t.italic = !t.italic,
        (C::ToggleUppercase, LayerContent::Text(t)) => t.uppercase = !t.uppercase,
        (C::FillColor(hex), LayerContent::Shape(s)) => match Color::from_hex(hex) {
            Some(color) => s.fill_color = color,
            None => return ignored(command),
        },
        (C::StrokeColor(hex), LayerContent::Shape(s)) => match Color::from_hex(hex) {
            Some(color) => s.stroke_color = color,
            None => return ignored(command),
        },
        (C::StrokeWidth(v), LayerContent::Shape(s)) if finite(*v) && *v >= 0.0 => {
            s.stroke_width = *v
        }
        (C::ShapePreset(preset), LayerContent::Shape(s)) => s.preset = *preset,
        (C::ImageWidth(v), LayerContent::Image(_)) if finite(*v) && *v > 0.0 => {
            layer.geometry.width = *v;
            return Applied::Geometry;
        }
        (C::ImageHeight(v), LayerContent::Image(_)) if finite(*v) && *v > 0.0 => {
            layer.geometry.height = *v;
            return Applied::Geometry;
        }
        (C::Rotation(v), _) if finite(*v) => layer.rotation = *v,
        _ => return ignored(command),
    }
    Applied::Style
}

fn ignored(command: &InspectorCommand) -> Applied {
    log::debug!("Ignoring inspector command {command:?}");
    Applied::Nothing
}

/// Values displayed by the property panel for the primary layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspector {
    pub layer: LayerId,
    pub kind: LayerKind,
    pub rotation: f64,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub text_color: Option<String>,
    pub letter_spacing: Option<f64>,
    pub line_height: Option<f64>,
    pub align: Option<TextAlign>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub shape_preset: Option<ShapePreset>,
    pub image_width: Option<f64>,
    pub image_height: Option<f64>,
}

impl Inspector {
    /// Panel values for the primary selection, if any.
    pub fn from_selection(scene: &Scene, selection: &Selection) -> Option<Self> {
        selection
            .primary()
            .and_then(|id| scene.get(id))
            .map(Self::from_layer)
    }

    /// Panel values for `layer`; fields that do not apply to its kind are `None`.
    pub fn from_layer(layer: &Layer) -> Self {
        let mut inspector = Self {
            layer: layer.id(),
            kind: layer.kind(),
            rotation: layer.rotation,
            font_size: None,
            font_family: None,
            text_color: None,
            letter_spacing: None,
            line_height: None,
            align: None,
            fill_color: None,
            stroke_color: None,
            stroke_width: None,
            shape_preset: None,
            image_width: None,
            image_height: None,
        };
        match &layer.content {
            LayerContent::Text(text) => {
                inspector.font_size = Some(text.font_size);
                inspector.font_family = Some(text.font_family.clone());
                inspector.text_color = Some(text.color.to_hex());
                inspector.letter_spacing = Some(text.letter_spacing);
                inspector.line_height = Some(text.line_height);
                inspector.align = Some(text.align);
            }
            LayerContent::Shape(shape) => {
                inspector.fill_color = Some(shape.fill_color.to_hex());
                inspector.stroke_color = Some(shape.stroke_color.to_hex());
                inspector.stroke_width = Some(shape.stroke_width);
                inspector.shape_preset = Some(shape.preset);
            }
            LayerContent::Image(_) => {
                inspector.image_width = Some(layer.geometry.width);
                inspector.image_height = Some(layer.geometry.height);
            }
        }
        inspector
    }
}
