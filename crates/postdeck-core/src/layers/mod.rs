//! Layer records: the plain-data model behind every element on the canvas.

mod image;
mod shape;
mod text;

pub use image::{DecodedImage, ImageContent, ImageFormat, ImageSource, ImageSourceError};
pub use shape::{ShapeContent, ShapePreset};
pub use text::{TextAlign, TextContent};

use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::rotation_about_center;

/// Unique identifier for layers.
pub type LayerId = Uuid;

/// Position and size of a layer in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl LayerGeometry {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.left + self.width, self.top + self.height)
    }

    pub fn with_origin(self, origin: Point) -> Self {
        Self { left: origin.x, top: origin.y, ..self }
    }

    pub fn with_size(self, size: Size) -> Self {
        Self { width: size.width, height: size.height, ..self }
    }
}

/// Kind tag derived from a layer's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Text,
    Shape,
    Image,
}

/// Kind-specific payload of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerContent {
    Text(TextContent),
    Shape(ShapeContent),
    Image(ImageContent),
}

impl LayerContent {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerContent::Text(_) => LayerKind::Text,
            LayerContent::Shape(_) => LayerKind::Shape,
            LayerContent::Image(_) => LayerKind::Image,
        }
    }
}

/// A positioned, styled element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub(crate) id: LayerId,
    pub geometry: LayerGeometry,
    /// Rotation in degrees about the box center.
    #[serde(default)]
    pub rotation: f64,
    pub z_index: i64,
    pub content: LayerContent,
}

impl Layer {
    pub fn new(content: LayerContent, geometry: LayerGeometry, z_index: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry,
            rotation: 0.0,
            z_index,
            content,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.content.kind()
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.as_rect()
    }

    /// Map from the layer's local space (top-left at the origin) to canvas space,
    /// including rotation about the box center.
    pub fn transform(&self) -> Affine {
        rotation_about_center(self.bounds(), self.rotation)
            * Affine::translate(self.geometry.origin().to_vec2())
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.content {
            LayerContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.content {
            LayerContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeContent> {
        match &self.content {
            LayerContent::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut ShapeContent> {
        match &mut self.content {
            LayerContent::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageContent> {
        match &self.content {
            LayerContent::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageContent> {
        match &mut self.content {
            LayerContent::Image(image) => Some(image),
            _ => None,
        }
    }
}
