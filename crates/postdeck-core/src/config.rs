//! Editor configuration.

use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::layers::LayerGeometry;

/// Tunables for an [`Editor`](crate::Editor). Every field has a default, so a
/// partial JSON object is a valid override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Box of a freshly created text or shape layer.
    pub default_layer: LayerGeometry,
    /// Size of a layer created by picking an image file.
    pub image_layer_size: Size,
    /// First z-index handed out by a new scene.
    pub initial_z: i64,
    /// Offset applied to pasted layers.
    pub paste_offset: Vec2,
    /// Floor for interactive resizes.
    pub min_layer_size: Size,
    /// Side of the square cleared by the eraser.
    pub eraser_size: f64,
    pub marker_color: Color,
    /// Offset from the segment midpoint to the curve tool's control point.
    pub curve_bias: Vec2,
    pub clipboard_key: String,
    pub device_pixel_ratio: f64,
    pub background: Color,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_layer: LayerGeometry::new(80.0, 80.0, 200.0, 120.0),
            image_layer_size: Size::new(260.0, 200.0),
            initial_z: 5,
            paste_offset: Vec2::new(20.0, 20.0),
            min_layer_size: Size::new(40.0, 30.0),
            eraser_size: 16.0,
            marker_color: Color::new(56, 189, 248, 153),
            curve_bias: Vec2::new(30.0, -30.0),
            clipboard_key: "postdeck_clipboard".to_string(),
            device_pixel_ratio: 1.0,
            background: Color::rgb(0x11, 0x18, 0x27),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let config = EditorConfig::from_json(r#"{"initial_z": 10, "eraser_size": 24.0}"#).unwrap();
        assert_eq!(config.initial_z, 10);
        assert!((config.eraser_size - 24.0).abs() < f64::EPSILON);
        assert_eq!(config.clipboard_key, "postdeck_clipboard");
        assert_eq!(config.min_layer_size, Size::new(40.0, 30.0));
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_invalid_json_errors() {
        assert!(EditorConfig::from_json("not json").is_err());
    }
}
