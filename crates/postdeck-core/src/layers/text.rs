//! Text layer content.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Horizontal alignment of text within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text and typography of a text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub color: Color,
    /// Extra spacing between glyphs, in pixels.
    pub letter_spacing: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    pub align: TextAlign,
    pub bold: bool,
    pub italic: bool,
    pub uppercase: bool,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: "New Text".to_string(),
            font_size: 48.0,
            font_family: "Inter".to_string(),
            color: Color::white(),
            letter_spacing: 0.0,
            line_height: 1.2,
            align: TextAlign::Left,
            bold: false,
            italic: false,
            uppercase: false,
        }
    }
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    /// The string as it should be displayed, with the uppercase transform applied.
    pub fn display_text(&self) -> String {
        if self.uppercase {
            self.text.to_uppercase()
        } else {
            self.text.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let text = TextContent::default();
        assert!((text.font_size - 48.0).abs() < f64::EPSILON);
        assert!((text.line_height - 1.2).abs() < f64::EPSILON);
        assert_eq!(text.align, TextAlign::Left);
    }

    #[test]
    fn test_display_text_uppercase() {
        let mut text = TextContent::new("Hello");
        assert_eq!(text.display_text(), "Hello");
        text.uppercase = true;
        assert_eq!(text.display_text(), "HELLO");
        assert_eq!(text.text, "Hello");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let text: TextContent = serde_json::from_str(r#"{"text": "Hi", "bold": true}"#).unwrap();
        assert_eq!(text.text, "Hi");
        assert!(text.bold);
        assert_eq!(text.font_family, "Inter");
    }
}
