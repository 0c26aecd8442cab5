//! The media edit form: raw control values and the JSON edit recipe derived
//! from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::templates::MediaConfig;

/// Raw string values of the edit controls, as typed or slid by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeForm {
    pub speed: String,
    pub brightness: String,
    pub contrast: String,
    pub saturation: String,
    pub blur: String,
    pub text: String,
    pub font_size: String,
    pub text_color: String,
    /// `width,height`
    pub resize: String,
    /// `start,end` in seconds
    pub trim: String,
    pub silence_threshold: String,
    pub min_clip: String,
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self {
            speed: "1".to_string(),
            brightness: "1".to_string(),
            contrast: "1".to_string(),
            saturation: "1".to_string(),
            blur: "0".to_string(),
            text: String::new(),
            font_size: "48".to_string(),
            text_color: "#ffffff".to_string(),
            resize: String::new(),
            trim: String::new(),
            silence_threshold: String::new(),
            min_clip: String::new(),
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn number_or(raw: &str, default: f64) -> f64 {
    parse_number(raw).unwrap_or(default)
}

/// JSON number, integral values without a fractional part.
fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Split `a,b` into exactly two numbers.
pub fn parse_pair(raw: &str) -> Option<[f64; 2]> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [a, b] => Some([parse_number(a)?, parse_number(b)?]),
        _ => None,
    }
}

fn format_number(value: f64) -> String {
    format!("{value}")
}

impl RecipeForm {
    /// Build the edit recipe submitted with the upload.
    pub fn collect(&self) -> Map<String, Value> {
        let mut edits = Map::new();
        edits.insert("speed".into(), json_number(number_or(&self.speed, 1.0)));
        edits.insert(
            "brightness".into(),
            json_number(number_or(&self.brightness, 1.0)),
        );
        edits.insert("contrast".into(), json_number(number_or(&self.contrast, 1.0)));
        let saturation = number_or(&self.saturation, 1.0);
        edits.insert("saturation".into(), json_number(saturation));
        edits.insert("text".into(), Value::from(self.text.clone()));
        edits.insert("font_size".into(), json_number(number_or(&self.font_size, 48.0)));
        edits.insert("text_color".into(), Value::from(self.text_color.clone()));

        let blur = number_or(&self.blur, 0.0);
        if blur > 0.0 {
            edits.insert("blur".into(), json_number(blur));
        }
        if saturation != 1.0 {
            edits.insert("filter".into(), Value::from("vivid"));
        }
        if let Some(pair) = parse_pair(&self.resize) {
            edits.insert("resize".into(), Value::from(pair.map(json_number).to_vec()));
        }
        if let Some(pair) = parse_pair(&self.trim) {
            edits.insert("trim".into(), Value::from(pair.map(json_number).to_vec()));
        }
        for (key, raw) in [
            ("silence_threshold", &self.silence_threshold),
            ("min_clip", &self.min_clip),
        ] {
            if raw.trim().is_empty() {
                continue;
            }
            match parse_number(raw) {
                Some(value) => {
                    edits.insert(key.into(), json_number(value));
                }
                None => log::debug!("Ignoring {key} value {raw:?}"),
            }
        }
        edits
    }

    /// The recipe serialized for the hidden form field.
    pub fn to_json(&self) -> String {
        Value::Object(self.collect()).to_string()
    }

    /// CSS filter string for the live preview.
    pub fn css_filter(&self) -> String {
        format!(
            "brightness({}) contrast({}) saturate({}) blur({}px)",
            format_number(number_or(&self.brightness, 1.0)),
            format_number(number_or(&self.contrast, 1.0)),
            format_number(number_or(&self.saturation, 1.0)),
            format_number(number_or(&self.blur, 0.0)),
        )
    }

    /// Load a template's video settings. Values the template leaves out reset
    /// to their defaults.
    pub fn apply_template(&mut self, video: Option<&MediaConfig>) {
        let empty = MediaConfig::default();
        let video = video.unwrap_or(&empty);
        self.speed = format_number(video.speed.unwrap_or(1.0));
        self.brightness = format_number(video.brightness.unwrap_or(1.0));
        self.contrast = format_number(video.contrast.unwrap_or(1.0));
        self.text = video.text.clone().unwrap_or_default();
        self.resize = video
            .resize
            .map(|[w, h]| format!("{},{}", format_number(w), format_number(h)))
            .unwrap_or_default();
    }
}
