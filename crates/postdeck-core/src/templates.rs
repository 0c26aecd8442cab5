//! Edit templates: named presets for the media edit form, the built-in
//! catalogue and template persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from parsing, validating or storing templates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Invalid JSON in config.")]
    InvalidConfig,
    /// Rejected by validation or by the template service, with its message.
    #[error("{0}")]
    Rejected(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for TemplateError {
    fn from(err: std::io::Error) -> Self {
        TemplateError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::Serialization(err.to_string())
    }
}

const INVALID_TEMPLATE: &str = "Invalid template";

/// Settings for one media type. Keys that are not set are omitted on output;
/// unknown keys are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-media-type settings of a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TemplateConfig {
    /// Parse a config typed into the template editor. It must be a JSON object.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let value: Value = serde_json::from_str(raw).map_err(|_| TemplateError::InvalidConfig)?;
        Self::from_value(value)
    }

    /// Build from an arbitrary JSON value, rejecting non-objects.
    pub fn from_value(value: Value) -> Result<Self, TemplateError> {
        if !value.is_object() {
            return Err(TemplateError::Rejected(INVALID_TEMPLATE.to_string()));
        }
        serde_json::from_value(value).map_err(|_| TemplateError::Rejected(INVALID_TEMPLATE.to_string()))
    }
}

/// A named edit preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub config: TemplateConfig,
}

impl Template {
    /// A user-saved template. Its id is derived from the name.
    pub fn custom(name: &str, config: TemplateConfig) -> Self {
        Self {
            id: custom_id(name),
            name: name.to_string(),
            config,
        }
    }
}

/// `My Look` -> `my-look-custom`
pub fn custom_id(name: &str) -> String {
    format!("{}-custom", name.to_lowercase().replace(' ', "-"))
}

/// Message shown after a save attempt.
pub fn save_feedback(result: &Result<Template, TemplateError>) -> String {
    match result {
        Ok(_) => "Template saved. Refresh to see it in the list.".to_string(),
        Err(TemplateError::InvalidConfig) => TemplateError::InvalidConfig.to_string(),
        Err(TemplateError::Rejected(message)) if !message.is_empty() => message.clone(),
        Err(_) => "Failed to save template.".to_string(),
    }
}

fn media(
    speed: Option<f64>,
    brightness: Option<f64>,
    contrast: Option<f64>,
    text: Option<&str>,
    resize: Option<[f64; 2]>,
    filter: Option<&str>,
    blur: Option<f64>,
) -> MediaConfig {
    MediaConfig {
        speed,
        brightness,
        contrast,
        text: text.map(str::to_string),
        resize,
        filter: filter.map(str::to_string),
        blur,
        ..MediaConfig::default()
    }
}

fn builtin(id: &str, name: &str, video: MediaConfig, image: MediaConfig) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        config: TemplateConfig {
            video: Some(video),
            image: Some(image),
            extra: Map::new(),
        },
    }
}

/// The built-in template catalogue.
pub fn default_templates() -> Vec<Template> {
    const PORTRAIT: [f64; 2] = [1080.0, 1920.0];
    const LANDSCAPE: [f64; 2] = [1920.0, 1080.0];
    const SQUARE: [f64; 2] = [1080.0, 1080.0];
    vec![
        builtin(
            "social-short",
            "Social Short",
            media(Some(1.05), None, None, Some("@yourbrand"), Some(PORTRAIT), None, None),
            media(None, None, None, None, Some(SQUARE), Some("vivid"), None),
        ),
        builtin(
            "cinematic",
            "Cinematic",
            media(None, Some(1.05), Some(1.1), None, Some(LANDSCAPE), None, None),
            media(None, None, None, None, None, Some("cinematic"), None),
        ),
        builtin(
            "square-promo",
            "Square Promo",
            media(Some(1.0), None, None, Some("New Drop"), Some(SQUARE), None, None),
            media(None, None, None, None, Some(SQUARE), Some("vivid"), None),
        ),
        builtin(
            "neon-pop",
            "Neon Pop",
            media(Some(1.15), Some(1.15), Some(1.2), Some("NEW"), Some(PORTRAIT), None, None),
            media(None, Some(1.1), Some(1.2), None, None, Some("vivid"), None),
        ),
        builtin(
            "vlog-clean",
            "Vlog Clean",
            media(Some(1.0), Some(1.05), None, Some("VLOG"), Some(LANDSCAPE), None, None),
            media(None, Some(1.05), Some(1.05), None, None, None, None),
        ),
        builtin(
            "moody-dark",
            "Moody Dark",
            media(None, Some(0.9), Some(1.25), None, None, None, None),
            media(None, Some(0.9), Some(1.25), None, None, None, None),
        ),
        builtin(
            "bright-ads",
            "Bright Ads",
            media(None, Some(1.2), Some(1.1), Some("SALE"), None, None, None),
            media(None, Some(1.2), Some(1.1), None, None, None, None),
        ),
        builtin(
            "soft-film",
            "Soft Film",
            media(None, Some(1.05), Some(0.95), None, None, None, None),
            media(None, Some(1.05), Some(0.95), None, None, None, Some(0.5)),
        ),
    ]
}

/// Persistence for user-saved templates.
pub trait TemplateStore {
    /// Built-in templates followed by saved ones, oldest first.
    fn list(&self) -> Result<Vec<Template>, TemplateError>;

    /// Save a template under a name-derived id and return it.
    fn save(&mut self, name: &str, config: TemplateConfig) -> Result<Template, TemplateError>;
}

fn validate_name(name: &str) -> Result<(), TemplateError> {
    if name.trim().is_empty() {
        return Err(TemplateError::Rejected(INVALID_TEMPLATE.to_string()));
    }
    Ok(())
}

/// In-memory template store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    saved: Vec<Template>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn list(&self) -> Result<Vec<Template>, TemplateError> {
        let mut templates = default_templates();
        templates.extend(self.saved.iter().cloned());
        Ok(templates)
    }

    fn save(&mut self, name: &str, config: TemplateConfig) -> Result<Template, TemplateError> {
        validate_name(name)?;
        let template = Template::custom(name, config);
        self.saved.push(template.clone());
        Ok(template)
    }
}

/// Template store backed by a JSON array file.
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    path: PathBuf,
}

impl FileTemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved templates. A missing or corrupt file reads as empty.
    fn read_saved(&self) -> Result<Vec<Template>, TemplateError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&json) {
            Ok(saved) => Ok(saved),
            Err(err) => {
                log::warn!("Ignoring corrupt template store {}: {err}", self.path.display());
                Ok(Vec::new())
            }
        }
    }
}

impl TemplateStore for FileTemplateStore {
    fn list(&self) -> Result<Vec<Template>, TemplateError> {
        let mut templates = default_templates();
        templates.extend(self.read_saved()?);
        Ok(templates)
    }

    fn save(&mut self, name: &str, config: TemplateConfig) -> Result<Template, TemplateError> {
        validate_name(name)?;
        let template = Template::custom(name, config);
        let mut saved = self.read_saved()?;
        saved.push(template.clone());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&saved)?)?;
        log::info!("Saved template {}", template.id);
        Ok(template)
    }
}
