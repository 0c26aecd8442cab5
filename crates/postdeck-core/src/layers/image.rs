//! Image layer content backed by a data URI.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reading an [`ImageSource`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageSourceError {
    #[error("Image source is empty")]
    Empty,
    #[error("Not a base64 data URI")]
    NotDataUri,
    #[error("Invalid base64 payload: {0}")]
    Base64(String),
    #[error("Image read failed: {0}")]
    Read(String),
}

/// Raster formats recognised in image payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// Payload of a data URI after base64 decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// Format sniffed from the bytes, ignoring the declared MIME type.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_magic_bytes(&self.bytes)
    }
}

/// A `data:` URI, empty while the file read is still pending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSource(String);

impl ImageSource {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn from_data_uri(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Build a base64 data URI from raw bytes.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn decode(&self) -> Result<DecodedImage, ImageSourceError> {
        if self.0.is_empty() {
            return Err(ImageSourceError::Empty);
        }
        let rest = self.0.strip_prefix("data:").ok_or(ImageSourceError::NotDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageSourceError::NotDataUri)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(ImageSourceError::NotDataUri)?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageSourceError::Base64(e.to_string()))?;
        Ok(DecodedImage {
            mime: mime.to_string(),
            bytes,
        })
    }
}

/// Content of an image layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    #[serde(default)]
    pub source: ImageSource,
}

impl ImageContent {
    pub fn new(source: ImageSource) -> Self {
        Self { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_from_bytes_decodes_back() {
        let source = ImageSource::from_bytes("image/png", &PNG_MAGIC);
        assert!(source.as_str().starts_with("data:image/png;base64,"));
        let decoded = source.decode().unwrap();
        assert_eq!(decoded.mime, "image/png");
        assert_eq!(decoded.bytes, PNG_MAGIC);
        assert_eq!(decoded.format(), Some(ImageFormat::Png));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(ImageSource::empty().decode(), Err(ImageSourceError::Empty));
        assert_eq!(
            ImageSource::from_data_uri("https://example.com/a.png").decode(),
            Err(ImageSourceError::NotDataUri)
        );
        assert!(matches!(
            ImageSource::from_data_uri("data:image/png;base64,@@@").decode(),
            Err(ImageSourceError::Base64(_))
        ));
    }

    #[test]
    fn test_magic_bytes() {
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF8"), None);
    }

    #[test]
    fn test_source_serializes_as_plain_string() {
        let content = ImageContent::new(ImageSource::from_data_uri("data:image/png;base64,AAAA"));
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["source"], "data:image/png;base64,AAAA");
    }
}
