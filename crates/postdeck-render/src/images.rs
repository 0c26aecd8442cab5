//! Decoding image layers before export.

use std::collections::HashMap;

use postdeck_core::layers::{ImageSource, ImageSourceError};
use postdeck_core::{LayerId, Scene};
use thiserror::Error;
use tiny_skia::{ColorU8, Pixmap};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Source(#[from] ImageSourceError),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Image has no pixels")]
    Empty,
}

/// Outcome of loading one image layer. Both variants count as settled.
#[derive(Debug, Clone)]
pub enum SettledImage {
    Loaded(Pixmap),
    Failed,
}

/// Settled images keyed by layer.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    images: HashMap<LayerId, SettledImage>,
}

impl ImageCache {
    pub fn get(&self, id: LayerId) -> Option<&SettledImage> {
        self.images.get(&id)
    }

    /// Decoded pixels, if the layer's image loaded.
    pub fn loaded(&self, id: LayerId) -> Option<&Pixmap> {
        match self.images.get(&id) {
            Some(SettledImage::Loaded(pixmap)) => Some(pixmap),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.images
            .values()
            .filter(|image| matches!(image, SettledImage::Failed))
            .count()
    }
}

/// Loads every image layer of a scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSettler;

impl ImageSettler {
    pub fn new() -> Self {
        Self
    }

    /// Decode every image layer. Failures are logged and settle as
    /// [`SettledImage::Failed`]; this never waits on anything else.
    pub fn settle(&self, scene: &Scene) -> ImageCache {
        let mut cache = ImageCache::default();
        for layer in scene.layers_ordered() {
            let Some(image) = layer.as_image() else {
                continue;
            };
            let settled = match self.decode(&image.source) {
                Ok(pixmap) => SettledImage::Loaded(pixmap),
                Err(err) => {
                    log::warn!("Image layer {} did not load: {err}", layer.id());
                    SettledImage::Failed
                }
            };
            cache.images.insert(layer.id(), settled);
        }
        cache
    }

    /// Decode a data URI into premultiplied pixels.
    pub fn decode(&self, source: &ImageSource) -> Result<Pixmap, ImageError> {
        let decoded = source.decode()?;
        let rgba = image::load_from_memory(&decoded.bytes)
            .map_err(|e| ImageError::Decode(e.to_string()))?
            .to_rgba8();
        let mut pixmap = Pixmap::new(rgba.width(), rgba.height()).ok_or(ImageError::Empty)?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(pixmap)
    }
}
