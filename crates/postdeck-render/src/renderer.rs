//! Rasterizer trait abstraction.

use kurbo::Size;
use postdeck_core::{Scene, SurfaceManager};
use thiserror::Error;
use tiny_skia::Pixmap;

use crate::images::ImageCache;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Cannot allocate a {width}x{height} export")]
    InvalidSize { width: u32, height: u32 },
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Output parameters of an export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// Area to export, in CSS pixels from the canvas's top-left.
    pub size: Size,
    /// Device pixels per CSS pixel in the output.
    pub scale_factor: f64,
    /// Paint the scene background; otherwise the output starts transparent.
    pub include_background: bool,
}

impl ExportOptions {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            scale_factor: 1.0,
            include_background: true,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, include_background: bool) -> Self {
        self.include_background = include_background;
        self
    }
}

/// Composes a scene and its raster surfaces into a single image.
///
/// Callers settle every image layer first; the rasterizer only reads the
/// finished [`ImageCache`].
pub trait Rasterizer {
    fn rasterize(
        &mut self,
        scene: &Scene,
        surfaces: &SurfaceManager,
        images: &ImageCache,
        options: &ExportOptions,
    ) -> RenderResult<Pixmap>;
}
