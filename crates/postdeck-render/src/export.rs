//! Serialized PNG export.

use postdeck_core::layers::ImageSource;
use postdeck_core::{Scene, SurfaceManager};
use thiserror::Error;
use tiny_skia::Pixmap;

use crate::images::ImageSettler;
use crate::renderer::{ExportOptions, Rasterizer, RendererError};

/// Suggested file name for downloads.
pub const EXPORT_FILE_NAME: &str = "post.png";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("An export is already in progress")]
    Busy,
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Proof that [`Exporter::begin`] succeeded; redeemed by [`Exporter::finish`].
#[derive(Debug)]
#[must_use = "an export stays pending until the ticket is finished"]
pub struct ExportTicket {
    _private: (),
}

/// Runs exports one at a time.
#[derive(Debug, Default)]
pub struct Exporter {
    pending: bool,
    settler: ImageSettler,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Claim the exporter. Fails with [`ExportError::Busy`] while another
    /// export has not finished.
    pub fn begin(&mut self) -> Result<ExportTicket, ExportError> {
        if self.pending {
            return Err(ExportError::Busy);
        }
        self.pending = true;
        Ok(ExportTicket { _private: () })
    }

    /// Settle images, rasterize and encode. The exporter is free again
    /// afterwards, whether or not this succeeded.
    pub fn finish(
        &mut self,
        ticket: ExportTicket,
        scene: &Scene,
        surfaces: &SurfaceManager,
        rasterizer: &mut dyn Rasterizer,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        let ExportTicket { _private: () } = ticket;
        let result = self.run(scene, surfaces, rasterizer, options);
        self.pending = false;
        result
    }

    fn run(
        &self,
        scene: &Scene,
        surfaces: &SurfaceManager,
        rasterizer: &mut dyn Rasterizer,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        let images = self.settler.settle(scene);
        let pixmap = rasterizer.rasterize(scene, surfaces, &images, options)?;
        let png = encode_png(&pixmap)?;
        log::info!(
            "Exported {}x{} PNG ({} bytes, {} layers, {} images failed)",
            pixmap.width(),
            pixmap.height(),
            png.len(),
            scene.len(),
            images.failed_count()
        );
        Ok(png)
    }

    /// [`begin`](Self::begin) and [`finish`](Self::finish) in one call.
    pub fn export_png(
        &mut self,
        scene: &Scene,
        surfaces: &SurfaceManager,
        rasterizer: &mut dyn Rasterizer,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        let ticket = self.begin()?;
        self.finish(ticket, scene, surfaces, rasterizer, options)
    }
}

/// Encode a pixmap as an RGBA8 PNG.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut png_data = Vec::new();
    let mut encoder = png::Encoder::new(&mut png_data, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    writer
        .write_image_data(&rgba)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(png_data)
}

/// `data:image/png;base64,...` URL for a link download.
pub fn to_data_url(png: &[u8]) -> String {
    ImageSource::from_bytes("image/png", png).as_str().to_string()
}
