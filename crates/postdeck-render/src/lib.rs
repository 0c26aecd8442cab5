//! PostDeck Render Library
//!
//! Raster export for PostDeck designs: image settlement, the [`Rasterizer`]
//! abstraction with a tiny-skia implementation, and the serialized PNG
//! [`Exporter`].

mod export;
mod images;
mod renderer;
mod skia_impl;

pub use export::{EXPORT_FILE_NAME, ExportError, ExportTicket, Exporter, encode_png, to_data_url};
pub use images::{ImageCache, ImageError, ImageSettler, SettledImage};
pub use renderer::{ExportOptions, Rasterizer, RenderResult, RendererError};
pub use skia_impl::SkiaRasterizer;
