//! Raster surfaces for freehand marks: one canvas-wide surface and one lazy
//! surface per layer, all sized in device pixels.

use std::collections::HashMap;

use kurbo::{BezPath, PathEl, Rect, Size};
use thiserror::Error;
use tiny_skia::{
    BlendMode, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};

use crate::color::Color;
use crate::geometry::device_pixels;
use crate::layers::{LayerGeometry, LayerId};
use crate::scene::Scene;

/// Errors from allocating raster surfaces.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Cannot allocate a {width}x{height} surface")]
    InvalidSize { width: u32, height: u32 },
}

/// Convert a kurbo path to a tiny-skia path. Returns `None` for empty paths.
pub fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn allocate(width: u32, height: u32) -> Result<Pixmap, SurfaceError> {
    Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })
}

/// Full copy of a surface's pixels, used for line and curve previews.
#[derive(Debug, Clone)]
pub struct SurfaceSnapshot {
    pixmap: Pixmap,
}

/// A device-pixel buffer addressed in CSS pixels.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixmap: Pixmap,
    css_size: Size,
    dpr: f64,
}

impl RasterSurface {
    pub fn new(css_size: Size, dpr: f64) -> Result<Self, SurfaceError> {
        let pixmap = allocate(
            device_pixels(css_size.width, dpr),
            device_pixels(css_size.height, dpr),
        )?;
        Ok(Self { pixmap, css_size, dpr })
    }

    pub fn css_size(&self) -> Size {
        self.css_size
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Whether the buffer already backs `css_size` at `dpr`.
    pub fn matches(&self, css_size: Size, dpr: f64) -> bool {
        self.pixmap.width() == device_pixels(css_size.width, dpr)
            && self.pixmap.height() == device_pixels(css_size.height, dpr)
    }

    /// CSS-to-device transform for drawing.
    pub fn transform(&self) -> Transform {
        Transform::from_scale(self.dpr as f32, self.dpr as f32)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Assign a new size. Like assigning a canvas element's dimensions, this
    /// discards the current contents.
    pub fn resize(&mut self, css_size: Size, dpr: f64) -> Result<(), SurfaceError> {
        self.pixmap = allocate(
            device_pixels(css_size.width, dpr),
            device_pixels(css_size.height, dpr),
        )?;
        self.css_size = css_size;
        self.dpr = dpr;
        Ok(())
    }

    /// Resize while stretching the current contents into the new buffer.
    pub fn rescale(&mut self, css_size: Size, dpr: f64) -> Result<(), SurfaceError> {
        let next = allocate(
            device_pixels(css_size.width, dpr),
            device_pixels(css_size.height, dpr),
        )?;
        let previous = std::mem::replace(&mut self.pixmap, next);
        let sx = self.pixmap.width() as f32 / previous.width() as f32;
        let sy = self.pixmap.height() as f32 / previous.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            previous.as_ref(),
            &paint,
            Transform::from_scale(sx, sy),
            None,
        );
        self.css_size = css_size;
        self.dpr = dpr;
        Ok(())
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            pixmap: self.pixmap.clone(),
        }
    }

    /// Put a snapshot back. Returns `false` without touching the pixels if
    /// the surface was resized since.
    pub fn restore(&mut self, snapshot: &SurfaceSnapshot) -> bool {
        if snapshot.pixmap.width() != self.pixmap.width()
            || snapshot.pixmap.height() != self.pixmap.height()
        {
            log::debug!("Snapshot size mismatch, not restoring");
            return false;
        }
        self.pixmap.data_mut().copy_from_slice(snapshot.pixmap.data());
        true
    }

    /// Stroke `path` (in CSS pixels) with round caps and joins.
    pub fn stroke(&mut self, path: &BezPath, color: Color, width: f64) {
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color.into());
        paint.anti_alias = true;
        let stroke = Stroke {
            width: width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let transform = self.transform();
        self.pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }

    /// Clear a rectangle (in CSS pixels) to transparent.
    pub fn clear_rect(&mut self, rect: Rect) {
        let Some(rect) = tiny_skia::Rect::from_xywh(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.width() as f32,
            rect.height() as f32,
        ) else {
            return;
        };
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        let transform = self.transform();
        self.pixmap.fill_rect(rect, &paint, transform, None);
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Straight-alpha color of the device pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::new(p.red(), p.green(), p.blue(), p.alpha()))
    }
}

/// Where a drawing gesture paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTarget {
    Canvas,
    Layer(LayerId),
}

/// Owns the canvas-wide surface and every layer's local surface.
#[derive(Debug)]
pub struct SurfaceManager {
    canvas: RasterSurface,
    layers: HashMap<LayerId, RasterSurface>,
    dpr: f64,
}

impl SurfaceManager {
    pub fn new(viewport: Size, dpr: f64) -> Result<Self, SurfaceError> {
        Ok(Self {
            canvas: RasterSurface::new(viewport, dpr)?,
            layers: HashMap::new(),
            dpr,
        })
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    pub fn canvas(&self) -> &RasterSurface {
        &self.canvas
    }

    pub fn layer(&self, id: LayerId) -> Option<&RasterSurface> {
        self.layers.get(&id)
    }

    /// The layer's local surface, allocated or resized to its box if needed.
    pub fn layer_surface(
        &mut self,
        id: LayerId,
        geometry: &LayerGeometry,
    ) -> Result<&mut RasterSurface, SurfaceError> {
        let size = geometry.size();
        let dpr = self.dpr;
        match self.layers.entry(id) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                let surface = entry.into_mut();
                if !surface.matches(size, dpr) {
                    surface.resize(size, dpr)?;
                }
                Ok(surface)
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                Ok(entry.insert(RasterSurface::new(size, dpr)?))
            }
        }
    }

    /// Resolve a draw target against the scene. A layer target whose layer is
    /// gone falls back to the canvas.
    pub fn surface_for(
        &mut self,
        target: DrawTarget,
        scene: &Scene,
    ) -> Result<&mut RasterSurface, SurfaceError> {
        match target {
            DrawTarget::Layer(id) => match scene.get(id) {
                Some(layer) => {
                    let geometry = layer.geometry;
                    self.layer_surface(id, &geometry)
                }
                None => Ok(&mut self.canvas),
            },
            DrawTarget::Canvas => Ok(&mut self.canvas),
        }
    }

    /// Bring an existing layer surface in line with the layer box. No-op for
    /// layers without a surface.
    pub fn sync_layer(&mut self, id: LayerId, geometry: &LayerGeometry) -> Result<(), SurfaceError> {
        match self.layers.get_mut(&id) {
            Some(surface) if !surface.matches(geometry.size(), self.dpr) => {
                surface.resize(geometry.size(), self.dpr)
            }
            _ => Ok(()),
        }
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Option<RasterSurface> {
        self.layers.remove(&id)
    }

    /// Re-derive the canvas surface from the live viewport, keeping its
    /// contents stretched to the new size.
    pub fn resize_canvas(&mut self, viewport: Size, dpr: f64) -> Result<(), SurfaceError> {
        self.canvas.rescale(viewport, dpr)?;
        self.dpr = dpr;
        Ok(())
    }
}
