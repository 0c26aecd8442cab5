//! CPU rasterizer built on tiny-skia.

use kurbo::Affine;
use postdeck_core::geometry::device_pixels;
use postdeck_core::layers::{LayerContent, ShapeContent};
use postdeck_core::surface::to_skia_path;
use postdeck_core::{RasterSurface, Scene, SurfaceManager};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};

use crate::images::ImageCache;
use crate::renderer::{ExportOptions, Rasterizer, RenderResult, RendererError};

fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Coverage of a `width` x `height` layer box under `transform`.
fn box_mask(pixmap: &Pixmap, width: f64, height: f64, transform: Transform) -> Option<Mask> {
    let rect = tiny_skia::Rect::from_xywh(0.0, 0.0, width as f32, height as f32)?;
    let mut mask = Mask::new(pixmap.width(), pixmap.height())?;
    mask.fill_path(&PathBuilder::from_rect(rect), FillRule::Winding, true, transform);
    Some(mask)
}

/// Text layers with visible text, whose glyphs this rasterizer leaves out.
fn glyphless_text_layers(scene: &Scene) -> usize {
    scene
        .layers_ordered()
        .into_iter()
        .filter_map(|layer| layer.as_text())
        .filter(|text| !text.display_text().trim().is_empty())
        .count()
}

fn bilinear() -> PixmapPaint {
    PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    }
}

/// Rasterizer painting background, canvas doodles, then layers in paint order.
///
/// Text glyphs are not drawn; a text layer contributes only its local surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkiaRasterizer;

impl SkiaRasterizer {
    pub fn new() -> Self {
        Self
    }

    fn draw_shape(pixmap: &mut Pixmap, shape: &ShapeContent, width: f64, height: f64, transform: Transform) {
        let Some(path) = to_skia_path(&shape.preset.path_in_box(width, height)) else {
            return;
        };
        // Outlines and strokes never paint outside the layer box.
        let clip = box_mask(pixmap, width, height, transform);
        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color(shape.fill_color.into());
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, clip.as_ref());

        if shape.stroke_width > 0.0 {
            paint.set_color(shape.stroke_color.into());
            let stroke = Stroke {
                width: shape.stroke_width as f32,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, transform, clip.as_ref());
        }
    }

    fn draw_stretched(pixmap: &mut Pixmap, image: &Pixmap, width: f64, height: f64, transform: Transform) {
        let sx = (width / image.width() as f64) as f32;
        let sy = (height / image.height() as f64) as f32;
        pixmap.draw_pixmap(0, 0, image.as_ref(), &bilinear(), transform.pre_scale(sx, sy), None);
    }

    /// Draw a surface whose pixels are `dpr` times denser than CSS pixels.
    fn draw_surface(pixmap: &mut Pixmap, surface: &RasterSurface, transform: Transform) {
        let s = (1.0 / surface.dpr()) as f32;
        pixmap.draw_pixmap(
            0,
            0,
            surface.pixmap().as_ref(),
            &bilinear(),
            transform.pre_scale(s, s),
            None,
        );
    }
}

impl Rasterizer for SkiaRasterizer {
    fn rasterize(
        &mut self,
        scene: &Scene,
        surfaces: &SurfaceManager,
        images: &ImageCache,
        options: &ExportOptions,
    ) -> RenderResult<Pixmap> {
        let width = device_pixels(options.size.width, options.scale_factor);
        let height = device_pixels(options.size.height, options.scale_factor);
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RendererError::InvalidSize { width, height })?;

        let glyphless = glyphless_text_layers(scene);
        if glyphless > 0 {
            log::warn!("Exporting {glyphless} text layer(s) without glyphs");
        }

        let scale = options.scale_factor as f32;
        let base = Transform::from_scale(scale, scale);

        if options.include_background {
            pixmap.fill(scene.background.into());
        }
        Self::draw_surface(&mut pixmap, surfaces.canvas(), base);

        for layer in scene.layers_ordered() {
            let transform = base.pre_concat(to_skia_transform(layer.transform()));
            let (w, h) = (layer.geometry.width, layer.geometry.height);
            match &layer.content {
                LayerContent::Shape(shape) => Self::draw_shape(&mut pixmap, shape, w, h, transform),
                LayerContent::Image(_) => {
                    if let Some(image) = images.loaded(layer.id()) {
                        Self::draw_stretched(&mut pixmap, image, w, h, transform);
                    }
                }
                LayerContent::Text(_) => {}
            }
            if let Some(surface) = surfaces.layer(layer.id()) {
                Self::draw_surface(&mut pixmap, surface, transform);
            }
        }

        Ok(pixmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::ImageSettler;
    use kurbo::{Point, Size};
    use postdeck_core::layers::{ImageContent, ImageSource, LayerGeometry, ShapePreset};
    use postdeck_core::{
        Color, Editor, EditorConfig, EditorEvent, LayerId, Modifiers, PointerTarget, ToolKind,
    };

    fn render(scene: &Scene, surfaces: &SurfaceManager, options: ExportOptions) -> Pixmap {
        let images = ImageSettler::new().settle(scene);
        SkiaRasterizer::new()
            .rasterize(scene, surfaces, &images, &options)
            .unwrap()
    }

    fn rgba(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = pixmap.pixel(x, y).unwrap().demultiply();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    fn shape(scene: &mut Scene, geometry: LayerGeometry, fill: Color) -> LayerId {
        scene.create_layer(
            LayerContent::Shape(ShapeContent {
                preset: ShapePreset::Rect,
                fill_color: fill,
                ..ShapeContent::default()
            }),
            geometry,
        )
    }

    fn surfaces() -> SurfaceManager {
        SurfaceManager::new(Size::new(200.0, 100.0), 1.0).unwrap()
    }

    #[test]
    fn test_background_fill() {
        let scene = Scene::new(5);
        let surfaces = surfaces();
        let options = ExportOptions::new(Size::new(200.0, 100.0));
        let pixmap = render(&scene, &surfaces, options);
        assert_eq!((pixmap.width(), pixmap.height()), (200, 100));
        assert_eq!(rgba(&pixmap, 10, 10), (0x11, 0x18, 0x27, 255));

        let pixmap = render(&scene, &surfaces, options.with_background(false));
        assert_eq!(rgba(&pixmap, 10, 10).3, 0);
    }

    #[test]
    fn test_scale_factor() {
        let scene = Scene::new(5);
        let options = ExportOptions::new(Size::new(200.0, 100.0)).with_scale_factor(2.0);
        let pixmap = render(&scene, &surfaces(), options);
        assert_eq!((pixmap.width(), pixmap.height()), (400, 200));
    }

    #[test]
    fn test_shapes_paint_in_z_order() {
        let mut scene = Scene::new(5);
        let box_ = LayerGeometry::new(0.0, 0.0, 100.0, 100.0);
        shape(&mut scene, box_, Color::rgb(255, 0, 0));
        let blue = shape(&mut scene, box_, Color::rgb(0, 0, 255));
        let options = ExportOptions::new(Size::new(200.0, 100.0));

        let pixmap = render(&scene, &surfaces(), options);
        assert_eq!(rgba(&pixmap, 50, 50), (0, 0, 255, 255));

        scene.send_to_back(blue);
        let pixmap = render(&scene, &surfaces(), options);
        assert_eq!(rgba(&pixmap, 50, 50), (255, 0, 0, 255));
    }

    #[test]
    fn test_shapes_are_clipped_to_their_box() {
        let mut scene = Scene::new(5);
        let geometry = LayerGeometry::new(20.0, 20.0, 60.0, 60.0);
        let id = shape(&mut scene, geometry, Color::rgb(255, 0, 0));
        if let Some(shape) = scene.get_mut(id).unwrap().as_shape_mut() {
            shape.stroke_width = 20.0;
        }
        let ticket = scene.create_layer(
            LayerContent::Shape(ShapeContent {
                preset: ShapePreset::Ticket,
                ..ShapeContent::default()
            }),
            LayerGeometry::new(120.0, 20.0, 60.0, 60.0),
        );
        assert!(scene.contains(ticket));
        let options = ExportOptions::new(Size::new(200.0, 100.0)).with_background(false);
        let pixmap = render(&scene, &surfaces(), options);

        // The stroke reaches past the box edge at x = 20 but is cut there.
        assert_eq!(rgba(&pixmap, 22, 50), (255, 255, 255, 255));
        assert_eq!(rgba(&pixmap, 15, 50).3, 0);
        assert_eq!(rgba(&pixmap, 85, 50).3, 0);
        // The ticket body fills its box but not the notches or the outside.
        assert!(rgba(&pixmap, 150, 50).3 > 0);
        assert_eq!(rgba(&pixmap, 125, 50).3, 0);
        assert_eq!(rgba(&pixmap, 115, 50).3, 0);
        assert_eq!(rgba(&pixmap, 185, 50).3, 0);
    }

    #[test]
    fn test_glyphless_text_layers_are_counted() {
        let mut scene = Scene::new(5);
        let box_ = LayerGeometry::new(0.0, 0.0, 100.0, 50.0);
        scene.create_layer(LayerContent::Text(Default::default()), box_);
        scene.create_layer(
            LayerContent::Text(postdeck_core::layers::TextContent::new("  ")),
            box_,
        );
        shape(&mut scene, box_, Color::white());
        assert_eq!(glyphless_text_layers(&scene), 1);
    }

    #[test]
    fn test_rotation_about_center() {
        let mut scene = Scene::new(5);
        let id = shape(&mut scene, LayerGeometry::new(0.0, 0.0, 100.0, 20.0), Color::white());
        let options = ExportOptions::new(Size::new(200.0, 100.0)).with_background(false);

        let pixmap = render(&scene, &surfaces(), options);
        assert_eq!(rgba(&pixmap, 90, 10).3, 255);
        assert_eq!(rgba(&pixmap, 50, 50).3, 0);

        scene.get_mut(id).unwrap().rotation = 90.0;
        let pixmap = render(&scene, &surfaces(), options);
        assert_eq!(rgba(&pixmap, 90, 10).3, 0);
        assert_eq!(rgba(&pixmap, 50, 50).3, 255);
    }

    #[test]
    fn test_image_is_stretched_to_box() {
        let mut png = Pixmap::new(4, 3).unwrap();
        png.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));
        let png = crate::export::encode_png(&png).unwrap();

        let mut scene = Scene::new(5);
        scene.create_layer(
            LayerContent::Image(ImageContent::new(ImageSource::from_bytes("image/png", &png))),
            LayerGeometry::new(10.0, 10.0, 100.0, 50.0),
        );
        let pixmap = render(&scene, &surfaces(), ExportOptions::new(Size::new(200.0, 100.0)));
        assert_eq!(rgba(&pixmap, 60, 35), (255, 0, 0, 255));
        assert_eq!(rgba(&pixmap, 150, 35), (0x11, 0x18, 0x27, 255));
    }

    #[test]
    fn test_surfaces_are_composited() {
        let mut editor = Editor::new(EditorConfig::default(), Size::new(400.0, 300.0)).unwrap();
        editor.set_tool(ToolKind::Pen);

        // Doodle on the canvas surface.
        let down = |position: Point, target: PointerTarget| EditorEvent::PointerDown {
            position,
            target,
            modifiers: Modifiers::default(),
        };
        editor.handle_event(down(Point::new(10.0, 250.0), PointerTarget::Canvas));
        editor.handle_event(EditorEvent::PointerMove { position: Point::new(100.0, 250.0) });
        editor.handle_event(EditorEvent::PointerUp { position: Point::new(100.0, 250.0) });

        // Marks on a text layer's local surface; the layer sits at (80, 80).
        let text = editor.create_layer(LayerContent::Text(Default::default()));
        editor.tool_settings.draw_on_selection = true;
        editor.handle_event(down(Point::new(100.0, 100.0), PointerTarget::Layer(text)));
        editor.handle_event(EditorEvent::PointerMove { position: Point::new(180.0, 100.0) });
        editor.handle_event(EditorEvent::PointerUp { position: Point::new(180.0, 100.0) });

        let options = ExportOptions::new(Size::new(400.0, 300.0));
        let pixmap = render(editor.scene(), editor.surfaces(), options);
        assert_eq!(rgba(&pixmap, 50, 250), (255, 255, 255, 255));
        assert_eq!(rgba(&pixmap, 140, 100), (255, 255, 255, 255));
        // Text glyphs themselves are not painted.
        assert_eq!(rgba(&pixmap, 250, 180), (0x11, 0x18, 0x27, 255));
    }
}
