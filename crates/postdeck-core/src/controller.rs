//! The editor: owns the scene, the selection and the surfaces, and routes
//! every input event through one interaction state machine.

use kurbo::{Point, Rect, Size, Vec2};

use crate::clipboard::{self, MemorySessionStore, SessionStore};
use crate::color::Color;
use crate::config::EditorConfig;
use crate::drawing::DrawingEngine;
use crate::geometry::{canvas_to_box_local, client_to_local, normalized_rect, resized_box};
use crate::input::{EditorEvent, Modifiers, PointerTarget};
use crate::inspector::{Applied, Inspector, InspectorCommand, apply_to_layer};
use crate::layers::{
    ImageContent, ImageSource, ImageSourceError, Layer, LayerContent, LayerGeometry, LayerId,
    TextContent,
};
use crate::scene::Scene;
use crate::selection::Selection;
use crate::surface::{DrawTarget, SurfaceError, SurfaceManager};
use crate::tools::{ToolKind, ToolSettings};

/// A selected layer captured at the start of a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGrab {
    pub layer: LayerId,
    /// Pointer position minus the layer's top-left, in client space.
    pub offset: Vec2,
    /// Canvas-relative position when the drag began.
    pub start: Point,
}

/// Pointer interaction in progress. Exactly one is active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        grabs: Vec<DragGrab>,
    },
    Resizing {
        layer: LayerId,
    },
    MarqueeSelecting {
        anchor: Point,
        current: Point,
    },
    Drawing,
}

/// Headless design-canvas editor.
pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    selection: Selection,
    surfaces: SurfaceManager,
    tool: ToolKind,
    /// Values of the tool controls.
    pub tool_settings: ToolSettings,
    state: InteractionState,
    drawing: DrawingEngine,
    /// Client-space position of the canvas's top-left corner.
    canvas_origin: Point,
    viewport: Size,
    session: Box<dyn SessionStore>,
}

impl Editor {
    /// Create an editor with an in-memory clipboard store.
    pub fn new(config: EditorConfig, viewport: Size) -> Result<Self, SurfaceError> {
        Self::with_session_store(config, viewport, Box::new(MemorySessionStore::new()))
    }

    pub fn with_session_store(
        config: EditorConfig,
        viewport: Size,
        session: Box<dyn SessionStore>,
    ) -> Result<Self, SurfaceError> {
        let surfaces = SurfaceManager::new(viewport, config.device_pixel_ratio)?;
        let mut scene = Scene::new(config.initial_z);
        scene.background = config.background;
        Ok(Self {
            config,
            scene,
            selection: Selection::new(),
            surfaces,
            tool: ToolKind::default(),
            tool_settings: ToolSettings::default(),
            state: InteractionState::Idle,
            drawing: DrawingEngine::new(),
            canvas_origin: Point::ZERO,
            viewport,
            session,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn surfaces(&self) -> &SurfaceManager {
        &self.surfaces
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn canvas_origin(&self) -> Point {
        self.canvas_origin
    }

    /// Update the canvas's client-space position after a layout change.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    /// Re-derive the canvas surface from the live viewport and bring every
    /// layer surface to the new device pixel ratio. A drawing gesture in
    /// progress ends first, keeping its marks.
    pub fn resize_viewport(&mut self, viewport: Size, dpr: f64) -> Result<(), SurfaceError> {
        if self.drawing.is_active() {
            self.release();
        }
        self.surfaces.resize_canvas(viewport, dpr)?;
        self.viewport = viewport;
        for layer in self.scene.layers_ordered() {
            self.surfaces.sync_layer(layer.id(), &layer.geometry)?;
        }
        Ok(())
    }

    /// Current marquee rectangle in canvas-local coordinates.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.state {
            InteractionState::MarqueeSelecting { anchor, current } => {
                Some(normalized_rect(anchor, current))
            }
            _ => None,
        }
    }

    /// Panel values for the primary selection.
    pub fn inspector(&self) -> Option<Inspector> {
        Inspector::from_selection(&self.scene, &self.selection)
    }

    /// Route an input event through the interaction state machine.
    pub fn handle_event(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::PointerDown {
                position,
                target,
                modifiers,
            } => self.pointer_down(position, target, modifiers),
            EditorEvent::PointerMove { position } => self.pointer_move(position),
            EditorEvent::PointerUp { position } => self.pointer_up(position),
            EditorEvent::PointerCancel | EditorEvent::WindowBlur => self.release(),
            EditorEvent::KeyDown { key, modifiers } => self.key_down(&key, modifiers),
        }
    }

    fn pointer_down(&mut self, position: Point, target: PointerTarget, modifiers: Modifiers) {
        if self.state != InteractionState::Idle {
            // The previous release never arrived.
            self.release();
        }
        let local = client_to_local(position, self.canvas_origin);

        if let PointerTarget::ResizeHandle(id) = target {
            if self.scene.contains(id) {
                self.selection.replace(id);
                self.state = InteractionState::Resizing { layer: id };
            }
            return;
        }

        match self.tool {
            ToolKind::Select => match target {
                PointerTarget::Layer(id) if self.scene.contains(id) => {
                    if modifiers.command() {
                        self.selection.toggle(id);
                    } else {
                        self.selection.replace(id);
                    }
                    self.begin_drag(position);
                }
                PointerTarget::Layer(id) => log::debug!("Pointer down on unknown layer {id}"),
                _ => {
                    self.selection.clear();
                    self.state = InteractionState::MarqueeSelecting {
                        anchor: local,
                        current: local,
                    };
                }
            },
            ToolKind::Text => {
                self.place_layer(LayerContent::Text(TextContent::default()), local);
            }
            ToolKind::Shape => {
                let content = LayerContent::Shape(self.tool_settings.shape_content());
                self.place_layer(content, local);
            }
            ToolKind::Image => {}
            ToolKind::Pen | ToolKind::Marker | ToolKind::Eraser | ToolKind::Line | ToolKind::Curve => {
                self.begin_drawing(position)
            }
        }
    }

    fn begin_drag(&mut self, position: Point) {
        let grabs = self
            .selection
            .ids()
            .iter()
            .filter_map(|&id| self.scene.get(id))
            .map(|layer| {
                let start = layer.geometry.origin();
                let client_top_left = self.canvas_origin + start.to_vec2();
                DragGrab {
                    layer: layer.id(),
                    offset: position - client_top_left,
                    start,
                }
            })
            .collect();
        self.state = InteractionState::Dragging { grabs };
    }

    fn begin_drawing(&mut self, position: Point) {
        let target = self.draw_target();
        let point = self.surface_point(target, position);
        match self.surfaces.surface_for(target, &self.scene) {
            Ok(surface) => {
                self.drawing.begin(self.tool, target, surface, point);
                self.state = InteractionState::Drawing;
            }
            Err(err) => log::warn!("Cannot draw: {err}"),
        }
    }

    fn pointer_move(&mut self, position: Point) {
        if self.state == InteractionState::Drawing {
            self.extend_drawing(position);
            return;
        }
        let local = client_to_local(position, self.canvas_origin);
        match &mut self.state {
            InteractionState::Idle | InteractionState::Drawing => {}
            InteractionState::Dragging { grabs } => {
                for grab in grabs.iter() {
                    let Some(layer) = self.scene.get_mut(grab.layer) else {
                        continue;
                    };
                    layer.geometry.left = position.x - self.canvas_origin.x - grab.offset.x;
                    layer.geometry.top = position.y - self.canvas_origin.y - grab.offset.y;
                    if let Err(err) = self.surfaces.sync_layer(grab.layer, &layer.geometry) {
                        log::warn!("Layer surface resync failed: {err}");
                    }
                }
            }
            InteractionState::Resizing { layer: id } => {
                let id = *id;
                let min = self.config.min_layer_size;
                if let Some(layer) = self.scene.get_mut(id) {
                    let size = resized_box(layer.geometry.origin(), local, min);
                    layer.geometry = layer.geometry.with_size(size);
                    if let Err(err) = self.surfaces.sync_layer(id, &layer.geometry) {
                        log::warn!("Layer surface resync failed: {err}");
                    }
                }
            }
            InteractionState::MarqueeSelecting { current, .. } => *current = local,
        }
    }

    fn extend_drawing(&mut self, position: Point) {
        let Some(target) = self.drawing.target() else {
            return;
        };
        let point = self.surface_point(target, position);
        match self.surfaces.surface_for(target, &self.scene) {
            Ok(surface) => self
                .drawing
                .extend(surface, point, &self.tool_settings, &self.config),
            Err(err) => log::warn!("Cannot draw: {err}"),
        }
    }

    fn pointer_up(&mut self, position: Point) {
        if let InteractionState::MarqueeSelecting { anchor, .. } = self.state {
            let current = client_to_local(position, self.canvas_origin);
            let rect = normalized_rect(anchor, current);
            let hits = self.scene.layers_intersecting(rect);
            log::debug!("Marquee selected {} layers", hits.len());
            self.selection.set(hits);
        }
        self.release();
    }

    /// Return to `Idle` from any state. An in-flight drawing gesture ends as
    /// on pointer-up; an unfinished marquee selects nothing.
    fn release(&mut self) {
        if self.state == InteractionState::Drawing {
            self.drawing.end();
        }
        self.state = InteractionState::Idle;
    }

    fn key_down(&mut self, key: &str, modifiers: Modifiers) {
        if key == "Delete" {
            self.delete_selection();
        } else if modifiers.command() && key.eq_ignore_ascii_case("c") {
            self.copy_selection();
        } else if modifiers.command() && key.eq_ignore_ascii_case("v") {
            self.paste_clipboard();
        }
    }

    /// The surface drawing tools paint on right now.
    pub fn draw_target(&self) -> DrawTarget {
        match self.selection.primary() {
            Some(id) if self.tool_settings.draw_on_selection => DrawTarget::Layer(id),
            _ => DrawTarget::Canvas,
        }
    }

    /// Client point in the coordinate space of `target`.
    fn surface_point(&self, target: DrawTarget, client: Point) -> Point {
        let local = client_to_local(client, self.canvas_origin);
        match target {
            DrawTarget::Layer(id) => match self.scene.get(id) {
                Some(layer) => canvas_to_box_local(local, layer.bounds(), layer.rotation),
                None => local,
            },
            DrawTarget::Canvas => local,
        }
    }

    /// Add a layer with the default box and make it the sole selection.
    pub fn create_layer(&mut self, content: LayerContent) -> LayerId {
        let id = self.scene.create_layer(content, self.config.default_layer);
        self.selection.replace(id);
        id
    }

    /// Add a layer whose top-left sits at `local` and make it the sole selection.
    pub fn place_layer(&mut self, content: LayerContent, local: Point) -> LayerId {
        let geometry = self.config.default_layer.with_origin(local);
        let id = self.scene.create_layer(content, geometry);
        self.selection.replace(id);
        id
    }

    /// Create an image layer for a picked file. The source is usually empty
    /// until [`complete_image_load`](Self::complete_image_load) runs.
    pub fn place_image(&mut self, source: ImageSource) -> LayerId {
        let geometry = self
            .config
            .default_layer
            .with_size(self.config.image_layer_size);
        let id = self
            .scene
            .create_layer(LayerContent::Image(ImageContent::new(source)), geometry);
        self.selection.replace(id);
        id
    }

    /// Fill in an image layer once its file read finishes. A failed read leaves
    /// the layer without a source.
    pub fn complete_image_load(
        &mut self,
        id: LayerId,
        result: Result<ImageSource, ImageSourceError>,
    ) -> bool {
        let Some(image) = self.scene.get_mut(id).and_then(Layer::as_image_mut) else {
            log::debug!("Image load finished for missing layer {id}");
            return false;
        };
        match result {
            Ok(source) => {
                image.source = source;
                true
            }
            Err(err) => {
                log::warn!("Image read for layer {id} failed: {err}");
                false
            }
        }
    }

    /// Remove a layer with everything that refers to it.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let layer = self.scene.remove(id)?;
        self.selection.remove(id);
        self.surfaces.remove_layer(id);
        let interrupted = match &mut self.state {
            InteractionState::Dragging { grabs } => {
                grabs.retain(|grab| grab.layer != id);
                false
            }
            InteractionState::Resizing { layer } => *layer == id,
            InteractionState::Drawing => self.drawing.target() == Some(DrawTarget::Layer(id)),
            _ => false,
        };
        if interrupted {
            self.release();
        }
        Some(layer)
    }

    /// Delete every selected layer. Returns how many were removed.
    pub fn delete_selection(&mut self) -> usize {
        let ids = self.selection.ids().to_vec();
        ids.into_iter()
            .filter_map(|id| self.remove_layer(id))
            .count()
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.selection
            .primary()
            .is_some_and(|id| self.scene.bring_to_front(id))
    }

    pub fn send_to_back(&mut self) -> bool {
        self.selection
            .primary()
            .is_some_and(|id| self.scene.send_to_back(id))
    }

    /// Copy the selection to the session clipboard. Returns the number of
    /// layers copied.
    pub fn copy_selection(&mut self) -> usize {
        match clipboard::copy_selection(
            &self.scene,
            &self.selection,
            self.session.as_mut(),
            &self.config.clipboard_key,
        ) {
            Ok(count) => count,
            Err(err) => {
                log::warn!("Copy failed: {err}");
                0
            }
        }
    }

    /// Paste the session clipboard and select the pasted layers. An absent or
    /// unreadable clipboard pastes nothing.
    pub fn paste_clipboard(&mut self) -> Vec<LayerId> {
        match clipboard::paste(
            &mut self.scene,
            self.session.as_ref(),
            &self.config.clipboard_key,
            self.config.paste_offset,
        ) {
            Ok(ids) => {
                if !ids.is_empty() {
                    self.selection.set(ids.iter().copied());
                }
                ids
            }
            Err(err) => {
                log::debug!("Nothing pasted: {err}");
                Vec::new()
            }
        }
    }

    /// Apply a property-panel command to the primary selection, or to the
    /// scene for background and z-order commands.
    pub fn apply(&mut self, command: InspectorCommand) {
        match command {
            InspectorCommand::Background(hex) => match Color::from_hex(&hex) {
                Some(color) => self.scene.background = color,
                None => log::debug!("Ignoring background color {hex:?}"),
            },
            InspectorCommand::BringToFront => {
                self.bring_to_front();
            }
            InspectorCommand::SendToBack => {
                self.send_to_back();
            }
            InspectorCommand::Delete => {
                self.delete_selection();
            }
            command => {
                let Some(id) = self.selection.primary() else {
                    return;
                };
                let Some(layer) = self.scene.get_mut(id) else {
                    return;
                };
                if apply_to_layer(layer, &command) == Applied::Geometry {
                    if let Err(err) = self.surfaces.sync_layer(id, &layer.geometry) {
                        log::warn!("Layer surface resync failed: {err}");
                    }
                }
            }
        }
    }

    pub fn layer_geometry(&self, id: LayerId) -> Option<LayerGeometry> {
        self.scene.get(id).map(|layer| layer.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{ShapeContent, ShapePreset};

    const ORIGIN: Point = Point::new(100.0, 50.0);

    fn editor() -> Editor {
        let mut editor = Editor::new(EditorConfig::default(), Size::new(800.0, 600.0)).unwrap();
        editor.set_canvas_origin(ORIGIN);
        editor
    }

    /// Client position of a canvas-local point.
    fn client(x: f64, y: f64) -> Point {
        ORIGIN + Vec2::new(x, y)
    }

    fn down(editor: &mut Editor, x: f64, y: f64, target: PointerTarget) {
        editor.handle_event(EditorEvent::PointerDown {
            position: client(x, y),
            target,
            modifiers: Modifiers::default(),
        });
    }

    fn ctrl_down(editor: &mut Editor, x: f64, y: f64, target: PointerTarget) {
        editor.handle_event(EditorEvent::PointerDown {
            position: client(x, y),
            target,
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        });
    }

    fn move_to(editor: &mut Editor, x: f64, y: f64) {
        editor.handle_event(EditorEvent::PointerMove {
            position: client(x, y),
        });
    }

    fn up(editor: &mut Editor, x: f64, y: f64) {
        editor.handle_event(EditorEvent::PointerUp {
            position: client(x, y),
        });
    }

    fn key(editor: &mut Editor, key: &str, command: bool) {
        editor.handle_event(EditorEvent::KeyDown {
            key: key.to_string(),
            modifiers: Modifiers {
                ctrl: command,
                ..Modifiers::default()
            },
        });
    }

    fn shape_at(editor: &mut Editor, left: f64, top: f64, width: f64, height: f64) -> LayerId {
        let id = editor.create_layer(LayerContent::Shape(ShapeContent::default()));
        editor.scene.get_mut(id).unwrap().geometry = LayerGeometry::new(left, top, width, height);
        id
    }

    fn assert_selection_subset(editor: &Editor) {
        for id in editor.selection().ids() {
            assert!(editor.scene().contains(*id), "selected layer {id} is not in the scene");
        }
    }

    #[test]
    fn test_create_layer_defaults() {
        let mut editor = editor();
        let id = editor.create_layer(LayerContent::Text(TextContent::default()));
        let layer = editor.scene().get(id).unwrap();
        assert_eq!(layer.geometry, LayerGeometry::new(80.0, 80.0, 200.0, 120.0));
        assert_eq!(layer.z_index, 5);
        assert_eq!(editor.selection().ids(), &[id]);
    }

    #[test]
    fn test_click_selects_and_drag_moves() {
        let mut editor = editor();
        let id = shape_at(&mut editor, 80.0, 80.0, 200.0, 120.0);
        editor.selection.clear();

        down(&mut editor, 100.0, 90.0, PointerTarget::Layer(id));
        assert_eq!(editor.selection().ids(), &[id]);
        assert!(matches!(editor.state(), InteractionState::Dragging { .. }));

        move_to(&mut editor, 150.0, 140.0);
        up(&mut editor, 150.0, 140.0);
        let geometry = editor.layer_geometry(id).unwrap();
        assert!((geometry.left - 130.0).abs() < f64::EPSILON);
        assert!((geometry.top - 130.0).abs() < f64::EPSILON);
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_drag_moves_every_selected_layer() {
        let mut editor = editor();
        let a = shape_at(&mut editor, 0.0, 0.0, 50.0, 50.0);
        let b = shape_at(&mut editor, 300.0, 200.0, 50.0, 50.0);

        down(&mut editor, 310.0, 210.0, PointerTarget::Layer(b));
        up(&mut editor, 310.0, 210.0);
        ctrl_down(&mut editor, 10.0, 10.0, PointerTarget::Layer(a));
        assert_eq!(editor.selection().ids(), &[b, a]);
        move_to(&mut editor, 30.0, -10.0);
        up(&mut editor, 30.0, -10.0);

        let ga = editor.layer_geometry(a).unwrap();
        let gb = editor.layer_geometry(b).unwrap();
        assert_eq!((ga.left, ga.top), (20.0, -20.0));
        assert_eq!((gb.left, gb.top), (320.0, 180.0));
    }

    #[test]
    fn test_ctrl_click_toggles_and_updates_primary() {
        let mut editor = editor();
        let a = shape_at(&mut editor, 0.0, 0.0, 50.0, 50.0);
        let b = shape_at(&mut editor, 100.0, 0.0, 50.0, 50.0);
        editor.selection.replace(a);
        ctrl_down(&mut editor, 110.0, 10.0, PointerTarget::Layer(b));
        up(&mut editor, 110.0, 10.0);
        assert_eq!(editor.selection().ids(), &[a, b]);
        ctrl_down(&mut editor, 10.0, 10.0, PointerTarget::Layer(a));
        up(&mut editor, 10.0, 10.0);
        assert_eq!(editor.selection().primary(), Some(b));
    }

    #[test]
    fn test_marquee_selects_strictly_overlapping_layers() {
        let mut editor = editor();
        let outside = shape_at(&mut editor, 400.0, 400.0, 50.0, 50.0);
        let partial = shape_at(&mut editor, 180.0, 180.0, 100.0, 100.0);
        let contained = shape_at(&mut editor, 20.0, 20.0, 40.0, 40.0);
        let touching = shape_at(&mut editor, 200.0, 0.0, 40.0, 40.0);
        editor.selection.replace(outside);

        down(&mut editor, 200.0, 200.0, PointerTarget::Canvas);
        assert!(editor.selection().is_empty());
        move_to(&mut editor, 0.0, 0.0);
        assert_eq!(editor.marquee_rect(), Some(Rect::new(0.0, 0.0, 200.0, 200.0)));
        up(&mut editor, 0.0, 0.0);

        let selected = editor.selection().ids();
        assert!(selected.contains(&partial));
        assert!(selected.contains(&contained));
        assert!(!selected.contains(&outside));
        assert!(!selected.contains(&touching));
        assert_eq!(editor.marquee_rect(), None);
    }

    #[test]
    fn test_resize_floors_to_minimum() {
        let mut editor = editor();
        let id = shape_at(&mut editor, 80.0, 80.0, 200.0, 120.0);

        down(&mut editor, 280.0, 200.0, PointerTarget::ResizeHandle(id));
        assert_eq!(editor.state(), &InteractionState::Resizing { layer: id });
        move_to(&mut editor, 380.0, 260.0);
        let g = editor.layer_geometry(id).unwrap();
        assert_eq!((g.width, g.height), (300.0, 180.0));

        // Pointer above and to the left of the layer's origin.
        move_to(&mut editor, 20.0, 10.0);
        let g = editor.layer_geometry(id).unwrap();
        assert_eq!((g.width, g.height), (40.0, 30.0));
        assert_eq!((g.left, g.top), (80.0, 80.0));
        up(&mut editor, 20.0, 10.0);
    }

    #[test]
    fn test_resize_resyncs_layer_surface() {
        let mut editor = editor();
        editor.tool_settings.draw_on_selection = true;
        let id = shape_at(&mut editor, 0.0, 0.0, 100.0, 100.0);
        editor.set_tool(ToolKind::Pen);
        down(&mut editor, 10.0, 10.0, PointerTarget::Layer(id));
        up(&mut editor, 10.0, 10.0);
        assert_eq!(editor.surfaces().layer(id).unwrap().pixel_width(), 100);

        down(&mut editor, 100.0, 100.0, PointerTarget::ResizeHandle(id));
        move_to(&mut editor, 150.0, 60.0);
        let surface = editor.surfaces().layer(id).unwrap();
        assert_eq!((surface.pixel_width(), surface.pixel_height()), (150, 60));
    }

    #[test]
    fn test_copy_paste_via_keys() {
        let mut editor = editor();
        let a = shape_at(&mut editor, 10.0, 10.0, 50.0, 50.0);
        let b = shape_at(&mut editor, 100.0, 100.0, 50.0, 50.0);
        editor.selection.set([a, b]);
        let max_before = editor.scene().max_z().unwrap();

        key(&mut editor, "c", true);
        key(&mut editor, "v", true);

        let pasted = editor.selection().ids().to_vec();
        assert_eq!(pasted.len(), 2);
        assert!(!pasted.contains(&a) && !pasted.contains(&b));
        let first = editor.scene().get(pasted[0]).unwrap();
        let second = editor.scene().get(pasted[1]).unwrap();
        assert_eq!((first.geometry.left, first.geometry.top), (30.0, 30.0));
        assert_eq!((second.geometry.left, second.geometry.top), (120.0, 120.0));
        assert!(first.z_index > max_before);
        assert!(second.z_index > max_before);
        assert_eq!(editor.scene().len(), 4);
    }

    #[test]
    fn test_paste_without_clipboard_is_noop() {
        let mut editor = editor();
        let a = shape_at(&mut editor, 10.0, 10.0, 50.0, 50.0);
        key(&mut editor, "v", true);
        assert_eq!(editor.scene().len(), 1);
        assert_eq!(editor.selection().ids(), &[a]);
    }

    #[test]
    fn test_paste_malformed_clipboard_is_noop() {
        let mut store = MemorySessionStore::new();
        store.set("postdeck_clipboard", "<div class=\"layer\"></div>".to_string());
        let mut editor = Editor::with_session_store(
            EditorConfig::default(),
            Size::new(800.0, 600.0),
            Box::new(store),
        )
        .unwrap();
        assert!(editor.paste_clipboard().is_empty());
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_text_round_trips_through_clipboard() {
        let mut editor = editor();
        let id = editor.create_layer(LayerContent::Text(TextContent::new("Sale")));
        editor.apply(InspectorCommand::FontSize(96.0));
        editor.apply(InspectorCommand::FontFamily("Bebas Neue".into()));
        editor.apply(InspectorCommand::TextColor("#f97316".into()));
        editor.copy_selection();
        let pasted = editor.paste_clipboard();

        let original = editor.scene().get(id).unwrap().as_text().unwrap().clone();
        let copy = editor.scene().get(pasted[0]).unwrap().as_text().unwrap();
        assert_eq!(copy.text, "Sale");
        assert!((copy.font_size - 96.0).abs() < f64::EPSILON);
        assert_eq!(copy.font_family, "Bebas Neue");
        assert_eq!(copy.color, Color::rgb(0xf9, 0x73, 0x16));
        assert_eq!(*copy, original);
    }

    #[test]
    fn test_delete_key_keeps_selection_subset() {
        let mut editor = editor();
        let a = shape_at(&mut editor, 0.0, 0.0, 50.0, 50.0);
        let b = shape_at(&mut editor, 100.0, 0.0, 50.0, 50.0);
        let c = shape_at(&mut editor, 200.0, 0.0, 50.0, 50.0);
        editor.selection.set([a, c]);
        key(&mut editor, "Delete", false);
        assert_eq!(editor.scene().ids(), &[b]);
        assert!(editor.selection().is_empty());
        assert_selection_subset(&editor);

        editor.selection.replace(b);
        editor.remove_layer(b);
        assert!(editor.selection().is_empty());
        assert_selection_subset(&editor);
    }

    #[test]
    fn test_selection_stays_subset_across_operations() {
        let mut editor = editor();
        let a = shape_at(&mut editor, 0.0, 0.0, 50.0, 50.0);
        let _b = shape_at(&mut editor, 60.0, 0.0, 50.0, 50.0);
        editor.copy_selection();
        editor.paste_clipboard();
        assert_selection_subset(&editor);

        down(&mut editor, 0.0, 0.0, PointerTarget::Canvas);
        move_to(&mut editor, 500.0, 500.0);
        up(&mut editor, 500.0, 500.0);
        assert_eq!(editor.selection().len(), 3);
        editor.remove_layer(a);
        assert_selection_subset(&editor);
        editor.apply(InspectorCommand::Delete);
        assert!(editor.scene().is_empty());
        assert_selection_subset(&editor);
    }

    #[test]
    fn test_text_tool_places_at_pointer() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Text);
        down(&mut editor, 300.0, 220.0, PointerTarget::Canvas);
        up(&mut editor, 300.0, 220.0);
        let id = editor.selection().primary().unwrap();
        let layer = editor.scene().get(id).unwrap();
        assert_eq!((layer.geometry.left, layer.geometry.top), (300.0, 220.0));
        assert_eq!(layer.as_text().unwrap().text, "New Text");
    }

    #[test]
    fn test_shape_tool_uses_tool_settings() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Shape);
        editor.tool_settings.shape_preset = ShapePreset::Heart;
        editor.tool_settings.fill_color = Color::rgb(239, 68, 68);
        editor.tool_settings.stroke_width = 5.0;
        down(&mut editor, 40.0, 60.0, PointerTarget::Canvas);
        let id = editor.selection().primary().unwrap();
        let shape = editor.scene().get(id).unwrap().as_shape().unwrap();
        assert_eq!(shape.preset, ShapePreset::Heart);
        assert_eq!(shape.fill_color, Color::rgb(239, 68, 68));
        assert!((shape.stroke_width - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_image_placement_and_load() {
        let mut editor = editor();
        let id = editor.place_image(ImageSource::empty());
        let layer = editor.scene().get(id).unwrap();
        assert_eq!((layer.geometry.width, layer.geometry.height), (260.0, 200.0));

        assert!(!editor.complete_image_load(id, Err(ImageSourceError::Read("aborted".into()))));
        assert!(editor.scene().get(id).unwrap().as_image().unwrap().source.is_empty());

        let source = ImageSource::from_bytes("image/png", &[0x89, 0x50, 0x4E, 0x47]);
        assert!(editor.complete_image_load(id, Ok(source.clone())));
        assert_eq!(editor.scene().get(id).unwrap().as_image().unwrap().source, source);
    }

    #[test]
    fn test_image_inspector_resize() {
        let mut editor = editor();
        let id = editor.place_image(ImageSource::empty());
        editor.apply(InspectorCommand::ImageWidth(0.0));
        editor.apply(InspectorCommand::ImageHeight(150.0));
        let g = editor.layer_geometry(id).unwrap();
        assert_eq!((g.width, g.height), (260.0, 150.0));
        assert_eq!(editor.inspector().unwrap().image_height, Some(150.0));
    }

    #[test]
    fn test_line_tool_leaves_single_stroke() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Line);
        editor.tool_settings.stroke_width = 4.0;
        down(&mut editor, 10.0, 10.0, PointerTarget::Canvas);
        assert_eq!(editor.state(), &InteractionState::Drawing);
        for x in [100.0, 200.0, 300.0] {
            move_to(&mut editor, x, 10.0 + x);
        }
        move_to(&mut editor, 400.0, 10.0);
        up(&mut editor, 400.0, 10.0);

        let canvas = editor.surfaces().canvas();
        assert!(canvas.pixel(200, 10).unwrap().a > 0);
        assert_eq!(canvas.pixel(100, 110).unwrap().a, 0);
        assert_eq!(canvas.pixel(300, 310).unwrap().a, 0);
    }

    #[test]
    fn test_draw_on_selection_uses_layer_local_space() {
        let mut editor = editor();
        let id = shape_at(&mut editor, 200.0, 100.0, 100.0, 100.0);
        editor.tool_settings.draw_on_selection = true;
        editor.set_tool(ToolKind::Pen);
        down(&mut editor, 210.0, 150.0, PointerTarget::Layer(id));
        move_to(&mut editor, 290.0, 150.0);
        up(&mut editor, 290.0, 150.0);

        let surface = editor.surfaces().layer(id).unwrap();
        assert!(surface.pixel(50, 50).unwrap().a > 0);
        assert!(editor.surfaces().canvas().is_blank());
    }

    #[test]
    fn test_pointer_cancel_and_blur_release() {
        let mut editor = editor();
        let id = shape_at(&mut editor, 0.0, 0.0, 50.0, 50.0);
        down(&mut editor, 10.0, 10.0, PointerTarget::Layer(id));
        editor.handle_event(EditorEvent::WindowBlur);
        assert_eq!(editor.state(), &InteractionState::Idle);
        // Moves after the lost release do nothing.
        move_to(&mut editor, 300.0, 300.0);
        assert_eq!(editor.layer_geometry(id).unwrap().left, 0.0);

        editor.set_tool(ToolKind::Pen);
        down(&mut editor, 100.0, 100.0, PointerTarget::Canvas);
        editor.handle_event(EditorEvent::PointerCancel);
        assert_eq!(editor.state(), &InteractionState::Idle);
        move_to(&mut editor, 200.0, 100.0);
        assert!(editor.surfaces().canvas().is_blank());
    }

    #[test]
    fn test_z_order_commands() {
        let mut editor = editor();
        let a = shape_at(&mut editor, 0.0, 0.0, 50.0, 50.0);
        let b = shape_at(&mut editor, 0.0, 0.0, 50.0, 50.0);
        editor.selection.replace(a);
        editor.apply(InspectorCommand::BringToFront);
        assert_eq!(editor.scene().layers_ordered().last().unwrap().id(), a);
        editor.selection.replace(b);
        editor.apply(InspectorCommand::SendToBack);
        assert_eq!(editor.scene().layers_ordered()[0].id(), b);
    }

    #[test]
    fn test_background_command() {
        let mut editor = editor();
        assert_eq!(editor.scene().background, Color::rgb(0x11, 0x18, 0x27));
        editor.apply(InspectorCommand::Background("#ffffff".into()));
        assert_eq!(editor.scene().background, Color::white());
        editor.apply(InspectorCommand::Background("white".into()));
        assert_eq!(editor.scene().background, Color::white());
    }

    #[test]
    fn test_viewport_resize_ends_line_gesture() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Line);
        editor.tool_settings.stroke_width = 4.0;
        down(&mut editor, 10.0, 100.0, PointerTarget::Canvas);
        move_to(&mut editor, 390.0, 100.0);
        editor.resize_viewport(Size::new(800.0, 600.0), 2.0).unwrap();
        assert_eq!(editor.state(), &InteractionState::Idle);

        // Later moves cannot stack a second preview on the rescaled one.
        move_to(&mut editor, 390.0, 300.0);
        up(&mut editor, 390.0, 300.0);
        let canvas = editor.surfaces().canvas();
        assert_eq!(canvas.pixel_width(), 1600);
        assert!(canvas.pixel(400, 200).unwrap().a > 0);
        assert_eq!(canvas.pixel(780, 600).unwrap().a, 0);
    }

    #[test]
    fn test_viewport_resize_keeps_drawing() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Pen);
        editor.tool_settings.brush_size = 10.0;
        down(&mut editor, 0.0, 100.0, PointerTarget::Canvas);
        move_to(&mut editor, 800.0, 100.0);
        up(&mut editor, 800.0, 100.0);
        editor.resize_viewport(Size::new(400.0, 300.0), 1.0).unwrap();
        let canvas = editor.surfaces().canvas();
        assert_eq!(canvas.pixel_width(), 400);
        assert!(canvas.pixel(200, 50).unwrap().a > 0);
    }
}
