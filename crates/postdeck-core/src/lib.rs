//! PostDeck Core Library
//!
//! Platform-agnostic layer model and interaction logic for the PostDeck design
//! canvas. A view binding feeds [`EditorEvent`]s into an [`Editor`] and projects
//! its [`Scene`] and raster surfaces to the screen.

pub mod clipboard;
pub mod color;
pub mod config;
pub mod controller;
pub mod drawing;
pub mod geometry;
pub mod input;
pub mod inspector;
pub mod layers;
pub mod recipe;
pub mod scene;
pub mod selection;
pub mod surface;
pub mod templates;
pub mod timeline;
pub mod tools;

pub use clipboard::{ClipboardItem, MemorySessionStore, SessionStore};
pub use color::Color;
pub use config::EditorConfig;
pub use controller::{Editor, InteractionState};
pub use input::{EditorEvent, Modifiers, PointerTarget};
pub use inspector::{Inspector, InspectorCommand};
pub use layers::{Layer, LayerContent, LayerGeometry, LayerId, LayerKind};
pub use recipe::RecipeForm;
pub use scene::Scene;
pub use selection::Selection;
pub use surface::{DrawTarget, RasterSurface, SurfaceError, SurfaceManager};
pub use timeline::Timeline;
pub use tools::{ToolKind, ToolSettings};
