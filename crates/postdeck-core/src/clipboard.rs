//! Copy and paste of layers through a session-scoped key/value store.

use std::collections::HashMap;

use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layers::{Layer, LayerContent, LayerGeometry, LayerId};
use crate::scene::Scene;
use crate::selection::Selection;

/// Session-scoped string storage, such as a browser's `sessionStorage`.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory [`SessionStore`].
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard is empty")]
    Empty,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Layer state carried on the clipboard, without identity or placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    #[serde(default)]
    pub rotation: f64,
    pub content: LayerContent,
}

/// One copied layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardItem {
    pub layer: LayerSnapshot,
    pub geometry: LayerGeometry,
    pub z_index: i64,
}

impl ClipboardItem {
    pub fn from_layer(layer: &Layer) -> Self {
        Self {
            layer: LayerSnapshot {
                rotation: layer.rotation,
                content: layer.content.clone(),
            },
            geometry: layer.geometry,
            z_index: layer.z_index,
        }
    }
}

pub fn encode(items: &[ClipboardItem]) -> Result<String, ClipboardError> {
    Ok(serde_json::to_string(items)?)
}

pub fn decode(raw: &str) -> Result<Vec<ClipboardItem>, ClipboardError> {
    Ok(serde_json::from_str(raw)?)
}

/// Store a snapshot of every selected layer under `key`, replacing what was
/// there. Returns the number of layers copied.
pub fn copy_selection(
    scene: &Scene,
    selection: &Selection,
    store: &mut dyn SessionStore,
    key: &str,
) -> Result<usize, ClipboardError> {
    let items: Vec<ClipboardItem> = selection
        .ids()
        .iter()
        .filter_map(|&id| scene.get(id))
        .map(ClipboardItem::from_layer)
        .collect();
    if items.is_empty() {
        return Ok(0);
    }
    store.set(key, encode(&items)?);
    Ok(items.len())
}

/// Recreate the stored layers with fresh ids, moved by `offset`, each on a
/// fresh z-index. Returns the new ids in clipboard order.
pub fn paste(
    scene: &mut Scene,
    store: &dyn SessionStore,
    key: &str,
    offset: Vec2,
) -> Result<Vec<LayerId>, ClipboardError> {
    let raw = store.get(key).ok_or(ClipboardError::Empty)?;
    let items = decode(&raw)?;
    let ids = items
        .into_iter()
        .map(|item| {
            let geometry = item
                .geometry
                .with_origin(item.geometry.origin() + offset);
            let mut layer = Layer::new(item.layer.content, geometry, item.z_index);
            layer.rotation = item.layer.rotation;
            scene.insert_layer(layer)
        })
        .collect();
    Ok(ids)
}
