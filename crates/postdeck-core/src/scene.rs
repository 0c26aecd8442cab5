//! The retained scene: every layer, its paint order and the canvas background.

use std::collections::HashMap;

use kurbo::Rect;

use crate::color::Color;
use crate::geometry::boxes_overlap;
use crate::layers::{Layer, LayerContent, LayerGeometry, LayerId};

/// All layers on the canvas plus the z allocation counter.
#[derive(Debug, Clone)]
pub struct Scene {
    layers: HashMap<LayerId, Layer>,
    /// Insertion order; ties in z-index paint in this order.
    order: Vec<LayerId>,
    pub background: Color,
    next_z: i64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Scene {
    /// Create an empty scene whose first layer gets `initial_z`.
    pub fn new(initial_z: i64) -> Self {
        Self {
            layers: HashMap::new(),
            order: Vec::new(),
            background: Color::rgb(0x11, 0x18, 0x27),
            next_z: initial_z,
        }
    }

    /// Hand out the next z-index. Always above every z-index in the scene.
    pub fn allocate_z(&mut self) -> i64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Create a layer with the next z-index and append it to the scene.
    pub fn create_layer(&mut self, content: LayerContent, geometry: LayerGeometry) -> LayerId {
        let z = self.allocate_z();
        self.insert(Layer::new(content, geometry, z))
    }

    /// Add an existing layer record, assigning it the next z-index.
    pub fn insert_layer(&mut self, mut layer: Layer) -> LayerId {
        layer.z_index = self.allocate_z();
        self.insert(layer)
    }

    fn insert(&mut self, layer: Layer) -> LayerId {
        let id = layer.id();
        if self.layers.insert(id, layer).is_none() {
            self.order.push(id);
        }
        log::debug!("Layer {id} added");
        id
    }

    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let layer = self.layers.remove(&id)?;
        self.order.retain(|&other| other != id);
        Some(layer)
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.get_mut(&id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer ids in insertion order.
    pub fn ids(&self) -> &[LayerId] {
        &self.order
    }

    /// Layers in paint order: ascending z-index, ties by insertion order.
    pub fn layers_ordered(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.order.iter().filter_map(|id| self.layers.get(id)).collect();
        layers.sort_by_key(|layer| layer.z_index);
        layers
    }

    pub fn max_z(&self) -> Option<i64> {
        self.layers.values().map(|layer| layer.z_index).max()
    }

    pub fn min_z(&self) -> Option<i64> {
        self.layers.values().map(|layer| layer.z_index).min()
    }

    /// Move a layer above every other layer.
    pub fn bring_to_front(&mut self, id: LayerId) -> bool {
        let Some(max) = self.max_z() else {
            return false;
        };
        let Some(layer) = self.layers.get_mut(&id) else {
            return false;
        };
        layer.z_index = max + 1;
        self.next_z = self.next_z.max(max + 2);
        true
    }

    /// Move a layer below every other layer.
    pub fn send_to_back(&mut self, id: LayerId) -> bool {
        let Some(min) = self.min_z() else {
            return false;
        };
        let Some(layer) = self.layers.get_mut(&id) else {
            return false;
        };
        layer.z_index = min - 1;
        true
    }

    /// Ids of layers whose box strictly overlaps `rect`, in paint order.
    pub fn layers_intersecting(&self, rect: Rect) -> Vec<LayerId> {
        self.layers_ordered()
            .into_iter()
            .filter(|layer| boxes_overlap(layer.bounds(), rect))
            .map(|layer| layer.id())
            .collect()
    }
}
