use crate::{
    layers::{base::LayerTrait, vector::VectorLayer},
    prelude::HashMap,
    MapError, Result,
};

/// Owns the overlay layers of a map and keeps them in z-order
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, VectorLayer>,
    /// Ordered list of layer IDs, bottom to top
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer. Ids must be unique.
    pub fn add_layer(&mut self, layer: VectorLayer) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(MapError::Layer(format!("layer '{}' already exists", layer_id)));
        }
        let z_index = layer.z_index();
        self.layers.insert(layer_id.clone(), layer);

        // Insert in sorted order by z-index, after equal z-indices
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<VectorLayer> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    pub fn get(&self, layer_id: &str) -> Option<&VectorLayer> {
        self.layers.get(layer_id)
    }

    pub fn get_mut(&mut self, layer_id: &str) -> Option<&mut VectorLayer> {
        self.layers.get_mut(layer_id)
    }

    /// Layers bottom to top
    pub fn layers(&self) -> impl Iterator<Item = &VectorLayer> {
        self.render_order.iter().filter_map(|id| self.layers.get(id))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}
