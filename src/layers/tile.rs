//! The base map layer: a TMS overlay served from local storage.

use crate::{
    core::{config::MapConfig, config::SessionOptions, viewport::MapView},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    tiles::{OfflineTileSource, TileSource, TileUrl},
};

pub struct TmsLayer {
    properties: LayerProperties,
    source: OfflineTileSource,
    /// Tiles requested by the most recent redraw
    visible_tiles: Vec<TileUrl>,
    redraw_count: u64,
}

impl TmsLayer {
    pub fn new(config: &MapConfig, options: &SessionOptions) -> Self {
        let properties =
            LayerProperties::new("tms".to_string(), "TMS Overlay".to_string(), LayerType::Tile);
        Self {
            properties,
            source: OfflineTileSource::new(config, options),
            visible_tiles: Vec::new(),
            redraw_count: 0,
        }
    }

    pub fn source(&self) -> &OfflineTileSource {
        &self.source
    }

    /// Points the layer at another map package. Takes effect on next redraw.
    pub fn set_source(&mut self, source: OfflineTileSource) {
        self.source = source;
    }

    /// Re-resolves every tile covering the view
    pub fn redraw(&mut self, view: &MapView) -> &[TileUrl] {
        let grid = self.source.grid();
        let coords = grid.tiles_covering(&view.visible_bounds(), view.zoom);
        self.visible_tiles = coords
            .into_iter()
            .map(|coord| self.source.resolve(&grid.tile_bounds(coord), coord.z))
            .collect();
        self.redraw_count += 1;
        log::debug!(
            "redraw #{} of '{}': {} tiles at zoom {}",
            self.redraw_count,
            self.source.map_name(),
            self.visible_tiles.len(),
            view.zoom
        );
        &self.visible_tiles
    }

    pub fn visible_tiles(&self) -> &[TileUrl] {
        &self.visible_tiles
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }
}

impl LayerTrait for TmsLayer {
    crate::impl_layer_trait!(TmsLayer, properties);
    crate::impl_default_options_serialization!(properties);
}
