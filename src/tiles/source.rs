use crate::core::{
    bounds::Bounds,
    config::{MapConfig, SessionOptions},
};
use crate::tiles::grid::{TileCoord, TileGrid};

/// Trait representing anything that can produce a tile reference for a
/// tile's bounds at a zoom level.
pub trait TileSource {
    fn resolve(&self, bounds: &Bounds, zoom: u8) -> TileUrl;
}

/// Outcome of resolving a tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileUrl {
    /// A tile inside the offline package
    Local { coord: TileCoord, url: String },
    /// The transparent placeholder
    Empty(String),
}

impl TileUrl {
    pub fn as_str(&self) -> &str {
        match self {
            TileUrl::Local { url, .. } => url,
            TileUrl::Empty(url) => url,
        }
    }

    pub fn is_empty_tile(&self) -> bool {
        matches!(self, TileUrl::Empty(_))
    }

    pub fn coord(&self) -> Option<TileCoord> {
        match self {
            TileUrl::Local { coord, .. } => Some(*coord),
            TileUrl::Empty(_) => None,
        }
    }
}

/// Resolves tiles against a map package on local storage, laid out as
/// `<maps>/<map name>/<layer>/<z>/<x>/<y>.<ext>`.
#[derive(Debug, Clone)]
pub struct OfflineTileSource {
    grid: TileGrid,
    map_name: String,
    extent: Bounds,
    min_zoom: u8,
    max_zoom: u8,
    maps_url: String,
    layer_name: String,
    format: String,
    empty_tile_url: String,
}

impl OfflineTileSource {
    pub fn new(config: &MapConfig, options: &SessionOptions) -> Self {
        Self {
            grid: TileGrid::for_projection(config.projection, options.tile_size),
            map_name: config.name.clone(),
            extent: config.extent(options.display_projection),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            maps_url: options.maps_url(),
            layer_name: options.tile_layer_name.clone(),
            format: options.tile_format.clone(),
            empty_tile_url: options.empty_tile_url.clone(),
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    /// Map extent in map projection units
    pub fn extent(&self) -> &Bounds {
        &self.extent
    }

    pub fn path_for(&self, coord: TileCoord) -> String {
        format!(
            "{}/{}/{}/{}/{}/{}.{}",
            self.maps_url, self.map_name, self.layer_name, coord.z, coord.x, coord.y, self.format
        )
    }

    /// Resolves a tile by its address rather than its bounds
    pub fn resolve_coord(&self, coord: TileCoord) -> TileUrl {
        self.resolve(&self.grid.tile_bounds(coord), coord.z)
    }
}

impl TileSource for OfflineTileSource {
    fn resolve(&self, bounds: &Bounds, zoom: u8) -> TileUrl {
        let coord = self.grid.tile_for_bounds(bounds, zoom);
        let in_zoom = zoom >= self.min_zoom && zoom <= self.max_zoom;
        if in_zoom && self.extent.intersects(bounds) {
            TileUrl::Local {
                coord,
                url: self.path_for(coord),
            }
        } else {
            log::debug!(
                "tile {:?} outside package '{}' (zoom range {}..={})",
                coord,
                self.map_name,
                self.min_zoom,
                self.max_zoom
            );
            TileUrl::Empty(self.empty_tile_url.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Projection;

    fn config() -> MapConfig {
        MapConfig {
            name: "moffett".into(),
            projection: Projection::WebMercator,
            min_x: 37.40,
            max_x: 37.42,
            min_y: -122.07,
            max_y: -122.04,
            min_zoom: 12,
            max_zoom: 17,
        }
    }

    #[test]
    fn test_tile_inside_package_resolves_to_local_path() {
        let source = OfflineTileSource::new(&config(), &SessionOptions::default());
        let center = source.extent().center();
        let grid = source.grid().clone();
        let coord = grid.tiles_covering(&Bounds::new(center, center), 14)[0];
        let url = source.resolve(&grid.tile_bounds(coord), 14);
        assert_eq!(
            url.as_str(),
            format!(
                "file:///sdcard/trailscribe/maps/moffett/tiles/14/{}/{}.png",
                coord.x, coord.y
            )
        );
        assert_eq!(url.coord(), Some(coord));
    }

    #[test]
    fn test_zoom_outside_range_is_empty() {
        let source = OfflineTileSource::new(&config(), &SessionOptions::default());
        let center = source.extent().center();
        for zoom in [11, 18] {
            let coord = source.grid().tiles_covering(&Bounds::new(center, center), zoom)[0];
            let url = source.resolve_coord(coord);
            assert!(url.is_empty_tile());
            assert_eq!(url.as_str(), "./lib/openlayers/img/none.png");
        }
    }

    #[test]
    fn test_bounds_outside_extent_is_empty() {
        let source = OfflineTileSource::new(&config(), &SessionOptions::default());
        let far = Bounds::from_coords(0.0, 0.0, 1000.0, 1000.0);
        assert!(source.resolve(&far, 14).is_empty_tile());
    }
}
