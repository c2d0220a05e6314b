//! TMS tile grid: origin in the lower-left corner, y grows northwards.

use crate::core::{
    bounds::Bounds,
    constants::{
        GEOGRAPHIC_MAX_RESOLUTION, MAX_GRID_ZOOM, MERCATOR_HALF_EXTENT, MERCATOR_MAX_RESOLUTION,
        TILE_SIZE,
    },
    geo::{Point, Projection},
};
use serde::{Deserialize, Serialize};

/// Integer tile address. Columns and rows are signed so that tiles computed
/// from bounds left of or below the origin stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i64,
    pub y: i64,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: i64, y: i64, z: u8) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    pub projection: Projection,
    pub origin: Point,
    pub max_extent: Bounds,
    pub tile_size: u32,
    max_resolution: f64,
}

impl TileGrid {
    /// The default grid for a projection at the given tile size
    pub fn for_projection(projection: Projection, tile_size: u32) -> Self {
        let (max_extent, base_resolution) = match projection {
            Projection::WebMercator => (
                Bounds::from_coords(
                    -MERCATOR_HALF_EXTENT,
                    -MERCATOR_HALF_EXTENT,
                    MERCATOR_HALF_EXTENT,
                    MERCATOR_HALF_EXTENT,
                ),
                MERCATOR_MAX_RESOLUTION,
            ),
            Projection::Geographic => (
                Bounds::from_coords(-180.0, -90.0, 180.0, 90.0),
                GEOGRAPHIC_MAX_RESOLUTION,
            ),
        };
        // Base resolutions are quoted for 256px tiles.
        let max_resolution = base_resolution * TILE_SIZE as f64 / tile_size as f64;
        Self {
            projection,
            origin: max_extent.min,
            max_extent,
            tile_size,
            max_resolution,
        }
    }

    /// Map units per pixel at a zoom level
    pub fn resolution(&self, zoom: u8) -> f64 {
        self.max_resolution / 2_f64.powi(zoom as i32)
    }

    /// Ground span of one tile at a zoom level
    pub fn tile_span(&self, zoom: u8) -> f64 {
        self.resolution(zoom) * self.tile_size as f64
    }

    pub fn max_zoom(&self) -> u8 {
        MAX_GRID_ZOOM
    }

    /// Deepest zoom whose resolution is no finer than `resolution`
    pub fn zoom_for_resolution(&self, resolution: f64) -> u8 {
        if resolution <= 0.0 {
            return self.max_zoom();
        }
        if !resolution.is_finite() {
            return 0;
        }
        let zoom = (self.max_resolution / resolution).log2().floor();
        zoom.clamp(0.0, self.max_zoom() as f64) as u8
    }

    /// Column/row for a tile whose lower-left corner is `bounds.min`
    pub fn tile_for_bounds(&self, bounds: &Bounds, zoom: u8) -> TileCoord {
        let span = self.tile_span(zoom);
        let x = ((bounds.left() - self.origin.x) / span).round() as i64;
        let y = ((bounds.bottom() - self.origin.y) / span).round() as i64;
        TileCoord::new(x, y, zoom)
    }

    /// Bounds of a tile in map units
    pub fn tile_bounds(&self, coord: TileCoord) -> Bounds {
        let span = self.tile_span(coord.z);
        let left = self.origin.x + coord.x as f64 * span;
        let bottom = self.origin.y + coord.y as f64 * span;
        Bounds::from_coords(left, bottom, left + span, bottom + span)
    }

    /// Tiles covering `area` at `zoom`, clipped to the grid's extent
    pub fn tiles_covering(&self, area: &Bounds, zoom: u8) -> Vec<TileCoord> {
        let Some(area) = clip(area, &self.max_extent) else {
            return Vec::new();
        };
        let span = self.tile_span(zoom);
        let x0 = ((area.left() - self.origin.x) / span).floor() as i64;
        let y0 = ((area.bottom() - self.origin.y) / span).floor() as i64;
        let x1 = ((area.right() - self.origin.x) / span).ceil() as i64;
        let y1 = ((area.top() - self.origin.y) / span).ceil() as i64;

        let mut tiles = Vec::new();
        for y in y0..y1.max(y0 + 1) {
            for x in x0..x1.max(x0 + 1) {
                tiles.push(TileCoord::new(x, y, zoom));
            }
        }
        tiles
    }
}

/// A zoom level from an untyped caller, saturated at the deepest grid level
pub fn grid_zoom(zoom: u32) -> u8 {
    zoom.min(MAX_GRID_ZOOM as u32) as u8
}

fn clip(area: &Bounds, extent: &Bounds) -> Option<Bounds> {
    if !area.intersects(extent) {
        return None;
    }
    Some(Bounds::from_coords(
        area.left().max(extent.left()),
        area.bottom().max(extent.bottom()),
        area.right().min(extent.right()),
        area.top().min(extent.top()),
    ))
}
