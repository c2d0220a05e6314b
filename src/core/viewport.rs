use crate::core::{bounds::Bounds, geo::Point};
use crate::tiles::grid::TileGrid;
use serde::{Deserialize, Serialize};

/// The current view of the map: center, zoom and screen dimensions, in the
/// map projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Center of the view in map units
    pub center: Point,
    /// Current integer zoom level
    pub zoom: u8,
    /// Size of the view in pixels
    pub size: (u32, u32),
    /// The minimum allowed zoom level
    pub min_zoom: u8,
    /// The deepest level of the grid
    pub max_zoom: u8,
    /// Area the visible region must stay within
    restricted_extent: Option<Bounds>,
    /// Map units per pixel, indexed by zoom
    resolutions: Vec<f64>,
}

impl MapView {
    pub fn new(grid: &TileGrid, size: (u32, u32)) -> Self {
        let resolutions = (0..=grid.max_zoom()).map(|z| grid.resolution(z)).collect();
        Self {
            center: grid.max_extent.center(),
            zoom: 0,
            size,
            min_zoom: 0,
            max_zoom: grid.max_zoom(),
            restricted_extent: None,
            resolutions,
        }
    }

    /// Map units per pixel at the current zoom
    pub fn resolution(&self) -> f64 {
        self.resolution_at(self.zoom)
    }

    fn resolution_at(&self, zoom: u8) -> f64 {
        let index = (zoom as usize).min(self.resolutions.len().saturating_sub(1));
        self.resolutions.get(index).copied().unwrap_or(1.0)
    }

    pub fn restricted_extent(&self) -> Option<&Bounds> {
        self.restricted_extent.as_ref()
    }

    pub fn set_restricted_extent(&mut self, extent: Option<Bounds>) {
        self.restricted_extent = extent;
        self.center = self.constrain_center(self.center);
    }

    /// Sets the minimum zoom, snapping the current zoom up to it. The
    /// maximum stays at the grid's deepest level; levels past a map's own
    /// maximum show empty tiles.
    pub fn set_min_zoom(&mut self, min_zoom: u8) {
        self.min_zoom = min_zoom.min(self.max_zoom);
        self.zoom = self.zoom.max(self.min_zoom);
    }

    /// Sets the zoom level. Zooming out past the minimum snaps back to it;
    /// zooming in stops at the grid's deepest level.
    pub fn zoom_to(&mut self, zoom: u8) {
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if zoom != self.zoom {
            log::debug!("zoom {} -> {}", self.zoom, zoom);
        }
        self.zoom = zoom;
        self.center = self.constrain_center(self.center);
    }

    /// Recenters the view on `center`, kept inside the restricted extent
    pub fn pan_to(&mut self, center: Point) {
        self.center = self.constrain_center(center);
    }

    /// Centers on `extent` at the deepest zoom that shows all of it
    pub fn zoom_to_extent(&mut self, extent: &Bounds) {
        let (w, h) = self.size;
        let needed = (extent.width() / w as f64).max(extent.height() / h as f64);
        let zoom = self
            .resolutions
            .iter()
            .rposition(|res| *res >= needed)
            .unwrap_or(0) as u8;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.center = self.constrain_center(extent.center());
    }

    /// The area currently on screen, in map units
    pub fn visible_bounds(&self) -> Bounds {
        let res = self.resolution();
        Bounds::from_center_and_size(
            self.center,
            self.size.0 as f64 * res,
            self.size.1 as f64 * res,
        )
    }

    fn constrain_center(&self, center: Point) -> Point {
        let Some(extent) = self.restricted_extent else {
            return center;
        };
        let res = self.resolution();
        let half_w = self.size.0 as f64 * res / 2.0;
        let half_h = self.size.1 as f64 * res / 2.0;
        Point::new(
            constrain_axis(center.x, extent.left(), extent.right(), half_w),
            constrain_axis(center.y, extent.bottom(), extent.top(), half_h),
        )
    }
}

fn constrain_axis(value: f64, min: f64, max: f64, half_span: f64) -> f64 {
    if max - min <= 2.0 * half_span {
        (min + max) / 2.0
    } else {
        value.clamp(min + half_span, max - half_span)
    }
}
