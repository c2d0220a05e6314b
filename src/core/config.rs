//! Configuration for a map session
//!
//! `SessionOptions` carries deployment settings that stay fixed for the life
//! of the web view (where packages live on disk, tile format, placeholder
//! tile). `MapConfig` describes the currently selected base map and is
//! replaced wholesale whenever the host switches maps.

use crate::{
    core::{
        bounds::Bounds,
        constants::{DEFAULT_STORAGE_ROOT, EMPTY_TILE_URL, TILE_SIZE},
        geo::Projection,
    },
    MapError, Result,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    pub storage_root: PathBuf,
    pub maps_dir: String,
    pub kml_dir: String,
    pub tile_layer_name: String,
    pub tile_format: String,
    pub tile_size: u32,
    pub empty_tile_url: String,
    pub display_projection: Projection,
    pub viewport_size: (u32, u32),
    /// Hit-test radius for taps, in screen pixels
    pub click_tolerance_px: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            maps_dir: "maps".to_string(),
            kml_dir: "kmls".to_string(),
            tile_layer_name: "tiles".to_string(),
            tile_format: "png".to_string(),
            tile_size: TILE_SIZE,
            empty_tile_url: EMPTY_TILE_URL.to_string(),
            display_projection: Projection::Geographic,
            viewport_size: (TILE_SIZE, TILE_SIZE),
            click_tolerance_px: 8.0,
        }
    }
}

impl SessionOptions {
    /// Parses options from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: SessionOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(MapError::InvalidMapConfig("tile_size must be positive".into()));
        }
        if self.viewport_size.0 == 0 || self.viewport_size.1 == 0 {
            return Err(MapError::InvalidMapConfig("viewport_size must be positive".into()));
        }
        Ok(())
    }

    /// `file://` URL prefix of the map package directory
    pub fn maps_url(&self) -> String {
        format!("file://{}/{}", self.storage_root.display(), self.maps_dir)
    }

    /// `file://` URL prefix of the KML directory
    pub fn kml_url(&self) -> String {
        format!("file://{}/{}", self.storage_root.display(), self.kml_dir)
    }
}

/// The base map record as delivered by the host.
///
/// Host records keep latitude on the x axis: `min_x`/`max_x` are the southern
/// and northern edges, `min_y`/`max_y` the western and eastern edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub name: String,
    pub projection: Projection,
    #[serde(deserialize_with = "number_or_string")]
    pub min_x: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub min_y: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub max_x: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub max_y: f64,
    #[serde(rename = "minZoomLevel", deserialize_with = "number_or_string")]
    pub min_zoom: u8,
    #[serde(rename = "maxZoomLevel", deserialize_with = "number_or_string")]
    pub max_zoom: u8,
}

#[derive(Deserialize)]
struct MapEnvelope {
    map: MapConfig,
}

impl MapConfig {
    /// Parses the `{"map": {...}}` payload returned by the host
    pub fn from_host_json(json: &str) -> Result<Self> {
        let envelope: MapEnvelope = serde_json::from_str(json)?;
        envelope.map.validate()?;
        Ok(envelope.map)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MapError::InvalidMapConfig("map name is empty".into()));
        }
        if self.min_zoom > self.max_zoom {
            return Err(MapError::InvalidMapConfig(format!(
                "min zoom {} exceeds max zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !self.display_extent().is_valid() {
            return Err(MapError::InvalidMapConfig(format!(
                "map '{}' has an inverted extent",
                self.name
            )));
        }
        Ok(())
    }

    /// Extent in the display projection (longitude on x)
    pub fn display_extent(&self) -> Bounds {
        Bounds::from_coords(self.min_y, self.min_x, self.max_y, self.max_x)
    }

    /// Extent transformed into the map projection
    pub fn extent(&self, display: Projection) -> Bounds {
        self.display_extent().transform(display, self.projection)
    }
}

/// Accepts `12`, `12.5` or `"12"`.
pub(crate) fn number_or_string<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + serde::de::DeserializeOwned,
    T::Err: std::fmt::Display,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        other => T::deserialize(other).map_err(serde::de::Error::custom),
    }
}
