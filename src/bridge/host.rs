//! The native host's data interface
//!
//! Every call is synchronous and answers with a JSON document. The payload
//! types below decode those documents.

use crate::{core::config::number_or_string, core::geo::Point, Result};
use serde::Deserialize;

/// Data calls the host application exposes to the map
pub trait HostBridge {
    /// `{"map": {...}}`
    fn current_map(&self) -> Result<String>;

    /// `{"kmls": [{"path": ...}]}`
    fn kmls(&self) -> Result<String>;

    /// `{"points": [...]}`
    fn samples(&self) -> Result<String>;

    /// `{"points": [...]}`
    fn current_location(&self) -> Result<String>;

    /// `{"points": [...]}`
    fn position_history(&self) -> Result<String>;

    /// `{"orientation": [{"azimuth": ...}]}`
    fn orientation(&self) -> Result<String>;
}

/// A point reported by the host, in the display projection
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointRecord {
    #[serde(deserialize_with = "number_or_string")]
    pub x: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub y: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PointRecord {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Deserialize)]
struct PointsPayload {
    #[serde(default)]
    points: Vec<PointRecord>,
}

#[derive(Deserialize)]
struct KmlEntry {
    path: String,
}

#[derive(Deserialize)]
struct KmlsPayload {
    #[serde(default)]
    kmls: Vec<KmlEntry>,
}

#[derive(Deserialize)]
struct OrientationEntry {
    #[serde(deserialize_with = "number_or_string")]
    azimuth: f64,
}

#[derive(Deserialize)]
struct OrientationPayload {
    #[serde(default)]
    orientation: Vec<OrientationEntry>,
}

pub fn parse_points(json: &str) -> Result<Vec<PointRecord>> {
    let payload: PointsPayload = serde_json::from_str(json)?;
    Ok(payload.points)
}

/// KML document names, in host order
pub fn parse_kml_names(json: &str) -> Result<Vec<String>> {
    let payload: KmlsPayload = serde_json::from_str(json)?;
    Ok(payload.kmls.into_iter().map(|k| k.path).collect())
}

/// The most recent azimuth in degrees, `-1.0` when the host has none
pub fn parse_azimuth(json: &str) -> Result<f64> {
    let payload: OrientationPayload = serde_json::from_str(json)?;
    Ok(payload.orientation.last().map(|o| o.azimuth).unwrap_or(-1.0))
}
