use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

/// Web Mercator projection constants
const EARTH_RADIUS: f64 = 6378137.0;
const MAX_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Clamps latitude to the range Web Mercator can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Converts to Web Mercator projection (EPSG:3857)
    pub fn to_mercator(&self) -> Point {
        let x = self.lng.to_radians() * EARTH_RADIUS;
        let lat = Self::clamp_lat(self.lat);
        let y = ((PI / 4.0 + lat.to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;
        Point::new(x, y)
    }

    /// Creates LatLng from Web Mercator coordinates
    pub fn from_mercator(point: Point) -> Self {
        let lng = (point.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Self::new(lat, lng)
    }

    /// Geographic coordinates as an x/y point (x = longitude)
    pub fn to_point(&self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<geo_types::Coord<f64>> for Point {
    fn from(coord: geo_types::Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

impl From<Point> for geo_types::Coord<f64> {
    fn from(point: Point) -> Self {
        geo_types::Coord {
            x: point.x,
            y: point.y,
        }
    }
}

/// Coordinate reference systems the map can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Projection {
    /// EPSG:4326, plain longitude/latitude
    Geographic,
    /// EPSG:3857 and its legacy aliases
    WebMercator,
}

impl Projection {
    /// Canonical EPSG code
    pub fn code(&self) -> &'static str {
        match self {
            Projection::Geographic => "EPSG:4326",
            Projection::WebMercator => "EPSG:3857",
        }
    }

    /// Transforms a point between two projections
    pub fn transform(point: Point, from: Projection, to: Projection) -> Point {
        match (from, to) {
            (Projection::Geographic, Projection::WebMercator) => {
                LatLng::new(point.y, point.x).to_mercator()
            }
            (Projection::WebMercator, Projection::Geographic) => {
                LatLng::from_mercator(point).to_point()
            }
            _ => point,
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::WebMercator
    }
}

impl FromStr for Projection {
    type Err = MapError;

    fn from_str(code: &str) -> Result<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "EPSG:4326" | "CRS:84" => Ok(Projection::Geographic),
            "EPSG:3857" | "EPSG:900913" | "EPSG:102113" | "EPSG:102100" | "EPSG:3785" => {
                Ok(Projection::WebMercator)
            }
            _ => Err(MapError::UnsupportedProjection(code.to_string())),
        }
    }
}

impl TryFrom<String> for Projection {
    type Error = MapError;

    fn try_from(code: String) -> Result<Self> {
        code.parse()
    }
}

impl From<Projection> for String {
    fn from(projection: Projection) -> Self {
        projection.code().to_string()
    }
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
