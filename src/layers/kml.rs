//! KML overlays
//!
//! Each KML document the host lists becomes its own vector layer. Documents
//! are loaded once when displayed; a document that cannot be read or parsed
//! still gets an (empty) layer, the same outcome as a failed fetch.

use crate::{
    core::{config::SessionOptions, geo::Projection},
    layers::{
        base::{LayerProperties, LayerType},
        manager::LayerManager,
        vector::{Feature, FeatureStyle, VectorLayer},
    },
    MapError, Result,
};
use geo::MapCoords;
use geo_types::Geometry;
use kml::Kml;
use std::path::PathBuf;

/// Z-index of the first KML layer; later documents stack above it
const KML_BASE_Z_INDEX: i32 = 10;

/// Fetches the text of a KML document
pub trait KmlLoader {
    fn load(&self, url: &str) -> Result<String>;
}

/// Reads `file://` URLs from the local filesystem
#[derive(Debug, Default, Clone)]
pub struct FileKmlLoader;

impl KmlLoader for FileKmlLoader {
    fn load(&self, url: &str) -> Result<String> {
        let path = url
            .strip_prefix("file://")
            .map(PathBuf::from)
            .ok_or_else(|| MapError::Kml(format!("unsupported KML location: {}", url)))?;
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Location of a KML document on the device
pub fn kml_url(options: &SessionOptions, name: &str) -> String {
    format!("{}/{}", options.kml_url(), name)
}

/// Parses a KML document into features in the map projection. KML
/// coordinates are always WGS84 longitude/latitude. A placemark's `name` and
/// `description` become feature properties; multi-geometries are split into
/// one feature per part.
pub fn parse_kml_features(text: &str, map_projection: Projection) -> Result<Vec<Feature>> {
    let document: Kml<f64> = text.parse().map_err(|e: kml::Error| MapError::Kml(e.to_string()))?;
    let mut placemarks = Vec::new();
    collect_placemarks(document, &mut placemarks)?;

    Ok(placemarks
        .into_iter()
        .map(|placemark| {
            let projected: Geometry<f64> = placemark.geometry.map_coords(move |c| {
                Projection::transform(c.into(), Projection::Geographic, map_projection).into()
            });
            let style = match projected {
                Geometry::LineString(_) | Geometry::MultiLineString(_) => FeatureStyle::line_thick(),
                _ => FeatureStyle::default(),
            };
            let mut feature = Feature::new(projected, style);
            if let Some(name) = placemark.name {
                feature = feature.with_property("name", name);
            }
            if let Some(description) = placemark.description {
                feature = feature.with_property("description", description);
            }
            feature
        })
        .collect())
}

struct ParsedPlacemark {
    geometry: Geometry<f64>,
    name: Option<String>,
    description: Option<String>,
}

fn collect_placemarks(element: Kml<f64>, out: &mut Vec<ParsedPlacemark>) -> Result<()> {
    match element {
        Kml::KmlDocument(document) => {
            for inner in document.elements {
                collect_placemarks(inner, out)?;
            }
        }
        Kml::Document { elements, .. } | Kml::Folder { elements, .. } => {
            for inner in elements {
                collect_placemarks(inner, out)?;
            }
        }
        Kml::Placemark(placemark) => {
            let Some(geometry) = placemark.geometry else {
                return Ok(());
            };
            let geometry =
                Geometry::try_from(geometry).map_err(|e| MapError::Kml(e.to_string()))?;
            let mut parts = Vec::new();
            flatten(geometry, &mut parts);
            out.extend(parts.into_iter().map(|geometry| ParsedPlacemark {
                geometry,
                name: placemark.name.clone(),
                description: placemark.description.clone(),
            }));
        }
        // Bare geometry outside a placemark has no metadata.
        other => {
            let collection = kml::quick_collection(other).map_err(|e| MapError::Kml(e.to_string()))?;
            let mut parts = Vec::new();
            flatten(Geometry::GeometryCollection(collection), &mut parts);
            out.extend(parts.into_iter().map(|geometry| ParsedPlacemark {
                geometry,
                name: None,
                description: None,
            }));
        }
    }
    Ok(())
}

fn flatten(geometry: Geometry<f64>, out: &mut Vec<Geometry<f64>>) {
    match geometry {
        Geometry::GeometryCollection(collection) => {
            for inner in collection.0 {
                flatten(inner, out);
            }
        }
        other => out.push(other),
    }
}

/// Tracks which overlay layers hold KML documents
pub struct KmlOverlayManager {
    loader: Box<dyn KmlLoader>,
    layer_ids: Vec<String>,
    next_layer: u64,
}

impl KmlOverlayManager {
    pub fn new(loader: Box<dyn KmlLoader>) -> Self {
        Self {
            loader,
            layer_ids: Vec::new(),
            next_layer: 0,
        }
    }

    /// Loads `name` from the KML directory into a new layer. Returns the
    /// new layer's id.
    pub fn display(
        &mut self,
        name: &str,
        options: &SessionOptions,
        map_projection: Projection,
        layers: &mut LayerManager,
    ) -> Result<String> {
        let url = kml_url(options, name);
        let features = match self
            .loader
            .load(&url)
            .and_then(|text| parse_kml_features(&text, map_projection))
        {
            Ok(features) => features,
            Err(e) => {
                log::warn!("KML '{}' could not be loaded: {}", url, e);
                Vec::new()
            }
        };

        let layer_id = format!("kml.{}", self.next_layer);
        let properties = LayerProperties::new(layer_id.clone(), "KML".to_string(), LayerType::Kml)
            .with_z_index(KML_BASE_Z_INDEX + self.next_layer as i32)
            .with_popups(true);
        let mut layer = VectorLayer::new(properties);
        layer.add_features(features.into_iter().map(|f| f.with_property("source", name)));

        layers.add_layer(layer)?;
        self.next_layer += 1;
        self.layer_ids.push(layer_id.clone());
        log::debug!("KML '{}' displayed as layer '{}'", name, layer_id);
        Ok(layer_id)
    }

    /// Removes every KML layer. Returns the ids of the features that went
    /// with them.
    pub fn hide_all(&mut self, layers: &mut LayerManager) -> Vec<String> {
        let mut removed = Vec::new();
        for layer_id in self.layer_ids.drain(..) {
            if let Some(layer) = layers.remove_layer(&layer_id) {
                removed.extend(layer.feature_ids());
            }
        }
        removed
    }

    pub fn layer_ids(&self) -> &[String] {
        &self.layer_ids
    }

    pub fn len(&self) -> usize {
        self.layer_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layer_ids.is_empty()
    }
}

impl Default for KmlOverlayManager {
    fn default() -> Self {
        Self::new(Box::new(FileKmlLoader))
    }
}
