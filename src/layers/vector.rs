use crate::{
    core::{bounds::Bounds, geo::Point},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    prelude::HashMap,
};
use geo::{BoundingRect, EuclideanDistance};
use geo_types::Geometry;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Symbolizer for a vector feature. Point features either draw an external
/// graphic or a filled circle; lines use the stroke fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStyle {
    pub external_graphic: Option<String>,
    pub graphic_width: Option<f32>,
    pub graphic_height: Option<f32>,
    /// Offset of the graphic's top edge from the anchor, in pixels
    pub graphic_y_offset: Option<f32>,
    pub fill_color: String,
    pub fill_opacity: f32,
    pub stroke_color: String,
    pub stroke_width: f32,
    pub stroke_opacity: f32,
    pub point_radius: f32,
    /// Clockwise rotation of the graphic in degrees
    pub rotation: f64,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self {
            external_graphic: None,
            graphic_width: None,
            graphic_height: None,
            graphic_y_offset: None,
            fill_color: "#ee9900".to_string(),
            fill_opacity: 0.4,
            stroke_color: "#ee9900".to_string(),
            stroke_width: 1.0,
            stroke_opacity: 1.0,
            point_radius: 6.0,
            rotation: 0.0,
        }
    }
}

static NAMED_STYLES: Lazy<HashMap<&'static str, FeatureStyle>> = Lazy::new(|| {
    let mut styles = HashMap::default();
    styles.insert("default", FeatureStyle::default());
    styles.insert(
        "marker_red",
        FeatureStyle {
            external_graphic: Some("./lib/openlayers/img/marker.png".to_string()),
            graphic_width: Some(21.0),
            graphic_height: Some(25.0),
            graphic_y_offset: Some(-25.0),
            fill_opacity: 1.0,
            ..FeatureStyle::default()
        },
    );
    styles.insert(
        "current_location",
        FeatureStyle {
            external_graphic: Some("./lib/openlayers/img/location_arrow.png".to_string()),
            graphic_width: Some(30.0),
            graphic_height: Some(30.0),
            fill_opacity: 1.0,
            ..FeatureStyle::default()
        },
    );
    styles.insert(
        "line_thick",
        FeatureStyle {
            stroke_color: "#0033ff".to_string(),
            stroke_width: 4.0,
            stroke_opacity: 0.8,
            ..FeatureStyle::default()
        },
    );
    styles
});

impl FeatureStyle {
    /// Looks up one of the built-in styles by name
    pub fn named(name: &str) -> Option<FeatureStyle> {
        NAMED_STYLES.get(name).cloned()
    }

    pub fn marker_red() -> FeatureStyle {
        Self::named("marker_red").unwrap_or_default()
    }

    pub fn current_location() -> FeatureStyle {
        Self::named("current_location").unwrap_or_default()
    }

    pub fn line_thick() -> FeatureStyle {
        Self::named("line_thick").unwrap_or_default()
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

/// A geometry drawn on an overlay layer, in map projection units
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: String,
    pub geometry: Geometry<f64>,
    pub style: FeatureStyle,
    pub properties: HashMap<String, String>,
}

impl Feature {
    /// Creates a detached feature; its id is assigned when a layer adopts it
    pub fn new(geometry: Geometry<f64>, style: FeatureStyle) -> Self {
        Self {
            id: String::new(),
            geometry,
            style,
            properties: HashMap::default(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.properties.get("description").map(String::as_str)
    }

    /// Bounding box of the geometry, `None` for empty geometries
    pub fn bounds(&self) -> Option<Bounds> {
        self.geometry.bounding_rect().map(Bounds::from)
    }

    /// Where a popup for this feature is anchored
    pub fn anchor(&self) -> Option<Point> {
        self.bounds().map(|b| b.center())
    }

    /// Distance from `point` to the geometry itself; zero on or inside it
    pub fn distance_to(&self, point: Point) -> f64 {
        geo_types::Point::new(point.x, point.y).euclidean_distance(&self.geometry)
    }
}

/// An overlay layer owning an ordered set of features
#[derive(Debug, Clone)]
pub struct VectorLayer {
    properties: LayerProperties,
    features: Vec<Feature>,
    next_feature: u64,
}

impl VectorLayer {
    pub fn new(properties: LayerProperties) -> Self {
        Self {
            properties,
            features: Vec::new(),
            next_feature: 0,
        }
    }

    /// Adopts `features`, assigning each an id unique within the session
    pub fn add_features(&mut self, features: impl IntoIterator<Item = Feature>) -> Vec<String> {
        let mut ids = Vec::new();
        for mut feature in features {
            feature.id = format!("{}.{}", self.properties.id, self.next_feature);
            self.next_feature += 1;
            ids.push(feature.id.clone());
            self.features.push(feature);
        }
        log::debug!(
            "layer '{}': +{} features ({} total)",
            self.properties.id,
            ids.len(),
            self.features.len()
        );
        ids
    }

    /// Drops every feature and returns their ids
    pub fn remove_all_features(&mut self) -> Vec<String> {
        let removed: Vec<String> = self.features.drain(..).map(|f| f.id).collect();
        log::debug!("layer '{}': cleared {} features", self.properties.id, removed.len());
        removed
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn feature_ids(&self) -> Vec<String> {
        self.features.iter().map(|f| f.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl LayerTrait for VectorLayer {
    crate::impl_layer_trait!(VectorLayer, properties);
    crate::impl_default_options_serialization!(properties);
}

/// Shorthand for the overlay layers created at startup
pub(crate) fn overlay(id: &str, name: &str, z_index: i32, shows_popups: bool) -> VectorLayer {
    VectorLayer::new(
        LayerProperties::new(id.to_string(), name.to_string(), LayerType::Vector)
            .with_z_index(z_index)
            .with_popups(shows_popups),
    )
}
