//! Turns host commands into session updates
//!
//! `fetch` only talks to the host and builds geometry; the session applies
//! the resulting `Update` to its view and layers.

use crate::{
    bridge::{
        command::Command,
        host::{parse_azimuth, parse_kml_names, parse_points, HostBridge, PointRecord},
    },
    core::{
        config::MapConfig,
        constants::{CURRENT_LOCATION_LAYER_ID, POSITION_HISTORY_LAYER_ID, SAMPLES_LAYER_ID},
        geo::{Point, Projection},
    },
    layers::vector::{Feature, FeatureStyle},
    MapError, Result,
};
use geo_types::{Geometry, LineString};

/// Projections the host's points are converted between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchContext {
    /// Projection the host reports points in
    pub display: Projection,
    /// Projection of the current base map
    pub map: Projection,
}

impl FetchContext {
    pub fn new(display: Projection, map: Projection) -> Self {
        Self { display, map }
    }

    fn to_map(&self, record: &PointRecord) -> Point {
        Projection::transform(record.point(), self.display, self.map)
    }
}

/// A change to apply to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    AddFeatures {
        layer_id: String,
        features: Vec<Feature>,
    },
    ClearLayer(String),
    /// KML document names to display
    ShowKml(Vec<String>),
    ClearKml,
    /// Recenter on a point in map projection
    PanTo(Point),
    ReplaceMap(MapConfig),
}

/// Performs the host calls `command` needs and converts their payloads
pub fn fetch(command: Command, bridge: &dyn HostBridge, ctx: FetchContext) -> Result<Update> {
    let update = match command {
        Command::DisplaySamples => {
            let records = parse_points(&bridge.samples()?)?;
            Update::AddFeatures {
                layer_id: SAMPLES_LAYER_ID.to_string(),
                features: point_features(&records, ctx, FeatureStyle::marker_red()),
            }
        }
        Command::HideSamples => Update::ClearLayer(SAMPLES_LAYER_ID.to_string()),
        Command::DisplayCurrentLocation => {
            let records = parse_points(&bridge.current_location()?)?;
            let azimuth = parse_azimuth(&bridge.orientation()?)?;
            Update::AddFeatures {
                layer_id: CURRENT_LOCATION_LAYER_ID.to_string(),
                features: point_features(
                    &records,
                    ctx,
                    FeatureStyle::current_location().with_rotation(azimuth),
                ),
            }
        }
        Command::HideCurrentLocation => Update::ClearLayer(CURRENT_LOCATION_LAYER_ID.to_string()),
        Command::DisplayPositionHistory => {
            let records = parse_points(&bridge.position_history()?)?;
            let track: LineString<f64> = records
                .iter()
                .map(|r| geo_types::Coord::from(ctx.to_map(r)))
                .collect();
            Update::AddFeatures {
                layer_id: POSITION_HISTORY_LAYER_ID.to_string(),
                features: vec![Feature::new(Geometry::LineString(track), FeatureStyle::line_thick())],
            }
        }
        Command::HidePositionHistory => Update::ClearLayer(POSITION_HISTORY_LAYER_ID.to_string()),
        Command::DisplayKml => Update::ShowKml(parse_kml_names(&bridge.kmls()?)?),
        Command::HideKml => Update::ClearKml,
        Command::PanToCurrentLocation => {
            let records = parse_points(&bridge.current_location()?)?;
            let first = records
                .first()
                .ok_or_else(|| MapError::Bridge("host reported no current location".into()))?;
            Update::PanTo(ctx.to_map(first))
        }
        Command::ChangeBaseMap => Update::ReplaceMap(MapConfig::from_host_json(&bridge.current_map()?)?),
    };
    Ok(update)
}

fn point_features(records: &[PointRecord], ctx: FetchContext, style: FeatureStyle) -> Vec<Feature> {
    records
        .iter()
        .map(|record| {
            let point = geo_types::Point::from(geo_types::Coord::from(ctx.to_map(record)));
            let mut feature = Feature::new(Geometry::Point(point), style.clone());
            if let Some(name) = &record.name {
                feature = feature.with_property("name", name.as_str());
            }
            if let Some(description) = &record.description {
                feature = feature.with_property("description", description.as_str());
            }
            feature
        })
        .collect()
}
