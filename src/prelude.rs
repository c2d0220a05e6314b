//! Prelude module for common trailmap types and traits
//!
//! `use trailmap::prelude::*;` brings in the session, its configuration and
//! the host bridge.

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use crate::core::{
    bounds::Bounds,
    builder::SessionBuilder,
    config::{MapConfig, SessionOptions},
    geo::{LatLng, Point, Projection},
    viewport::MapView,
};

pub use crate::layers::{
    base::{LayerTrait, LayerType},
    kml::{FileKmlLoader, KmlLoader},
    manager::LayerManager,
    vector::{Feature, FeatureStyle, VectorLayer},
};

pub use crate::bridge::{Command, DirectoryBridge, HostBridge, Update};
pub use crate::session::{FeatureRef, MapSession};
pub use crate::tiles::{TileCoord, TileSource, TileUrl};
pub use crate::ui::popup::Popup;
pub use crate::{MapError, Result};
