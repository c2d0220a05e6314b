//! # trailmap
//!
//! The map side of an offline field-mapping app. A `MapSession` resolves TMS
//! tiles from map packages on local storage, keeps the sample, location and
//! track overlays the host asks for, loads KML overlays, and shows a single
//! popup for the selected feature.
//!
//! The host talks to the session through string commands (`"DisplaySamples"`,
//! `"ChangeBaseMap"`, ...) and answers the session's data calls with JSON; see
//! [`bridge::HostBridge`].

pub mod bridge;
pub mod core;
pub mod layers;
pub mod prelude;
pub mod session;
pub mod spatial;
pub mod tiles;
pub mod ui;
#[cfg(feature = "wasm")]
pub mod wasm;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    builder::SessionBuilder,
    config::{MapConfig, SessionOptions},
    geo::{LatLng, Point, Projection},
    viewport::MapView,
};

pub use bridge::{Command, DirectoryBridge, HostBridge, Update};
pub use layers::{base::LayerTrait, manager::LayerManager, vector::VectorLayer};
pub use session::{FeatureRef, MapSession};
pub use spatial::index::SpatialIndex;
pub use tiles::{OfflineTileSource, TileSource, TileUrl};
pub use ui::popup::Popup;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),

    #[error("Invalid map config: {0}")]
    InvalidMapConfig(String),

    #[error("Bridge error: {0}")]
    Bridge(String),

    #[error("KML error: {0}")]
    Kml(String),

    #[error("Layer error: {0}")]
    Layer(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger`. `RUST_LOG` wins; otherwise `verbosity` picks the
/// level (0 info, 1 debug, 2+ trace). Calling it twice is harmless.
#[cfg(feature = "debug")]
pub fn init_logging(verbosity: u8) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_level(verbosity)),
    )
    .try_init();
}

#[cfg(feature = "debug")]
fn default_log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
