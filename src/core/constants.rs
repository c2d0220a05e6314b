//! Engine-wide defaults. Most of them mirror the on-device layout the host app
//! writes map packages into.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Half the circumference of the Web Mercator world, in metres.
pub const MERCATOR_HALF_EXTENT: f64 = 20_037_508.342_789_244;

/// Web Mercator resolution (metres per pixel) at zoom 0 for 256px tiles.
pub const MERCATOR_MAX_RESOLUTION: f64 = 156_543.033_928_040_97;

/// Geographic resolution (degrees per pixel) at zoom 0 for 256px tiles.
pub const GEOGRAPHIC_MAX_RESOLUTION: f64 = 1.40625;

/// Deepest zoom level the tile grids enumerate.
pub const MAX_GRID_ZOOM: u8 = 22;

/// Root directory the host app stores offline packages under.
pub const DEFAULT_STORAGE_ROOT: &str = "/sdcard/trailscribe";

/// Transparent placeholder returned for tiles outside the package.
pub const EMPTY_TILE_URL: &str = "./lib/openlayers/img/none.png";

/// Stable ids of the built-in overlay layers.
pub const SAMPLES_LAYER_ID: &str = "samples";
pub const CURRENT_LOCATION_LAYER_ID: &str = "current_location";
pub const POSITION_HISTORY_LAYER_ID: &str = "position_history";
