pub mod grid;
pub mod source;

// Re-exports for convenience
pub use grid::{grid_zoom, TileCoord, TileGrid};
pub use source::{OfflineTileSource, TileSource, TileUrl};
