pub mod base;
pub mod kml;
pub mod macros;
pub mod manager;
pub mod tile;
pub mod vector;
