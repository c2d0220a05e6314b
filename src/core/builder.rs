//! Session builder for fluent configuration
//!
//! Collects the options and collaborators of a `MapSession` before the first
//! host call is made.

use crate::{
    bridge::HostBridge,
    core::config::SessionOptions,
    layers::kml::{FileKmlLoader, KmlLoader},
    session::MapSession,
    Result,
};
use std::path::PathBuf;

/// Builder for creating and configuring map sessions
pub struct SessionBuilder {
    options: SessionOptions,
    /// Where KML documents are read from
    kml_loader: Box<dyn KmlLoader>,
}

impl SessionBuilder {
    /// Create a new SessionBuilder with default settings
    pub fn new() -> Self {
        Self {
            options: SessionOptions::default(),
            kml_loader: Box::new(FileKmlLoader),
        }
    }

    /// Replace all options at once
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the viewport size in pixels
    pub fn with_viewport_size(mut self, width: u32, height: u32) -> Self {
        self.options.viewport_size = (width, height);
        self
    }

    /// Set the directory map packages and KML files live under
    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.options.storage_root = root.into();
        self
    }

    pub fn with_kml_loader(mut self, loader: Box<dyn KmlLoader>) -> Self {
        self.kml_loader = loader;
        self
    }

    /// Fetch the current map from `bridge` and start the session
    pub fn init(self, bridge: Box<dyn HostBridge>) -> Result<MapSession> {
        MapSession::start(self.options, self.kml_loader, bridge)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
