use crate::{bridge::host::HostBridge, MapError, Result};
use std::path::{Path, PathBuf};

/// A host backed by JSON files in a directory, one file per call:
/// `current_map.json`, `kmls.json`, `samples.json`,
/// `current_location.json`, `position_history.json` and `orientation.json`.
#[derive(Debug, Clone)]
pub struct DirectoryBridge {
    root: PathBuf,
}

impl DirectoryBridge {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, file: &str) -> Result<String> {
        let path = self.root.join(file);
        std::fs::read_to_string(&path).map_err(|e| {
            MapError::Bridge(format!("could not read {}: {}", path.display(), e))
        })
    }
}

impl HostBridge for DirectoryBridge {
    fn current_map(&self) -> Result<String> {
        self.read("current_map.json")
    }

    fn kmls(&self) -> Result<String> {
        self.read("kmls.json")
    }

    fn samples(&self) -> Result<String> {
        self.read("samples.json")
    }

    fn current_location(&self) -> Result<String> {
        self.read("current_location.json")
    }

    fn position_history(&self) -> Result<String> {
        self.read("position_history.json")
    }

    fn orientation(&self) -> Result<String> {
        self.read("orientation.json")
    }
}
