//! Pipe identity read from the pipe's YAML descriptor.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default location of the descriptor inside the pipe image.
pub const DEFAULT_METADATA_PATH: &str = "/pipe.yml";

/// Subset of `pipe.yml` the pipe reports on startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PipeMetadata {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub repository: Option<String>,
    pub maintainer: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PipeMetadata {
    /// Load the descriptor at `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipe metadata {}", path.display()))?;
        let metadata = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse pipe metadata {}", path.display()))?;

        Ok(Some(metadata))
    }

    /// Image tag, which carries the pipe version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        let image = self.image.as_deref()?;
        let (_, tag) = image.rsplit_once(':')?;
        // a colon before the last path segment belongs to a registry port
        (!tag.contains('/')).then_some(tag)
    }
}
