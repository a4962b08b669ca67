//! Resource loading utilities
//!
//! This module reads schema files from disk. Remote locations are
//! recognised but refused; an import pointing at one is skipped by the
//! registry.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::Location;
use std::fs;

/// Resource loader for schema documents
#[derive(Debug, Clone, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// The limits this loader enforces
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Load a resource as a string
    pub fn load(&self, location: &Location) -> Result<String> {
        match location {
            Location::Path(path) => {
                if !path.exists() {
                    return Err(Error::NotFound(path.clone()));
                }

                let content = fs::read_to_string(path).map_err(|e| {
                    Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
                })?;

                // Check size limits
                self.limits.check_xml_size(content.len())?;

                Ok(content)
            }
            Location::Url(url) => Err(Error::Resource(format!(
                "Remote schema locations are not supported: {}",
                url
            ))),
        }
    }
}
