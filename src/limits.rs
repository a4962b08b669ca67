//! Limits for schema loading
//!
//! Schema files are read fully into memory before parsing, so the loader
//! caps their size and the number of imports followed from the root.

use crate::error::{Error, Result};

/// Loading limits configuration
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum schema file size in bytes
    pub max_xml_size: usize,

    /// Maximum number of imported schemas loaded for one root schema
    pub max_imports: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_size: 100 * 1024 * 1024, // 100 MB
            max_imports: 256,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_size: 10 * 1024 * 1024, // 10 MB
            max_imports: 16,
        }
    }

    /// Check if XML size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if another import may be loaded
    pub fn check_imports(&self, count: usize) -> Result<()> {
        if count >= self.max_imports {
            Err(Error::LimitExceeded(format!(
                "Import count {} reaches maximum {}",
                count, self.max_imports
            )))
        } else {
            Ok(())
        }
    }
}
