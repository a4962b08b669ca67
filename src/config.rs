//! Conversion configuration
//!
//! One bundle drives both the flattening walk (imports, direction
//! markers) and the tabular report built from it (indentation, columns,
//! section headers).

use crate::error::{Error, Result};
use crate::report::Column;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options recognised by the flattener and the report builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Indent element names in the report by nesting depth
    pub indent_output: bool,
    /// Follow `import` declarations into foreign schemas
    pub imports_enabled: bool,
    /// Names ending with this suffix switch the branch to `out` for all descendants
    pub response_marker_suffix: Option<String>,
    /// Names ending with this suffix mark request rows and section headers
    pub request_marker_suffix: Option<String>,
    /// Repeat the header row before every request element
    pub header_request: bool,
    /// Repeat the header row before every response element
    pub header_response: bool,
    /// Report columns, rendered in canonical order
    pub columns: Vec<Column>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_output: false,
            imports_enabled: false,
            response_marker_suffix: None,
            request_marker_suffix: None,
            header_request: false,
            header_response: false,
            columns: Column::ALL.to_vec(),
        }
    }
}

impl Config {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration bundle from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a configuration bundle from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the bundle for contradictory settings
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::Config("at least one report column is required".to_string()));
        }
        for (flag, suffix) in [
            (self.header_request, &self.request_marker_suffix),
            (self.header_response, &self.response_marker_suffix),
        ] {
            if flag && suffix.as_deref().map_or(true, str::is_empty) {
                return Err(Error::Config(
                    "section headers need a non-empty marker suffix".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Set whether report names are indented
    pub fn with_indent_output(mut self, indent: bool) -> Self {
        self.indent_output = indent;
        self
    }

    /// Set whether imports are followed
    pub fn with_imports_enabled(mut self, enabled: bool) -> Self {
        self.imports_enabled = enabled;
        self
    }

    /// Set the response marker suffix
    pub fn with_response_marker(mut self, suffix: impl Into<String>) -> Self {
        self.response_marker_suffix = Some(suffix.into());
        self
    }

    /// Set the request marker suffix
    pub fn with_request_marker(mut self, suffix: impl Into<String>) -> Self {
        self.request_marker_suffix = Some(suffix.into());
        self
    }

    /// Set whether request sections get their own header
    pub fn with_header_request(mut self, enabled: bool) -> Self {
        self.header_request = enabled;
        self
    }

    /// Set whether response sections get their own header
    pub fn with_header_response(mut self, enabled: bool) -> Self {
        self.header_response = enabled;
        self
    }

    /// Set the report columns
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Whether `name` carries the response marker
    pub fn is_response(&self, name: &str) -> bool {
        ends_with_marker(name, self.response_marker_suffix.as_deref())
    }

    /// Whether `name` carries the request marker
    pub fn is_request(&self, name: &str) -> bool {
        ends_with_marker(name, self.request_marker_suffix.as_deref())
    }
}

fn ends_with_marker(name: &str, marker: Option<&str>) -> bool {
    match marker {
        Some(suffix) if !suffix.is_empty() => name.ends_with(suffix),
        _ => false,
    }
}
