//! Error types for xsdtable
//!
//! Only loading a schema can fail. Everything the flattener meets during
//! traversal (missing types, unresolvable imports, cycles) is resolved
//! locally and never surfaces as an error.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using xsdtable Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsdtable operations
#[derive(Error, Debug)]
pub enum Error {
    /// The requested schema file does not exist
    #[error("schema file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// XML Schema structure error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Report writing error
    #[error("report output error: {0}")]
    Csv(#[from] csv::Error),
}

/// XML Schema parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location of the schema that caused the error
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Expected xs:schema root element").with_location("orders.xsd");

        let msg = format!("{}", err);
        assert!(msg.contains("Expected xs:schema root element"));
        assert!(msg.contains("Location: orders.xsd"));
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound(PathBuf::from("missing.xsd"));
        assert_eq!(err.to_string(), "schema file not found: missing.xsd");
    }

    #[test]
    fn test_error_conversion() {
        let parse_err = ParseError::new("test");
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
