//! Resource location resolution
//!
//! `schemaLocation` attributes are either URLs or paths relative to the
//! schema that declares them.

use std::path::{Path, PathBuf};
use url::Url;

/// Resource location - a URL or a file path
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// URL (http, https, ftp, etc.)
    Url(Url),
}

impl Location {
    /// Resolve a `schemaLocation` against the directory of the declaring schema
    pub fn resolve(raw: &str, base_dir: Option<&Path>) -> Self {
        if let Ok(url) = Url::parse(raw) {
            if url.scheme() == "file" {
                if let Ok(path) = url.to_file_path() {
                    return Location::Path(path);
                }
            } else if url.scheme().len() > 1 {
                // Single-letter schemes are Windows drive letters, not URLs
                return Location::Url(url);
            }
        }

        let path = PathBuf::from(raw);
        match base_dir {
            Some(dir) if path.is_relative() => Location::Path(dir.join(path)),
            _ => Location::Path(path),
        }
    }

    /// Get the location as a string
    pub fn as_str(&self) -> String {
        match self {
            Location::Path(p) => p.to_string_lossy().to_string(),
            Location::Url(u) => u.to_string(),
        }
    }

    /// Directory against which nested locations resolve
    pub fn base_dir(&self) -> Option<&Path> {
        match self {
            Location::Path(p) => p.parent(),
            Location::Url(_) => None,
        }
    }

    /// Check if this is a remote location (URL)
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }
}
