//! # xsdtable
//!
//! Flattens XML Schema (XSD) documents into an ordered list of element
//! records and renders them as a tabular report.
//!
//! Starting at the top-level elements of a schema, every element and group
//! particle is visited depth-first. Complex types are expanded in place
//! (extension bases first, including bases from imported schemas), simple
//! types contribute their enumeration values, and named groups are inlined.
//! A type or group that re-enters itself along one branch is cut and the
//! record marked recursive.
//!
//! ## Example
//!
//! ```rust,ignore
//! use xsdtable::{flatten, Config, Report, SchemaRegistry};
//!
//! let config = Config::new().with_imports_enabled(true);
//! let registry = SchemaRegistry::load("orders.xsd", &config)?;
//! let output = flatten(&registry, &config);
//!
//! let report = Report::build(&output, &registry, &config);
//! print!("{}", report.to_tsv()?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Names and namespaces
pub mod namespaces;
pub mod names;
pub mod locations;

// Resource loading
pub mod loaders;
pub mod documents;

// Schema access
pub mod annotations;
pub mod config;
pub mod schema;

// Flattening and output
pub mod flatten;
pub mod report;

use std::path::Path;

pub use config::Config;
pub use error::{Error, Result};
pub use flatten::{flatten, ElementRecord, EnumRecord, FlattenOutput};
pub use report::{Column, Report};
pub use schema::SchemaRegistry;

/// Version of the xsdtable library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Load, flatten and tabulate one schema file
pub fn convert_file(path: impl AsRef<Path>, config: &Config) -> Result<Report> {
    config.validate()?;
    let registry = SchemaRegistry::load(path, config)?;
    let output = flatten(&registry, config);
    Ok(Report::build(&output, &registry, config))
}
