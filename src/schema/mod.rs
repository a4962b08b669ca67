//! Schema documents and the lookups the flattener needs from them
//!
//! - [`registry`] loads the root schema and the schemas it imports
//! - [`resolver`] classifies nodes and locates type, group and base definitions
//! - [`recursion`] tracks the ancestors of one traversal branch

pub mod recursion;
pub mod registry;
pub mod resolver;

pub use recursion::{Ancestor, RecursionPath};
pub use registry::{resolve_imports, ImportedSchema, SchemaDocument, SchemaRegistry};
pub use resolver::{
    classify, enumerations, extension_base, is_complex_type, is_simple_type, members,
    resolve_base, BaseType, NodeKind, Origin, TypeRef,
};
