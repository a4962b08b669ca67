//! Schema flattening
//!
//! Turns the nested element/type/group structure of a schema into an
//! ordered list of [`ElementRecord`]s plus the enumeration values met on
//! the way.

pub mod model;
pub mod walker;

pub use model::{
    Direction, ElementKey, ElementKind, ElementRecord, EnumRecord, FlattenOutput, Nillable, Occurs,
};
pub use walker::{flatten, Branch, Walker};
