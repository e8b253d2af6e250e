//! Tool registry: catalog types and the built-in descriptors.
//!
//! The catalog owns tool metadata: names, descriptions and argument schemas.
//! It is built once at startup and never mutated afterwards.

pub mod catalog;
pub mod registry;

pub use catalog::{ParamDef, ParamType, ToolCatalog, ToolEntry};
pub use registry::{builtin_entries, MAX_COMPARE, MIN_COMPARE, NUTRISCORE_GRADES};
