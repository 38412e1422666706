//! Proptrans Core - per-property value transformation registry
//!
//! This crate decides, for a property of an object, a value, an output
//! format and a direction, which transformation to apply before the value is
//! used or persisted.
//!
//! # Main Components
//!
//! - **Labels**: open [`Format`] and [`Direction`] labels with an `Any` fallback
//! - **Types**: declared [`PropertyType`] descriptors and transformation [`Target`]s
//! - **Reflection**: the [`Reflection`] source of declared types
//! - **Transformers**: the [`Transformer`] trait, registries and built-ins
//! - **Registry**: [`TransformerRegistry`], owning everything and exposing
//!   [`TransformerRegistry::apply_transformer`]
//!
//! Object traversal is left to callers: the registry transforms one
//! property value at a time.

pub mod error;
pub mod labels;
pub mod reflection;
pub mod registry;
pub mod transformer;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use labels::{
    Direction, Format, ALL, EDIT, HTML, IGNORE, INPUT, JSON, OUTPUT, READ, SAVE, SQL,
};
pub use reflection::{Reflection, SchemaReflection};
pub use registry::{ResolutionReport, ResolutionSource, TransformerRegistry};
pub use transformer::{
    built_in, format_transformer_fn, transformer_fn, FnTransformer, FormatTransformer,
    Resolution, Slot, TransformInput, Transformer, TransformerEntry, TransformerRef,
};
pub use types::{PrimitiveType, PropertyType, Record, Target, TypeRef};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
