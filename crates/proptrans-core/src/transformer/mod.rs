//! Property transformers and the tables that hold them
//!
//! # Module Organization
//!
//! - [`types`] - Transformer trait, call input, stored and looked-up slot values
//! - [`table`] - The format -> direction table with `Any` fallbacks
//! - [`type_registry`] - Transformers per declared property type
//! - [`property_registry`] - Overrides and memoized resolutions per property
//! - [`format_registry`] - Format post-processors
//! - [`builder`] - Batch entries
//! - [`built_in`] - Ready-made transformers and post-processors
//!
//! The registries here are plain single-owner structs; the shared,
//! lock-protected composition lives in [`crate::registry`].
//!
//! # Examples
//!
//! ```
//! use proptrans_core::transformer::{built_in, Transformer, TransformerEntry, TypeTransformers};
//! use proptrans_core::{PrimitiveType, PropertyType, HTML, JSON, READ};
//!
//! let mut types = TypeTransformers::new();
//! types.set_many(
//!     &PropertyType::Primitive(PrimitiveType::String),
//!     vec![
//!         TransformerEntry::new(built_in::trim()),
//!         TransformerEntry::new(built_in::html_escape()).format(HTML),
//!     ],
//! );
//!
//! let string = PropertyType::Primitive(PrimitiveType::String);
//! assert_eq!(types.get(&string, &JSON, &READ).unwrap().name(), "trim");
//! assert_eq!(types.get(&string, &HTML, &READ).unwrap().name(), "html_escape");
//! ```
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

pub mod types;

pub mod table;

pub mod type_registry;

pub mod property_registry;

pub mod format_registry;

pub mod builder;

// Pre-configured transformers
pub mod built_in;

// Test module
#[cfg(test)]
mod tests;

pub use types::{
    format_transformer_fn, transformer_fn, FnTransformer, FormatTransformer, Resolution, Slot,
    TransformInput, Transformer, TransformerRef,
};

pub use builder::TransformerEntry;
pub use format_registry::FormatTransformers;
pub use property_registry::{PropertyKey, PropertyTransformers};
pub use table::FormatTable;
pub use type_registry::TypeTransformers;
