//! Type-level transformer registry
//!
//! Maps a property type descriptor to its format -> direction table.
//! Populated once at startup with "every property of type X transforms
//! this way" rules; the [`ALL`](crate::labels::ALL) wildcard key holds
//! project-wide defaults.
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

use super::builder::TransformerEntry;
use super::table::FormatTable;
use super::types::TransformerRef;
use crate::labels::{Direction, Format};
use crate::types::PropertyType;
use std::collections::HashMap;

/// Transformers registered per property type
#[derive(Default)]
pub struct TypeTransformers {
    types: HashMap<PropertyType, FormatTable<TransformerRef>>,
}

impl TypeTransformers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install one transformer, creating intermediate tables on demand
    pub fn set(
        &mut self,
        property_type: &PropertyType,
        format: Format,
        direction: Direction,
        transformer: TransformerRef,
    ) {
        log::trace!(
            "Type transformer '{}' registered for {} at ({:?}, {:?})",
            transformer.name(),
            property_type,
            format,
            direction
        );
        self.types
            .entry(property_type.canonical())
            .or_default()
            .set(format, direction, transformer);
    }

    /// Install a batch of entries for one type
    pub fn set_many<I>(&mut self, property_type: &PropertyType, entries: I)
    where
        I: IntoIterator<Item = TransformerEntry>,
    {
        for entry in entries {
            self.set(property_type, entry.format, entry.direction, entry.transformer);
        }
    }

    /// Resolve the transformer for a type at a coordinate, with label fallbacks
    pub fn get(
        &self,
        property_type: &PropertyType,
        format: &Format,
        direction: &Direction,
    ) -> Option<TransformerRef> {
        self.types
            .get(&property_type.canonical())?
            .lookup(format, direction)
            .cloned()
    }

    /// Whether any table exists for the type
    pub fn contains(&self, property_type: &PropertyType) -> bool {
        self.types.contains_key(&property_type.canonical())
    }

    /// Number of types with at least one table
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
