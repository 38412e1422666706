//! Property-level override registry
//!
//! A side table keyed by (canonical type, property name). Each entry is a
//! format -> direction table of [`Resolution`] values. Entries are written
//! either explicitly, to override the type-level default for one property,
//! or lazily by the resolution entry point, which memoizes the outcome of
//! the type lookup here (including "no transformer").
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

use super::builder::TransformerEntry;
use super::table::FormatTable;
use super::types::{Resolution, Slot};
use crate::labels::{Direction, Format};
use crate::types::{Target, TypeRef};
use std::collections::HashMap;

/// Composite key of the side table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    pub type_ref: TypeRef,
    pub property: String,
}

impl PropertyKey {
    pub fn new(target: &Target, property: &str) -> Self {
        Self {
            type_ref: target.prototype().clone(),
            property: property.to_string(),
        }
    }
}

/// Overrides and memoized resolutions per property
#[derive(Default)]
pub struct PropertyTransformers {
    properties: HashMap<PropertyKey, FormatTable<Resolution>>,
}

impl PropertyTransformers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one slot and return the stored resolution
    pub fn set(
        &mut self,
        target: &Target,
        property: &str,
        format: Format,
        direction: Direction,
        resolution: Resolution,
    ) -> Resolution {
        log::trace!(
            "Property slot {}.{} at ({:?}, {:?}) set to {:?}",
            target.prototype(),
            property,
            format,
            direction,
            resolution
        );
        self.properties
            .entry(PropertyKey::new(target, property))
            .or_default()
            .set(format, direction, resolution.clone());
        resolution
    }

    /// Write a batch of entries for one property
    pub fn set_many<I>(&mut self, target: &Target, property: &str, entries: I)
    where
        I: IntoIterator<Item = TransformerEntry>,
    {
        for entry in entries {
            self.set(
                target,
                property,
                entry.format,
                entry.direction,
                Resolution::Apply(entry.transformer),
            );
        }
    }

    /// Look up a slot with label fallbacks
    pub fn get(&self, target: &Target, property: &str, format: &Format, direction: &Direction) -> Slot {
        self.table(target, property)
            .and_then(|table| table.lookup(format, direction))
            .cloned()
            .into()
    }

    /// The whole table stored for a property, if any
    pub fn table(&self, target: &Target, property: &str) -> Option<&FormatTable<Resolution>> {
        self.properties.get(&PropertyKey::new(target, property))
    }

    /// Number of properties with at least one slot
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
