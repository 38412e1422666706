//! Two-axis format -> direction table
//!
//! Shared by the type and property registries. Lookup prefers the exact
//! format table and falls back to the `Any` format table only when no exact
//! format table exists; within the chosen table it prefers the exact
//! direction, then the `Any` direction.
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

use crate::labels::{Direction, Format};
use std::collections::HashMap;

/// Entries keyed by (format, direction), at most one per coordinate
#[derive(Debug, Clone)]
pub struct FormatTable<T> {
    formats: HashMap<Format, HashMap<Direction, T>>,
}

impl<T> FormatTable<T> {
    pub fn new() -> Self {
        Self {
            formats: HashMap::new(),
        }
    }

    /// Store `entry` at the coordinate, replacing any previous entry
    pub fn set(&mut self, format: Format, direction: Direction, entry: T) -> Option<T> {
        self.formats
            .entry(format)
            .or_default()
            .insert(direction, entry)
    }

    /// Resolve a coordinate with the `Any` fallbacks
    pub fn lookup(&self, format: &Format, direction: &Direction) -> Option<&T> {
        let directions = self
            .formats
            .get(format)
            .or_else(|| self.formats.get(&Format::Any))?;
        directions
            .get(direction)
            .or_else(|| directions.get(&Direction::Any))
    }

    /// Entry stored at exactly this coordinate, without fallback
    pub fn get_exact(&self, format: &Format, direction: &Direction) -> Option<&T> {
        self.formats.get(format)?.get(direction)
    }

    /// Number of stored coordinates
    pub fn len(&self) -> usize {
        self.formats.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for FormatTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
