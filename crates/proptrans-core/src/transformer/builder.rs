//! Builder for batch transformer entries
//!
//! Batch registration takes a list of entries; each entry names a
//! transformer and, optionally, the format and direction it applies to.
//! Omitted labels default to the `Any` fallback.
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

use super::types::TransformerRef;
use crate::labels::{Direction, Format};
use std::fmt;

/// One transformer at one (format, direction) coordinate
#[derive(Clone)]
pub struct TransformerEntry {
    pub format: Format,
    pub direction: Direction,
    pub transformer: TransformerRef,
}

impl TransformerEntry {
    /// Create an entry for every format and direction
    pub fn new(transformer: TransformerRef) -> Self {
        Self {
            format: Format::Any,
            direction: Direction::Any,
            transformer,
        }
    }

    /// Restrict the entry to a format
    pub fn format(mut self, format: impl Into<Format>) -> Self {
        self.format = format.into();
        self
    }

    /// Restrict the entry to a direction
    pub fn direction(mut self, direction: impl Into<Direction>) -> Self {
        self.direction = direction.into();
        self
    }
}

impl fmt::Debug for TransformerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerEntry")
            .field("format", &self.format)
            .field("direction", &self.direction)
            .field("transformer", &self.transformer.name())
            .finish()
    }
}
