//! Format post-processors
//!
//! One finishing function per format label, matched exactly. There is no
//! `Any` fallback here: post-processing belongs to a concrete output format.
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

use super::types::FormatTransformer;
use crate::labels::Format;
use std::collections::HashMap;

#[derive(Default)]
pub struct FormatTransformers {
    formats: HashMap<Format, FormatTransformer>,
}

impl FormatTransformers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the post-processor for a format, replacing any previous one
    pub fn set(&mut self, format: Format, transformer: FormatTransformer) {
        log::trace!("Format transformer registered for {:?}", format);
        self.formats.insert(format, transformer);
    }

    pub fn get(&self, format: &Format) -> Option<FormatTransformer> {
        self.formats.get(format).cloned()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}
