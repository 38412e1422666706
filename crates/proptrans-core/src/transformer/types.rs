//! Core types for property transformers
//!
//! This module defines the transformer trait, the input handed to every
//! transformer call, and the values stored in and returned by the registry
//! tables.
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

use crate::labels::{Direction, Format};
use crate::types::Target;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Everything a transformer is called with
#[derive(Debug, Clone)]
pub struct TransformInput {
    /// The value to transform
    pub value: Value,
    /// The object (or type) the value belongs to
    pub target: Target,
    /// Name of the property being transformed
    pub property: String,
    /// Caller-supplied context data
    pub data: Option<Value>,
    pub format: Format,
    pub direction: Direction,
}

/// A property value transformation
///
/// Async closures taking a [`TransformInput`] implement this trait directly;
/// wrap synchronous closures with [`transformer_fn`] or
/// [`FnTransformer::named`].
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Transform one value
    async fn transform(&self, input: TransformInput) -> Result<Value>;

    /// Name used in logs and resolution reports
    fn name(&self) -> &str {
        "custom"
    }
}

#[async_trait]
impl<F, Fut> Transformer for F
where
    F: Fn(TransformInput) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    async fn transform(&self, input: TransformInput) -> Result<Value> {
        (self)(input).await
    }
}

/// Shared handle to a transformer; one function may sit at many coordinates
pub type TransformerRef = Arc<dyn Transformer>;

/// Synchronous transformer backed by a closure
pub struct FnTransformer<F> {
    name: String,
    func: F,
}

impl<F> FnTransformer<F>
where
    F: Fn(TransformInput) -> Result<Value> + Send + Sync + 'static,
{
    pub fn named(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> Transformer for FnTransformer<F>
where
    F: Fn(TransformInput) -> Result<Value> + Send + Sync + 'static,
{
    async fn transform(&self, input: TransformInput) -> Result<Value> {
        (self.func)(input)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap a synchronous closure as a shared transformer
pub fn transformer_fn<F>(func: F) -> TransformerRef
where
    F: Fn(TransformInput) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(FnTransformer::named("custom", func))
}

/// Finishing function applied to every value produced for one format
pub type FormatTransformer = Arc<dyn Fn(Value, &Value) -> Result<Value> + Send + Sync>;

/// Wrap a closure as a format post-processor
pub fn format_transformer_fn<F>(func: F) -> FormatTransformer
where
    F: Fn(Value, &Value) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(func)
}

/// What a property slot stores once written
#[derive(Clone)]
pub enum Resolution {
    /// Explicitly no transformation: values pass through
    Skip,
    Apply(TransformerRef),
}

impl Resolution {
    pub fn transformer(&self) -> Option<&TransformerRef> {
        match self {
            Resolution::Skip => None,
            Resolution::Apply(transformer) => Some(transformer),
        }
    }
}

impl From<TransformerRef> for Resolution {
    fn from(transformer: TransformerRef) -> Self {
        Resolution::Apply(transformer)
    }
}

impl From<Option<TransformerRef>> for Resolution {
    fn from(transformer: Option<TransformerRef>) -> Self {
        transformer.map_or(Resolution::Skip, Resolution::Apply)
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Skip => write!(f, "Skip"),
            Resolution::Apply(transformer) => write!(f, "Apply({})", transformer.name()),
        }
    }
}

/// Outcome of a property slot lookup
#[derive(Clone)]
pub enum Slot {
    /// Nothing stored for this coordinate yet
    Unresolved,
    /// Resolved to "no transformation"
    NoTransformer,
    Transformer(TransformerRef),
}

impl Slot {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Slot::Unresolved)
    }

    pub fn transformer(&self) -> Option<&TransformerRef> {
        match self {
            Slot::Transformer(transformer) => Some(transformer),
            _ => None,
        }
    }
}

impl From<Resolution> for Slot {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Skip => Slot::NoTransformer,
            Resolution::Apply(transformer) => Slot::Transformer(transformer),
        }
    }
}

impl From<Option<Resolution>> for Slot {
    fn from(resolution: Option<Resolution>) -> Self {
        resolution.map_or(Slot::Unresolved, Slot::from)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Unresolved => write!(f, "Unresolved"),
            Slot::NoTransformer => write!(f, "NoTransformer"),
            Slot::Transformer(transformer) => write!(f, "Transformer({})", transformer.name()),
        }
    }
}
