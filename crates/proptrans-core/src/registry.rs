//! Transformer registry and resolution entry point
//!
//! [`TransformerRegistry`] owns the three registries (type-level
//! transformers, property overrides, format post-processors) and the
//! reflection source used to learn declared property types. It is the
//! explicit context value handed to whatever converts objects to a format.
//!
//! # Resolution
//!
//! [`TransformerRegistry::apply_transformer`] looks up the property slot
//! first. An unresolved slot is resolved once through reflection and the
//! type registry (exact declared type, then the [`ALL`] wildcard) and the
//! outcome, including "no transformer", is memoized in the property slot.
//! The transformer is then awaited, and the format post-processor runs only
//! when context data was supplied and is not empty-like (`null`, `false`,
//! `0` or `""`). A property declared as [`ALL`] counts as undeclared.
//!
//! ```
//! use proptrans_core::{
//!     built_in, PrimitiveType, Record, SchemaReflection, Target, TransformerRegistry, JSON, READ,
//! };
//! use proptrans_core::labels::Direction;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> proptrans_core::Result<()> {
//! let schema = SchemaReflection::new().with_property("Person", "age", PrimitiveType::Number);
//! let registry = TransformerRegistry::new(schema);
//! registry.set_property_type_transformer(
//!     &PrimitiveType::Number.into(),
//!     JSON,
//!     Direction::Any,
//!     built_in::multiply(2.0),
//! );
//!
//! let person = Target::from(Record::new("Person"));
//! let value = registry
//!     .apply_transformer(json!(5), &person, "age", &JSON, &READ, None)
//!     .await?;
//! assert_eq!(value, json!(10));
//! # Ok(())
//! # }
//! ```
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

use crate::labels::{Direction, Format, ALL};
use crate::reflection::Reflection;
use crate::transformer::{
    FormatTransformer, FormatTransformers, PropertyTransformers, Resolution, Slot,
    TransformInput, TransformerEntry, TransformerRef, TypeTransformers,
};
use crate::types::{PropertyType, Target};
use crate::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Which layer a resolution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Property slot already written (explicit override or earlier resolution)
    Property,
    /// Type registry entry for the declared type
    DeclaredType,
    /// Type registry entry for the wildcard type
    Wildcard,
    /// Nothing registered, or no declared type
    None,
}

/// Outcome of [`TransformerRegistry::explain`]
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub type_name: String,
    pub property: String,
    pub format: Format,
    pub direction: Direction,
    /// Declared type, when reflection was consulted and knew the property
    pub declared_type: Option<PropertyType>,
    pub source: ResolutionSource,
    /// Name of the winning transformer, `None` for pass-through
    pub transformer: Option<String>,
}

/// Registry of property transformers, resolved by format and direction
pub struct TransformerRegistry {
    reflection: Arc<dyn Reflection>,
    types: RwLock<TypeTransformers>,
    properties: RwLock<PropertyTransformers>,
    formats: RwLock<FormatTransformers>,
}

impl TransformerRegistry {
    /// Create an empty registry using `reflection` for declared types
    pub fn new(reflection: impl Reflection + 'static) -> Self {
        Self::with_reflection(Arc::new(reflection))
    }

    /// Create an empty registry sharing a reflection source
    pub fn with_reflection(reflection: Arc<dyn Reflection>) -> Self {
        Self {
            reflection,
            types: RwLock::new(TypeTransformers::new()),
            properties: RwLock::new(PropertyTransformers::new()),
            formats: RwLock::new(FormatTransformers::new()),
        }
    }

    /// Transform `value` of `target.property` for a format and direction
    ///
    /// Errors raised by the transformer or the format post-processor are
    /// returned unchanged.
    pub async fn apply_transformer(
        &self,
        value: Value,
        target: &Target,
        property: &str,
        format: &Format,
        direction: &Direction,
        data: Option<&Value>,
    ) -> Result<Value> {
        let slot = self.property_transformer(target, property, format, direction);
        let resolution = match slot {
            Slot::Unresolved => {
                let (resolution, _, _) = self.resolve_from_types(target, property, format, direction);
                self.set_property_transformer(
                    target,
                    property,
                    format.clone(),
                    direction.clone(),
                    resolution,
                )
            }
            Slot::NoTransformer => {
                log::trace!("{}.{}: cached pass-through", target.prototype(), property);
                Resolution::Skip
            }
            Slot::Transformer(transformer) => {
                log::trace!(
                    "{}.{}: cached transformer '{}'",
                    target.prototype(),
                    property,
                    transformer.name()
                );
                Resolution::Apply(transformer)
            }
        };
        let post_processor = self.read_formats().get(format);

        let result = match resolution {
            Resolution::Apply(transformer) => {
                transformer
                    .transform(TransformInput {
                        value,
                        target: target.clone(),
                        property: property.to_string(),
                        data: data.cloned(),
                        format: format.clone(),
                        direction: direction.clone(),
                    })
                    .await?
            }
            Resolution::Skip => value,
        };

        match (data, post_processor) {
            (Some(data), Some(post_processor)) if is_truthy(data) => post_processor(result, data),
            _ => Ok(result),
        }
    }

    /// Report how a property would resolve, without memoizing anything
    pub fn explain(
        &self,
        target: &Target,
        property: &str,
        format: &Format,
        direction: &Direction,
    ) -> ResolutionReport {
        let (source, declared_type, transformer) =
            match self.property_transformer(target, property, format, direction) {
                Slot::Unresolved => {
                    let (resolution, source, declared_type) =
                        self.resolve_from_types(target, property, format, direction);
                    (source, declared_type, resolution.transformer().cloned())
                }
                Slot::NoTransformer => (ResolutionSource::Property, None, None),
                Slot::Transformer(transformer) => {
                    (ResolutionSource::Property, None, Some(transformer))
                }
            };

        ResolutionReport {
            type_name: target.prototype().to_string(),
            property: property.to_string(),
            format: format.clone(),
            direction: direction.clone(),
            declared_type,
            source,
            transformer: transformer.map(|t| t.name().to_string()),
        }
    }

    /// Write one property slot (override or memoized resolution)
    pub fn set_property_transformer(
        &self,
        target: &Target,
        property: &str,
        format: Format,
        direction: Direction,
        resolution: impl Into<Resolution>,
    ) -> Resolution {
        self.write_properties()
            .set(target, property, format, direction, resolution.into())
    }

    /// Write a batch of property slots; omitted labels default to `Any`
    pub fn set_property_transformers<I>(&self, target: &Target, property: &str, entries: I)
    where
        I: IntoIterator<Item = TransformerEntry>,
    {
        self.write_properties().set_many(target, property, entries);
    }

    /// Look up a property slot with label fallbacks
    pub fn property_transformer(
        &self,
        target: &Target,
        property: &str,
        format: &Format,
        direction: &Direction,
    ) -> Slot {
        self.read_properties().get(target, property, format, direction)
    }

    /// Install a type-level transformer
    pub fn set_property_type_transformer(
        &self,
        property_type: &PropertyType,
        format: Format,
        direction: Direction,
        transformer: TransformerRef,
    ) {
        self.write_types()
            .set(property_type, format, direction, transformer);
    }

    /// Install a batch of type-level transformers; omitted labels default to `Any`
    pub fn set_property_type_transformers<I>(&self, property_type: &PropertyType, entries: I)
    where
        I: IntoIterator<Item = TransformerEntry>,
    {
        self.write_types().set_many(property_type, entries);
    }

    /// Look up a type-level transformer with label fallbacks
    pub fn property_type_transformer(
        &self,
        property_type: &PropertyType,
        format: &Format,
        direction: &Direction,
    ) -> Option<TransformerRef> {
        self.read_types().get(property_type, format, direction)
    }

    /// Install the post-processor for a format, replacing any previous one
    pub fn set_format_transformer(&self, format: Format, transformer: FormatTransformer) {
        self.write_formats().set(format, transformer);
    }

    pub fn format_transformer(&self, format: &Format) -> Option<FormatTransformer> {
        self.read_formats().get(format)
    }

    fn resolve_from_types(
        &self,
        target: &Target,
        property: &str,
        format: &Format,
        direction: &Direction,
    ) -> (Resolution, ResolutionSource, Option<PropertyType>) {
        let declared = self
            .reflection
            .property_type(target, property)
            .filter(|declared_type| *declared_type != ALL);
        let Some(declared_type) = declared else {
            log::debug!(
                "{}.{}: no declared type, resolved to pass-through for ({:?}, {:?})",
                target.prototype(),
                property,
                format,
                direction
            );
            return (Resolution::Skip, ResolutionSource::None, None);
        };

        let types = self.read_types();
        let (resolution, source) = if let Some(found) = types.get(&declared_type, format, direction) {
            (Resolution::Apply(found), ResolutionSource::DeclaredType)
        } else if let Some(found) = types.get(&ALL, format, direction) {
            (Resolution::Apply(found), ResolutionSource::Wildcard)
        } else {
            (Resolution::Skip, ResolutionSource::None)
        };
        drop(types);

        log::debug!(
            "{}.{}: declared type {} resolved to {:?} from {:?} for ({:?}, {:?})",
            target.prototype(),
            property,
            declared_type,
            resolution,
            source,
            format,
            direction
        );
        (resolution, source, Some(declared_type))
    }

    // Every write is a single insert, so a poisoned lock still guards consistent tables.
    fn read_types(&self) -> RwLockReadGuard<'_, TypeTransformers> {
        self.types.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_types(&self) -> RwLockWriteGuard<'_, TypeTransformers> {
        self.types.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_properties(&self) -> RwLockReadGuard<'_, PropertyTransformers> {
        self.properties.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_properties(&self) -> RwLockWriteGuard<'_, PropertyTransformers> {
        self.properties.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_formats(&self) -> RwLockReadGuard<'_, FormatTransformers> {
        self.formats.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_formats(&self) -> RwLockWriteGuard<'_, FormatTransformers> {
        self.formats.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("types", &self.read_types().len())
            .field("properties", &self.read_properties().len())
            .field("formats", &self.read_formats().len())
            .finish()
    }
}

/// Context data that enables format post-processing
fn is_truthy(data: &Value) -> bool {
    match data {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
