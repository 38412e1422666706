//! Declared property types
//!
//! The registry never inspects objects itself: it asks a [`Reflection`]
//! implementation for the declared type of a property, once per
//! unresolved (type, property, format, direction). [`SchemaReflection`] is
//! a plain declared-type table, built in code or loaded from configuration.
//! Closures `Fn(&Target, &str) -> Option<PropertyType>` also work.

use crate::types::{PropertyType, Target, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source of declared property types
pub trait Reflection: Send + Sync {
    /// Declared type of `property` on `target`, or `None` when undeclared
    fn property_type(&self, target: &Target, property: &str) -> Option<PropertyType>;
}

impl<F> Reflection for F
where
    F: Fn(&Target, &str) -> Option<PropertyType> + Send + Sync,
{
    fn property_type(&self, target: &Target, property: &str) -> Option<PropertyType> {
        (self)(target, property)
    }
}

/// Declared types per type name and property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaReflection {
    types: HashMap<TypeRef, HashMap<String, PropertyType>>,
}

impl SchemaReflection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the type of one property
    pub fn declare(
        &mut self,
        type_ref: impl Into<TypeRef>,
        property: impl Into<String>,
        property_type: impl Into<PropertyType>,
    ) -> &mut Self {
        self.types
            .entry(type_ref.into())
            .or_default()
            .insert(property.into(), property_type.into());
        self
    }

    /// Builder form of [`SchemaReflection::declare`]
    pub fn with_property(
        mut self,
        type_ref: impl Into<TypeRef>,
        property: impl Into<String>,
        property_type: impl Into<PropertyType>,
    ) -> Self {
        self.declare(type_ref, property, property_type);
        self
    }

    /// Declared properties of a type
    pub fn properties(&self, type_ref: &TypeRef) -> Option<&HashMap<String, PropertyType>> {
        self.types.get(type_ref)
    }
}

impl Reflection for SchemaReflection {
    fn property_type(&self, target: &Target, property: &str) -> Option<PropertyType> {
        self.types.get(target.prototype())?.get(property).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PrimitiveType, Record};
    use serde_json::json;

    #[test]
    fn test_declared_types_resolve_for_instances_and_types() {
        let schema = SchemaReflection::new()
            .with_property("Person", "age", PrimitiveType::Number)
            .with_property("Person", "address", TypeRef::named("Address"));

        let instance = Target::from(Record::new("Person"));
        assert_eq!(
            schema.property_type(&instance, "age"),
            Some(PropertyType::Primitive(PrimitiveType::Number))
        );
        assert_eq!(
            schema.property_type(&Target::from(TypeRef::named("Person")), "address"),
            Some(PropertyType::named("Address"))
        );
        assert_eq!(schema.property_type(&instance, "nickname"), None);
    }

    #[test]
    fn test_schema_deserializes_from_nested_map() {
        let schema: SchemaReflection = serde_json::from_value(json!({
            "Person": {"age": "number", "tags": "collection(Tag)"},
            "Tag": {"label": "string"}
        }))
        .unwrap();

        let person = Target::from(TypeRef::named("Person"));
        assert_eq!(
            schema.property_type(&person, "tags"),
            Some(PropertyType::from("collection(Tag)"))
        );
        assert_eq!(
            schema.properties(&TypeRef::named("Tag")).map(|properties| properties.len()),
            Some(1)
        );
        assert!(schema.properties(&TypeRef::named("Order")).is_none());
    }

    #[test]
    fn test_closures_act_as_reflection() {
        let reflection = |_: &Target, property: &str| {
            (property == "flag").then_some(PropertyType::Primitive(PrimitiveType::Boolean))
        };
        let target = Target::from(TypeRef::named("Any"));
        assert!(reflection.property_type(&target, "flag").is_some());
        assert!(reflection.property_type(&target, "other").is_none());
    }
}
