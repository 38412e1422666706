//! Type descriptors and transformation targets
//!
//! A [`PropertyType`] is the declared type of a property as reported by a
//! [`Reflection`](crate::reflection::Reflection) implementation, and serves
//! as the key of the type-level registry. A [`Target`] is the object (or the
//! bare type) a value is being transformed for; every target normalizes to a
//! canonical [`TypeRef`], so instances of one type share property overrides.
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Canonical identity of a declared type, compared by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TypeRef(Arc<str>);

impl TypeRef {
    /// Reference a type by name
    pub fn named(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Reference a Rust type by its fully qualified type name
    pub fn of<T: ?Sized>() -> Self {
        Self::named(std::any::type_name::<T>())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl From<TypeRef> for String {
    fn from(type_ref: TypeRef) -> Self {
        type_ref.0.to_string()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primitive type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Integer,
    Number,
    String,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::String => "string",
        }
    }
}

/// Declared type of a property
///
/// The textual form (used in configuration files) is `*` for [`PropertyType::Any`],
/// `boolean`, `integer`, `number` or `string` for primitives,
/// `decorator(TypeName)` for [`PropertyType::Decorated`], and any other name
/// for [`PropertyType::Type`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    /// Universal wildcard
    Any,
    Primitive(PrimitiveType),
    Type(TypeRef),
    /// A declared type wrapped by a decorator
    Decorated { decorator: Arc<str>, inner: TypeRef },
}

impl PropertyType {
    pub fn named(name: impl AsRef<str>) -> Self {
        PropertyType::Type(TypeRef::named(name))
    }

    pub fn of<T: ?Sized>() -> Self {
        PropertyType::Type(TypeRef::of::<T>())
    }

    /// True for descriptors that stand for a declared type rather than a primitive tag
    pub fn is_object_like(&self) -> bool {
        matches!(self, PropertyType::Type(_) | PropertyType::Decorated { .. })
    }

    /// The registry key for this descriptor
    ///
    /// Object-like descriptors collapse to their `Type`; primitives and the
    /// wildcard are keys as they are.
    pub fn canonical(&self) -> PropertyType {
        match self {
            PropertyType::Decorated { inner, .. } => PropertyType::Type(inner.clone()),
            other => other.clone(),
        }
    }
}

impl From<PrimitiveType> for PropertyType {
    fn from(primitive: PrimitiveType) -> Self {
        PropertyType::Primitive(primitive)
    }
}

impl From<TypeRef> for PropertyType {
    fn from(type_ref: TypeRef) -> Self {
        PropertyType::Type(type_ref)
    }
}

impl From<&str> for PropertyType {
    fn from(text: &str) -> Self {
        let text = text.trim();
        match text {
            "" | "*" => return PropertyType::Any,
            "boolean" | "bool" => return PropertyType::Primitive(PrimitiveType::Boolean),
            "integer" | "int" => return PropertyType::Primitive(PrimitiveType::Integer),
            "number" => return PropertyType::Primitive(PrimitiveType::Number),
            "string" => return PropertyType::Primitive(PrimitiveType::String),
            _ => {}
        }

        if let Some((decorator, rest)) = text.split_once('(') {
            if let Some(inner) = rest.strip_suffix(')') {
                if !decorator.is_empty() && !inner.is_empty() {
                    return PropertyType::Decorated {
                        decorator: Arc::from(decorator.trim()),
                        inner: TypeRef::named(inner.trim()),
                    };
                }
            }
        }

        PropertyType::named(text)
    }
}

impl From<String> for PropertyType {
    fn from(text: String) -> Self {
        PropertyType::from(text.as_str())
    }
}

impl From<PropertyType> for String {
    fn from(property_type: PropertyType) -> Self {
        property_type.to_string()
    }
}

impl FromStr for PropertyType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PropertyType::from(s))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Any => write!(f, "*"),
            PropertyType::Primitive(primitive) => write!(f, "{}", primitive.as_str()),
            PropertyType::Type(type_ref) => write!(f, "{}", type_ref),
            PropertyType::Decorated { decorator, inner } => write!(f, "{}({})", decorator, inner),
        }
    }
}

/// A typed JSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(type_ref: impl Into<TypeRef>) -> Self {
        Self {
            type_ref: type_ref.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// What a value is transformed for: an object, or its type
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Type(TypeRef),
    Object(Arc<Record>),
}

impl Target {
    /// Canonical type identity of this target
    pub fn prototype(&self) -> &TypeRef {
        match self {
            Target::Type(type_ref) => type_ref,
            Target::Object(record) => &record.type_ref,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Target::Object(record) => Some(record),
            Target::Type(_) => None,
        }
    }
}

impl From<TypeRef> for Target {
    fn from(type_ref: TypeRef) -> Self {
        Target::Type(type_ref)
    }
}

impl From<Record> for Target {
    fn from(record: Record) -> Self {
        Target::Object(Arc::new(record))
    }
}

impl From<Arc<Record>> for Target {
    fn from(record: Arc<Record>) -> Self {
        Target::Object(record)
    }
}
