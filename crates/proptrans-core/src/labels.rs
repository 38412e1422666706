//! Format and direction labels
//!
//! Both label kinds are open: a handful of well-known values plus a
//! `Custom` variant. The empty label (`""`, also accepted as `"*"`) is the
//! `Any` fallback used when no exact entry exists.
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

use crate::types::PropertyType;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Target representation of a transformed value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Format {
    /// Fallback entry for every format
    #[default]
    Any,
    Html,
    Json,
    Sql,
    Custom(Arc<str>),
}

/// Transformation phase a value goes through
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    /// Fallback entry for every direction
    #[default]
    Any,
    Edit,
    Input,
    Output,
    Read,
    Save,
    Custom(Arc<str>),
}

/// Wildcard property type: matches when no exact type entry exists
pub const ALL: PropertyType = PropertyType::Any;

pub const EDIT: Direction = Direction::Edit;
pub const INPUT: Direction = Direction::Input;
pub const OUTPUT: Direction = Direction::Output;
pub const READ: Direction = Direction::Read;
pub const SAVE: Direction = Direction::Save;

pub const HTML: Format = Format::Html;
pub const JSON: Format = Format::Json;
pub const SQL: Format = Format::Sql;

/// Reserved placeholder value for consumers; never interpreted by the registry
pub const IGNORE: &str = "¤~!~!~!~!~¤";

impl Format {
    /// The label string, `""` for [`Format::Any`]
    pub fn as_str(&self) -> &str {
        match self {
            Format::Any => "",
            Format::Html => "html",
            Format::Json => "json",
            Format::Sql => "sql",
            Format::Custom(name) => name.as_ref(),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Format::Any)
    }
}

impl Direction {
    /// The label string, `""` for [`Direction::Any`]
    pub fn as_str(&self) -> &str {
        match self {
            Direction::Any => "",
            Direction::Edit => "edit",
            Direction::Input => "input",
            Direction::Output => "output",
            Direction::Read => "read",
            Direction::Save => "save",
            Direction::Custom(name) => name.as_ref(),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Direction::Any)
    }
}

impl From<&str> for Format {
    fn from(label: &str) -> Self {
        match label {
            "" | "*" => Format::Any,
            "html" => Format::Html,
            "json" => Format::Json,
            "sql" => Format::Sql,
            other => Format::Custom(Arc::from(other)),
        }
    }
}

impl From<&str> for Direction {
    fn from(label: &str) -> Self {
        match label {
            "" | "*" => Direction::Any,
            "edit" => Direction::Edit,
            "input" => Direction::Input,
            "output" => Direction::Output,
            "read" => Direction::Read,
            "save" => Direction::Save,
            other => Direction::Custom(Arc::from(other)),
        }
    }
}

impl From<String> for Format {
    fn from(label: String) -> Self {
        Format::from(label.as_str())
    }
}

impl From<String> for Direction {
    fn from(label: String) -> Self {
        Direction::from(label.as_str())
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.as_str().to_string()
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        direction.as_str().to_string()
    }
}

impl FromStr for Format {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Format::from(s))
    }
}

impl FromStr for Direction {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Direction::from(s))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
