//! Built-in transformers for common operations
//!
//! Ready-made property transformers (numeric scaling, type conversions,
//! HTML escaping, date display) and format post-processors (SQL quoting,
//! JSON text). Configuration files refer to them by name through
//! [`named`] and [`named_format`].
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

use super::types::{
    format_transformer_fn, FnTransformer, FormatTransformer, TransformInput, TransformerRef,
};
use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;

/// Names accepted by [`named`]
pub const TRANSFORMER_NAMES: &[&str] = &[
    "boolean_label",
    "date_format",
    "html_escape",
    "multiply",
    "number_to_string",
    "string_to_number",
    "trim",
];

/// Names accepted by [`named_format`]
pub const FORMAT_TRANSFORMER_NAMES: &[&str] = &["json_string", "sql_quote"];

/// Multiply numeric values by `factor`
///
/// Integers stay integers when the factor is integral and the product fits.
pub fn multiply(factor: f64) -> TransformerRef {
    Arc::new(FnTransformer::named("multiply", move |input: TransformInput| {
        if let Some(int) = input.value.as_i64() {
            if factor.fract() == 0.0 && factor.abs() < i64::MAX as f64 {
                if let Some(product) = int.checked_mul(factor as i64) {
                    return Ok(Value::from(product));
                }
            }
        }
        let number = input.value.as_f64().ok_or_else(|| {
            Error::transformer(&input.property, format!("cannot multiply {}", input.value))
        })?;
        Ok(Value::from(number * factor))
    }))
}

/// Parse numeric strings; numbers pass through
pub fn string_to_number() -> TransformerRef {
    Arc::new(FnTransformer::named("string_to_number", |input: TransformInput| {
        match input.value {
            Value::String(text) => {
                let text = text.trim();
                if let Ok(int) = text.parse::<i64>() {
                    return Ok(Value::from(int));
                }
                text.parse::<f64>().map(Value::from).map_err(|_| {
                    Error::transformer(input.property, format!("'{}' is not a number", text))
                })
            }
            other => Ok(other),
        }
    }))
}

/// Render numbers as strings; other values pass through
pub fn number_to_string() -> TransformerRef {
    Arc::new(FnTransformer::named("number_to_string", |input: TransformInput| {
        match input.value {
            Value::Number(number) => Ok(Value::String(number.to_string())),
            other => Ok(other),
        }
    }))
}

pub fn trim() -> TransformerRef {
    Arc::new(FnTransformer::named("trim", |input: TransformInput| {
        match input.value {
            Value::String(text) => Ok(Value::String(text.trim().to_string())),
            other => Ok(other),
        }
    }))
}

/// Escape HTML special characters in string values
pub fn html_escape() -> TransformerRef {
    Arc::new(FnTransformer::named("html_escape", |input: TransformInput| {
        match input.value {
            Value::String(text) => Ok(Value::String(escape_html(&text))),
            other => Ok(other),
        }
    }))
}

/// Display booleans as labels
pub fn boolean_label(yes: impl Into<String>, no: impl Into<String>) -> TransformerRef {
    let yes = yes.into();
    let no = no.into();
    Arc::new(FnTransformer::named("boolean_label", move |input: TransformInput| {
        match input.value {
            Value::Bool(true) => Ok(Value::String(yes.clone())),
            Value::Bool(false) => Ok(Value::String(no.clone())),
            other => Ok(other),
        }
    }))
}

/// Reformat RFC 3339 timestamps or `YYYY-MM-DD` dates with a chrono pattern
pub fn date_format(pattern: impl Into<String>) -> TransformerRef {
    let pattern = pattern.into();
    Arc::new(FnTransformer::named("date_format", move |input: TransformInput| {
        let text = match input.value {
            Value::String(text) => text,
            other => return Ok(other),
        };
        let mut rendered = String::new();
        let written = if let Ok(timestamp) = DateTime::parse_from_rfc3339(&text) {
            write!(rendered, "{}", timestamp.format(&pattern))
        } else {
            let date = NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|e| {
                Error::Transformer {
                    property: input.property.clone(),
                    message: format!("'{}' is not a date", text),
                    source: Some(e.into()),
                }
            })?;
            write!(rendered, "{}", date.format(&pattern))
        };
        written.map_err(|_| {
            Error::transformer(input.property, format!("invalid date pattern '{}'", pattern))
        })?;
        Ok(Value::String(rendered))
    }))
}

/// Render values as SQL literals: strings quoted, `null` as `NULL`
pub fn sql_quote() -> FormatTransformer {
    format_transformer_fn(|value, _data| {
        Ok(match value {
            Value::Null => Value::String("NULL".to_string()),
            Value::String(text) => Value::String(quote_sql(&text)),
            nested @ (Value::Array(_) | Value::Object(_)) => {
                Value::String(quote_sql(&serde_json::to_string(&nested)?))
            }
            scalar => scalar,
        })
    })
}

/// Render values as their JSON text
pub fn json_string() -> FormatTransformer {
    format_transformer_fn(|value, _data| Ok(Value::String(serde_json::to_string(&value)?)))
}

/// Build a built-in transformer from its configuration name and options
pub fn named(name: &str, options: &Value) -> Result<TransformerRef> {
    match name {
        "multiply" => {
            let factor = options.get("factor").and_then(Value::as_f64).ok_or_else(|| {
                Error::configuration("multiply requires a numeric 'factor' option")
            })?;
            Ok(multiply(factor))
        }
        "string_to_number" => Ok(string_to_number()),
        "number_to_string" => Ok(number_to_string()),
        "trim" => Ok(trim()),
        "html_escape" => Ok(html_escape()),
        "boolean_label" => Ok(boolean_label(
            string_option(options, "yes").unwrap_or("yes"),
            string_option(options, "no").unwrap_or("no"),
        )),
        "date_format" => {
            let pattern = string_option(options, "pattern").unwrap_or("%Y-%m-%d");
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(Error::configuration(format!(
                    "invalid date_format pattern '{}'",
                    pattern
                )));
            }
            Ok(date_format(pattern))
        }
        _ => Err(Error::UnknownBuiltIn {
            name: name.to_string(),
        }),
    }
}

/// Build a built-in format post-processor from its configuration name
pub fn named_format(name: &str) -> Result<FormatTransformer> {
    match name {
        "sql_quote" => Ok(sql_quote()),
        "json_string" => Ok(json_string()),
        _ => Err(Error::UnknownBuiltIn {
            name: name.to_string(),
        }),
    }
}

fn string_option<'a>(options: &'a Value, key: &str) -> Option<&'a str> {
    options.get(key).and_then(Value::as_str)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn quote_sql(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
