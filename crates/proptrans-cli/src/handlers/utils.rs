//! Shared utilities for command handlers

use crate::error::{Error, Result};
use proptrans_core::Record;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One record or an array of records
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordDocument {
    Many(Vec<Record>),
    One(Record),
}

impl RecordDocument {
    pub fn into_records(self) -> Vec<Record> {
        match self {
            RecordDocument::Many(records) => records,
            RecordDocument::One(record) => vec![record],
        }
    }
}

/// Load a record document (JSON or YAML by extension)
pub fn load_records(path: &Path) -> Result<RecordDocument> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);

    let invalid = || Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: "a record or an array of records".to_string(),
    };
    if is_yaml {
        serde_yaml::from_str(&content).map_err(|_| invalid())
    } else {
        serde_json::from_str(&content).map_err(|_| invalid())
    }
}

/// Parse the `--data` argument
pub fn parse_context_data(data: Option<&str>) -> Result<Option<Value>> {
    data.map(|text| {
        serde_json::from_str(text)
            .map_err(|e| Error::invalid_args(format!("--data is not valid JSON: {}", e)))
    })
    .transpose()
}
