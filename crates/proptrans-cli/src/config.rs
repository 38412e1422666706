//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - The `--config` flag or `PROPTRANS_CONFIG`
//!
//! and turns a configuration into a populated [`TransformerRegistry`].

use crate::error::{Error, Result};
use proptrans_core::{
    built_in, Direction, Format, PropertyType, Resolution, SchemaReflection, Target,
    TransformerRegistry, TypeRef,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Transformer name that disables a property instead of naming a built-in
pub const SKIP: &str = "skip";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Declared property types per type name
    pub schema: SchemaReflection,

    /// Type-level transformer rules
    pub types: Vec<TypeRule>,

    /// Per-property override rules
    pub properties: Vec<PropertyRule>,

    /// Format label -> built-in post-processor name
    pub formats: BTreeMap<String, String>,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Installs a built-in for a declared type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRule {
    #[serde(rename = "type")]
    pub property_type: PropertyType,

    #[serde(default, skip_serializing_if = "Format::is_any")]
    pub format: Format,

    #[serde(default, skip_serializing_if = "Direction::is_any")]
    pub direction: Direction,

    /// Built-in transformer name
    #[serde(rename = "use")]
    pub transformer: String,

    /// Built-in options, e.g. `factor` for `multiply`
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

/// Overrides one property of one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRule {
    pub target: TypeRef,

    pub property: String,

    #[serde(default, skip_serializing_if = "Format::is_any")]
    pub format: Format,

    #[serde(default, skip_serializing_if = "Direction::is_any")]
    pub direction: Direction,

    /// Built-in transformer name, or `skip`
    #[serde(rename = "use")]
    pub transformer: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output when the terminal supports it
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".proptrans.yaml"),
            PathBuf::from("proptrans.yaml"),
            PathBuf::from("proptrans.json"),
        ];

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let proptrans_dir = config_dir.join("proptrans");
            paths.push(proptrans_dir.join("config.yaml"));
            paths.push(proptrans_dir.join("config.json"));
        }

        // Home directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".proptrans.yaml"));
        }

        paths
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Starter configuration written by `config init`
    pub fn sample() -> Self {
        ConfigBuilder::new()
            .declare("Person", "name", "string")
            .declare("Person", "age", "integer")
            .declare("Person", "born", "string")
            .type_rule(TypeRule::new("string", "trim"))
            .type_rule(TypeRule::new("string", "html_escape").format("html"))
            .property_rule(
                PropertyRule::new("Person", "born", "date_format")
                    .format("html")
                    .options(serde_json::json!({"pattern": "%d %B %Y"})),
            )
            .property_rule(PropertyRule::new("Person", "age", SKIP).format("sql"))
            .format_transformer("sql", "sql_quote")
            .build()
    }

    /// Build a registry holding every configured rule
    pub fn build_registry(&self) -> Result<TransformerRegistry> {
        let registry = TransformerRegistry::new(self.schema.clone());

        for rule in &self.types {
            let transformer = built_in::named(&rule.transformer, &rule.options)?;
            registry.set_property_type_transformer(
                &rule.property_type,
                rule.format.clone(),
                rule.direction.clone(),
                transformer,
            );
        }

        for rule in &self.properties {
            let resolution = if rule.transformer == SKIP {
                Resolution::Skip
            } else {
                Resolution::Apply(built_in::named(&rule.transformer, &rule.options)?)
            };
            registry.set_property_transformer(
                &Target::from(rule.target.clone()),
                &rule.property,
                rule.format.clone(),
                rule.direction.clone(),
                resolution,
            );
        }

        for (format, name) in &self.formats {
            registry.set_format_transformer(Format::from(format.as_str()), built_in::named_format(name)?);
        }

        tracing::debug!(
            types = self.types.len(),
            properties = self.properties.len(),
            formats = self.formats.len(),
            "Built transformer registry"
        );
        Ok(registry)
    }
}

impl TypeRule {
    pub fn new(property_type: impl Into<PropertyType>, transformer: impl Into<String>) -> Self {
        Self {
            property_type: property_type.into(),
            format: Format::Any,
            direction: Direction::Any,
            transformer: transformer.into(),
            options: Value::Null,
        }
    }

    pub fn format(mut self, format: impl Into<Format>) -> Self {
        self.format = format.into();
        self
    }

    pub fn direction(mut self, direction: impl Into<Direction>) -> Self {
        self.direction = direction.into();
        self
    }

    pub fn options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }
}

impl PropertyRule {
    pub fn new(
        target: impl Into<TypeRef>,
        property: impl Into<String>,
        transformer: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            property: property.into(),
            format: Format::Any,
            direction: Direction::Any,
            transformer: transformer.into(),
            options: Value::Null,
        }
    }

    pub fn format(mut self, format: impl Into<Format>) -> Self {
        self.format = format.into();
        self
    }

    pub fn direction(mut self, direction: impl Into<Direction>) -> Self {
        self.direction = direction.into();
        self
    }

    pub fn options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Builder for creating configurations programmatically
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Declare the type of one property
    pub fn declare(
        mut self,
        type_name: &str,
        property: &str,
        property_type: impl Into<PropertyType>,
    ) -> Self {
        self.config.schema.declare(type_name, property, property_type);
        self
    }

    /// Add a type-level rule
    pub fn type_rule(mut self, rule: TypeRule) -> Self {
        self.config.types.push(rule);
        self
    }

    /// Add a property override rule
    pub fn property_rule(mut self, rule: PropertyRule) -> Self {
        self.config.properties.push(rule);
        self
    }

    /// Set the post-processor for a format
    pub fn format_transformer(mut self, format: impl Into<String>, name: impl Into<String>) -> Self {
        self.config.formats.insert(format.into(), name.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptrans_core::{Record, HTML, JSON, READ, SQL};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("proptrans.yaml");

        let config = Config::sample();
        config.save(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();

        assert_eq!(loaded.schema, config.schema);
        assert_eq!(loaded.types, config.types);
        assert_eq!(loaded.properties, config.properties);
        assert_eq!(loaded.formats, config.formats);
    }

    #[test]
    fn test_json_config_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("proptrans.json");
        std::fs::write(
            &path,
            r#"{
                "schema": {"Order": {"total": "number"}},
                "types": [{"type": "number", "format": "html", "use": "multiply", "options": {"factor": 100}}]
            }"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.types[0].format, HTML);
        assert_eq!(config.types[0].direction, Direction::Any);
        assert!(config.properties.is_empty());
        assert!(config.output.color);
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = Config::load_with_file(Some(Path::new("/nonexistent/proptrans.yaml"))).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_build_registry_from_sample() {
        let registry = Config::sample().build_registry().unwrap();
        let person = Target::from(Record::new("Person"));

        let name = registry
            .apply_transformer(json!(" <Ada> "), &person, "name", &HTML, &READ, None)
            .await
            .unwrap();
        assert_eq!(name, json!(" &lt;Ada&gt; "));

        let born = registry
            .apply_transformer(json!("1815-12-10"), &person, "born", &HTML, &READ, None)
            .await
            .unwrap();
        assert_eq!(born, json!("10 December 1815"));

        let name_sql = registry
            .apply_transformer(json!(" Ada "), &person, "name", &SQL, &READ, Some(&json!({})))
            .await
            .unwrap();
        assert_eq!(name_sql, json!("'Ada'"));

        let age_json = registry
            .apply_transformer(json!(36), &person, "age", &JSON, &READ, None)
            .await
            .unwrap();
        assert_eq!(age_json, json!(36));
    }

    #[test]
    fn test_build_registry_rejects_unknown_built_ins() {
        let config = ConfigBuilder::new()
            .type_rule(TypeRule::new("string", "rot13"))
            .build();
        let err = config.build_registry().unwrap_err();
        assert!(matches!(
            err,
            Error::Core(proptrans_core::Error::UnknownBuiltIn { ref name }) if name == "rot13"
        ));

        let config = ConfigBuilder::new().format_transformer("xml", "xml_escape").build();
        assert!(config.build_registry().is_err());
    }
}
