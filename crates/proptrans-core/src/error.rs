//! Error types for the Proptrans core library
//!
//! Resolution itself never fails: a missing declared type or an empty
//! registry both end in a pass-through. Errors come from transformer code,
//! from format post-processors, and from configuration that names things the
//! registry cannot build.

use thiserror::Error;

/// Main error type for Proptrans operations
#[derive(Error, Debug)]
pub enum Error {
    /// Raised by a property transformer
    #[error("Transformer failed for property '{property}': {message}")]
    Transformer {
        property: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Raised by a format post-processor
    #[error("Format transformer failed for format '{format}': {message}")]
    FormatTransformer {
        format: String,
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A configuration referenced a built-in that does not exist
    #[error("Unknown built-in transformer: {name}")]
    UnknownBuiltIn { name: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a transformer error for `property`
    pub fn transformer(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transformer {
            property: property.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a format post-processor error
    pub fn format_transformer(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FormatTransformer {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
