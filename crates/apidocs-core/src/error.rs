//! Error handling for the apidocs rendering library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! Malformed schema fragments are never reported through this type: the
//! resolver and example synthesizer degrade to `None` instead. Only load-time
//! and output-time failures surface here.
//!
//! # Examples
//!
//! ```
//! use apidocs_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::document("root is not a mapping"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for apidocs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for apidocs operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The OpenAPI document could not be loaded
    #[error("OpenAPI document error: {0}")]
    Document(String),

    /// Template error
    #[error("Template error: {0}")]
    Template(String),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new document error
    pub fn document<S: Into<String>>(msg: S) -> Self {
        Self::Document(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::document("root is not a mapping").to_string(),
            "OpenAPI document error: root is not a mapping"
        );
        assert_eq!(
            Error::config("missing spec_path").to_string(),
            "Configuration error: missing spec_path"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
