//! Configuration for a documentation build.
//!
//! This module defines the `Config` struct. It can be created
//! programmatically or loaded from a YAML, JSON or TOML file (chosen by file
//! extension, YAML otherwise). The CLI overlays its flags on top.
//!
//! # Examples
//!
//! ```no_run
//! use apidocs_core::config::Config;
//! use apidocs_core::Theme;
//!
//! let mut config = Config::new("openapi.yaml", "site");
//! config.theme = Theme::Dark;
//! config.emit_spec_json = true;
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::render::Theme;
use crate::snippets::SnippetLanguage;
use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

/// Configuration for rendering documentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path or URL of the OpenAPI document
    pub spec_path: String,

    /// Output directory for the rendered site
    pub output_dir: String,

    /// Page title; defaults to the document's `info.title`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Color theme of the rendered page
    #[serde(default)]
    pub theme: Theme,

    /// Optional directory holding a replacement `index.html.tera`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<String>,

    /// Base URL used in code snippets; defaults to the document's first server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<Url>,

    /// Languages to generate code snippets for
    #[serde(default = "default_snippet_languages")]
    pub snippet_languages: Vec<SnippetLanguage>,

    /// Also write the loaded document next to the page as `openapi.json`
    #[serde(default)]
    pub emit_spec_json: bool,
}

impl Config {
    /// Create a new Config with default values
    pub fn new(spec_path: impl Into<String>, output_dir: impl Into<String>) -> Self {
        Self {
            spec_path: spec_path.into(),
            output_dir: output_dir.into(),
            title: None,
            theme: Theme::default(),
            template_dir: None,
            base_url: None,
            snippet_languages: default_snippet_languages(),
            emit_spec_json: false,
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config: Self = match ConfigFormat::of(path) {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot reject on its own
    pub fn validate(&self) -> crate::Result<()> {
        if self.spec_path.trim().is_empty() {
            return Err(Error::config("spec_path must not be empty"));
        }
        if self.output_dir.trim().is_empty() {
            return Err(Error::config("output_dir must not be empty"));
        }
        if self.snippet_languages.is_empty() {
            log::debug!("no snippet languages configured, pages will have no code samples");
        }
        Ok(())
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::of(path) {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
        };
        fs::write(path, content).await?;
        Ok(())
    }
}

enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

fn default_snippet_languages() -> Vec<SnippetLanguage> {
    SnippetLanguage::all().collect()
}
