//! Tera-backed page renderer.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use super::PageContext;
use crate::openapi::ApiDocument;
use crate::Error;

// External imports (alphabetized)
use tera::{Context, Tera};

/// Name of the page template, built in or looked up in a template directory
pub const INDEX_TEMPLATE: &str = "index.html.tera";

/// File the raw document is copied to when `emit_spec_json` is set
pub const SPEC_JSON_FILE: &str = "openapi.json";

const BUILTIN_INDEX: &str = include_str!("../../templates/index.html.tera");

/// Renders [`PageContext`]s into a static site
#[derive(Debug, Clone)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Use the templates under `template_dir`, or the built-in page when `None`.
    ///
    /// A custom directory must provide `index.html.tera`; other templates in it
    /// may be pulled in with `{% include %}` or `{% extends %}`.
    pub fn new(template_dir: Option<&Path>) -> crate::Result<Self> {
        let mut tera = match template_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(Error::template(format!(
                        "Template directory not found: {}",
                        dir.display()
                    )));
                }
                let pattern = format!("{}/**/*", dir.display());
                log::debug!("loading templates from {}", pattern);
                let tera = Tera::new(&pattern).map_err(|e| {
                    Error::template(format!("Failed to parse templates: {}", e))
                })?;
                if !tera.get_template_names().any(|name| name == INDEX_TEMPLATE) {
                    return Err(Error::template(format!(
                        "Template not found: {} in {}",
                        INDEX_TEMPLATE,
                        dir.display()
                    )));
                }
                tera
            }
            None => {
                let mut tera = Tera::default();
                tera.add_raw_template(INDEX_TEMPLATE, BUILTIN_INDEX)?;
                tera
            }
        };
        tera.autoescape_on(vec![".html.tera", ".html"]);
        Ok(Self { tera })
    }

    /// Render the page to a string
    pub fn render(&self, page: &PageContext) -> crate::Result<String> {
        let context = Context::from_serialize(page)?;
        self.tera.render(INDEX_TEMPLATE, &context).map_err(|e| {
            log::error!("Template rendering failed for '{}': {:?}", INDEX_TEMPLATE, e);
            Error::template(format!("Failed to render template '{}': {}", INDEX_TEMPLATE, e))
        })
    }

    /// Write `index.html` (and optionally the raw document as JSON) into `out_dir`.
    ///
    /// Returns the path of the written page.
    pub async fn write_site(
        &self,
        page: &PageContext,
        document: &ApiDocument,
        out_dir: &Path,
        emit_spec_json: bool,
    ) -> crate::Result<PathBuf> {
        let html = self.render(page)?;
        tokio::fs::create_dir_all(out_dir).await?;

        let index = out_dir.join("index.html");
        log::debug!("writing {} bytes to {}", html.len(), index.display());
        tokio::fs::write(&index, html).await?;

        if emit_spec_json {
            let spec_path = out_dir.join(SPEC_JSON_FILE);
            let json = serde_json::to_string_pretty(document.as_json())?;
            tokio::fs::write(&spec_path, json).await?;
            log::debug!("wrote {}", spec_path.display());
        }
        Ok(index)
    }
}
