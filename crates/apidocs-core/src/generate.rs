//! Site generation entry point

use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    error::Result,
    openapi::ApiDocument,
    render::{PageContext, PageOptions, Renderer},
};

/// Render the documentation site described by `config`.
///
/// Returns the path of the written `index.html`.
pub async fn generate(config: &Config) -> Result<PathBuf> {
    // 1. Load the document
    let document = ApiDocument::from_file_or_url(&config.spec_path).await?;
    log::info!(
        "loaded {} ({})",
        document.title().unwrap_or("untitled document"),
        config.spec_path
    );

    // 2. Build the page view
    let page = PageContext::build(&document, &PageOptions::from(config))?;
    log::info!(
        "{} endpoint entries in {} groups, {} webhooks",
        page.endpoint_count(),
        page.tag_groups.len(),
        page.webhooks.len()
    );

    // 3. Render and write
    let renderer = Renderer::new(config.template_dir.as_deref().map(Path::new))?;
    let index = renderer
        .write_site(
            &page,
            &document,
            Path::new(&config.output_dir),
            config.emit_spec_json,
        )
        .await?;
    log::info!("wrote {}", index.display());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SPEC_JSON_FILE;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_generate_from_yaml() -> Result<()> {
        let dir = tempdir()?;
        let spec = dir.path().join("openapi.yaml");
        tokio::fs::write(
            &spec,
            r#"
openapi: 3.0.3
info:
  title: Ping
  version: "1"
paths:
  /ping:
    get:
      summary: Health check
      responses:
        "200":
          description: Pong
"#,
        )
        .await?;
        let out = dir.path().join("site");
        let mut config = Config::new(spec.to_string_lossy(), out.to_string_lossy());
        config.emit_spec_json = true;

        let index = generate(&config).await?;
        let html = tokio::fs::read_to_string(&index).await?;
        assert!(html.contains("Health check"));
        assert!(html.contains(r#"id="tag-other-get-ping""#));
        assert!(out.join(SPEC_JSON_FILE).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_missing_document() {
        let dir = tempdir().unwrap();
        let config = Config::new(
            dir.path().join("absent.yaml").to_string_lossy(),
            dir.path().join("site").to_string_lossy(),
        );
        assert!(generate(&config).await.is_err());
    }
}
