//! apidocs CLI entrypoint
//! Parses command-line arguments and dispatches to the core library.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};
use std::time::Duration;

// External imports (alphabetized)
use anyhow::Context;
use apidocs_core::reference::schema_ref;
use apidocs_core::{ApiDocument, Config, SnippetLanguage, Theme};
use clap::Parser;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Output directory used when neither a flag nor a config file names one
const DEFAULT_OUTPUT_DIR: &str = "site";

/// Quiet period after a change before rebuilding
const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "apidocs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render an OpenAPI document into a static documentation site
    Build(BuildArgs),
    /// Print the endpoint index, or one resolved schema, as JSON
    Inspect {
        /// Path or URL to the OpenAPI document (YAML or JSON)
        #[arg(long)]
        spec: String,
        /// Reference to resolve, e.g. '#/components/schemas/Pet' or just 'Pet'
        #[arg(long = "ref")]
        reference: Option<String>,
    },
    /// Rebuild the site whenever the OpenAPI document changes
    Watch(BuildArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Path or URL to the OpenAPI document (YAML or JSON)
    ///
    /// Example: --spec path/to/openapi.yaml
    /// Example: --spec https://example.com/openapi.json
    #[arg(long)]
    spec: Option<String>,
    /// Config file (YAML, JSON or TOML); flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory for the rendered site (default: site)
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Page title (default: the document's info.title)
    #[arg(long)]
    title: Option<String>,
    /// Color theme: light or dark
    #[arg(long)]
    theme: Option<Theme>,
    /// Directory holding a custom index.html.tera
    #[arg(long)]
    template_dir: Option<PathBuf>,
    /// Base URL used in code snippets (default: the document's first server)
    #[arg(long)]
    base_url: Option<Url>,
    /// Comma separated snippet languages (curl, javascript, python, rust)
    #[arg(long, value_delimiter = ',')]
    languages: Option<Vec<SnippetLanguage>>,
    /// Also write the loaded document as openapi.json
    #[arg(long)]
    emit_spec_json: bool,
}

impl BuildArgs {
    /// Load the config file if one was given, then apply flags on top
    async fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .await
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => {
                let spec = self
                    .spec
                    .clone()
                    .context("--spec is required when no --config is given")?;
                Config::new(spec, DEFAULT_OUTPUT_DIR)
            }
        };

        if let Some(spec) = &self.spec {
            config.spec_path = spec.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.to_string_lossy().into_owned();
        }
        if let Some(title) = &self.title {
            config.title = Some(title.clone());
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(template_dir) = &self.template_dir {
            config.template_dir = Some(template_dir.to_string_lossy().into_owned());
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(languages) = &self.languages {
            config.snippet_languages = languages.clone();
        }
        if self.emit_spec_json {
            config.emit_spec_json = true;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Build(args) => {
            let config = args.resolve_config().await?;
            let index = build(&config).await?;
            println!("{}", index.display());
        }
        Commands::Inspect { spec, reference } => {
            inspect(spec, reference.as_deref()).await?;
        }
        Commands::Watch(args) => {
            let config = args.resolve_config().await?;
            watch(&config).await?;
        }
    }
    Ok(())
}

async fn build(config: &Config) -> anyhow::Result<PathBuf> {
    apidocs_core::generate(config)
        .await
        .with_context(|| format!("Failed to build documentation for {}", config.spec_path))
}

async fn inspect(spec: &str, reference: Option<&str>) -> anyhow::Result<()> {
    let document = ApiDocument::from_file_or_url(spec)
        .await
        .with_context(|| format!("Failed to load OpenAPI document from {}", spec))?;

    let output = match reference {
        Some(reference) => {
            let reference = schema_ref(reference);
            let raw = document
                .resolve_ref(&reference)
                .with_context(|| format!("Reference {} does not resolve", reference))?;
            let target = json!({ "$ref": reference });
            let resolved = document
                .resolve_schema(&target)
                .with_context(|| format!("Reference {} does not resolve", reference))?;
            json!({
                "ref": reference,
                "target": raw,
                "resolved": resolved,
                "outline": document.outline(&target),
                "example": document.generate_example(&target),
            })
        }
        None => json!({
            "title": document.title(),
            "version": document.version(),
            "base_url": document.base_url(),
            "tag_groups": document.endpoints_by_tags(),
            "webhooks": document.webhooks(),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn watch(config: &Config) -> anyhow::Result<()> {
    let spec_path = PathBuf::from(&config.spec_path);
    if config.spec_path.starts_with("http://") || config.spec_path.starts_with("https://") {
        anyhow::bail!("Cannot watch a remote document: {}", config.spec_path);
    }
    let file_name = spec_path
        .file_name()
        .map(|name| name.to_os_string())
        .with_context(|| format!("Invalid document path: {}", spec_path.display()))?;
    // Editors often replace the file on save, so watch the directory and filter by name
    let watch_dir = match spec_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if let Err(e) = build(config).await {
        error!("{:#}", e);
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )?;
    watcher
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", watch_dir.display()))?;
    info!("watching {} for changes", spec_path.display());

    while let Some(res) = rx.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                warn!("watch error: {}", e);
                continue;
            }
        };
        let touches_spec = event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name.as_os_str()));
        if !touches_spec || !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            continue;
        }

        tokio::time::sleep(WATCH_DEBOUNCE).await;
        while rx.try_recv().is_ok() {}

        info!("{} changed, rebuilding", spec_path.display());
        match build(config).await {
            Ok(index) => info!("rebuilt {}", display_path(&index)),
            Err(e) => error!("{:#}", e),
        }
    }
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
