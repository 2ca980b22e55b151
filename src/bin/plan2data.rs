//! Server binary for plan2data.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ServiceConfig` and starts the HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use plan2data::api::serve;
use plan2data::{ExtractionStrategy, OpenAiProvider, ServiceConfig};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Start the server on the default 0.0.0.0:8000
  plan2data

  # Bind elsewhere
  plan2data --host 127.0.0.1 --port 9000

  # Text strategy against a self-hosted OpenAI-compatible endpoint
  plan2data --strategy text --api-base http://localhost:11434/v1

  # Extract a plan
  curl -F "file=@plan.pdf" http://localhost:8000/extract

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY              LLM provider API key (required)
  PLAN2DATA_HOST              Bind address (default 0.0.0.0)
  PLAN2DATA_PORT              Bind port (default 8000)
  PLAN2DATA_MODEL             Model ID (default gpt-4.1)
  PLAN2DATA_STRATEGY          text or vision (default vision)
  PLAN2DATA_API_BASE          OpenAI-compatible base URL
  PLAN2DATA_TIMEOUT_SECS      Provider call timeout in seconds (default 30)
  PLAN2DATA_MAX_UPLOAD_BYTES  Upload cap in bytes (default 20 MiB)
  PLAN2DATA_CORS_ORIGINS      Comma-separated allowed origins (default: any)

SETUP:
  1. Set API key:    export OPENAI_API_KEY=sk-...
  2. Start server:   plan2data
  3. Extract:        curl -F "file=@plan.pdf" http://localhost:8000/extract

  pdfium must be available as a shared library (libpdfium) on the host;
  most distro packages or the bblanchon/pdfium-binaries builds work.
"#;

/// Extract structured data from floor-plan PDFs over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "plan2data",
    version,
    about = "HTTP service extracting room and surface data from floor-plan PDFs",
    long_about = "Serves POST /extract: upload a floor-plan PDF as multipart field 'file', \
get back the property type, total area, per-room surfaces, and features as strict JSON. \
Works against OpenAI or any OpenAI-compatible chat-completions endpoint.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// IP address to bind.
    #[arg(long, env = "PLAN2DATA_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind.
    #[arg(short, long, env = "PLAN2DATA_PORT", default_value_t = 8000)]
    port: u16,

    /// Model ID (e.g. gpt-4.1, gpt-4o).
    #[arg(long, env = "PLAN2DATA_MODEL")]
    model: Option<String>,

    /// Extraction strategy: text or vision.
    #[arg(long, env = "PLAN2DATA_STRATEGY")]
    strategy: Option<ExtractionStrategy>,

    /// Base URL of an OpenAI-compatible API.
    #[arg(long, env = "PLAN2DATA_API_BASE")]
    api_base: Option<String>,

    /// Provider call timeout in seconds (1-300).
    #[arg(long, env = "PLAN2DATA_TIMEOUT_SECS",
          value_parser = clap::value_parser!(u64).range(1..=300))]
    timeout_secs: Option<u64>,

    /// Maximum accepted upload size in bytes.
    #[arg(long, env = "PLAN2DATA_MAX_UPLOAD_BYTES",
          value_parser = clap::value_parser!(u64).range(1024..))]
    max_upload_bytes: Option<u64>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PLAN2DATA_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    // from_env() is the base (and fails fast without OPENAI_API_KEY);
    // explicit flags override it. Numeric flags are range-checked by clap.
    let mut config = ServiceConfig::from_env().context("Invalid configuration")?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(base) = cli.api_base {
        config.api_base = base.trim_end_matches('/').to_string();
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = secs;
    }
    if let Some(bytes) = cli.max_upload_bytes {
        config.max_upload_bytes = bytes as usize;
    }

    tracing::info!("Effective configuration: {:?}", config);

    // ── Serve ────────────────────────────────────────────────────────────
    let provider =
        Arc::new(OpenAiProvider::new(&config).context("Failed to build LLM provider")?);

    serve(&cli.host, cli.port, config, provider)
        .await
        .context("Server exited with an error")?;

    Ok(())
}
