use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use figma_tokens::config::{Loader, PROJECT_FILE};
use figma_tokens::export::{push_outputs, write_outputs};
use figma_tokens::push::HttpPusher;

/// Convert a design-token directory into variables API and plugin documents.
#[derive(Debug, Parser)]
#[command(name = "figma-tokens", version, about)]
struct Args {
    /// Configuration file layered over the defaults (default: ./figma-tokens.toml if present)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory holding the token JSON files
    #[arg(long)]
    tokens_dir: Option<PathBuf>,

    /// Directory the two documents are written to
    #[arg(long, short)]
    out_dir: Option<PathBuf>,

    /// Upload the variables payload after writing it
    #[arg(long)]
    push: bool,

    /// Fail on dimension values without a numeric prefix instead of exporting 0
    #[arg(long)]
    strict_dimensions: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut loader = match &args.config {
        Some(path) => Loader::defaults().file(path, true),
        None => Loader::defaults().file(PROJECT_FILE, false),
    }
    .env()?;
    if let Some(dir) = &args.tokens_dir {
        loader = loader.set("input.dir", dir.to_string_lossy().to_string())?;
    }
    if let Some(dir) = &args.out_dir {
        loader = loader.set("output.dir", dir.to_string_lossy().to_string())?;
    }
    if args.push {
        loader = loader.set("push.enabled", true)?;
    }
    if args.strict_dimensions {
        loader = loader.set("resolve.dimension_policy", "strict")?;
    }
    let config = loader.build().context("invalid configuration")?;

    let outcome = write_outputs(&config)
        .with_context(|| format!("export of {} failed", config.input.dir.display()))?;
    tracing::info!(
        tokens = outcome.tokens,
        variables = %outcome.variables_path.display(),
        interchange = %outcome.interchange_path.display(),
        "export complete"
    );

    let pusher = HttpPusher::new(Duration::from_secs(config.push.timeout_secs))?;
    push_outputs(&pusher, &config.push, &outcome.payload)
        .await
        .context("push to variables API failed")?;
    Ok(())
}
