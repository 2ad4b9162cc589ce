//! `lancer` binary entry point.
//!
//! Thin wrapper around the lancer-cli library that:
//! 1. Initializes logging
//! 2. Parses command-line arguments
//! 3. Runs the selected command against stdout

use anyhow::{Context, Result};
use lancer_cli::{CliConfig, run};

fn main() -> Result<()> {
    // Logs go to stderr so payloads written to stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_args();
    tracing::debug!(
        "Configuration loaded: max_depth={}, lenient_sizes={}, file={:?}",
        config.max_depth,
        config.lenient_sizes,
        config.file()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&config, &mut out)
        .with_context(|| format!("lancer failed on {}", config.file().display()))?;

    Ok(())
}
