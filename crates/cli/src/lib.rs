//! Shared setup for the command-line tools.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use mkv2mp4_core::{load_config_or_default, validate_config, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Printed when the encoder cannot be found.
pub const INSTALL_HINT: &str = "Please install ffmpeg and ffprobe and try again.
Examples:
  Ubuntu: sudo apt install ffmpeg
  Mac (Homebrew): brew install ffmpeg
  Windows: install ffmpeg and add to PATH";

/// Installs the stderr log subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Parses arguments, exiting with status 1 on usage errors.
///
/// `--help` and `--version` still exit 0.
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    }
}

/// Loads and validates configuration from `path`, `MKV2MP4_CONFIG` or defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = load_config_or_default(path).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

/// Probes `input` and prints the media profile report to stdout.
pub async fn inspect(
    input: &Path,
    config_path: Option<&Path>,
    profile: mkv2mp4_core::ReportProfile,
) -> Result<()> {
    use mkv2mp4_core::{render_report, Converter, FfmpegConverter};

    let config = load_config(config_path)?;
    let converter = FfmpegConverter::new(config.tools);
    let probe = converter
        .probe(input)
        .await
        .with_context(|| format!("Failed to inspect {}", input.display()))?;

    print!("{}", render_report(&probe, profile));
    Ok(())
}
