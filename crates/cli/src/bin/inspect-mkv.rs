use std::path::PathBuf;

use clap::Parser;
use mkv2mp4_cli::{init_logging, inspect, parse_args};
use mkv2mp4_core::ReportProfile;
use tracing::error;

/// Print the media profile of a source file, flagging common TV playback problems.
#[derive(Parser)]
#[command(name = "inspect-mkv", version)]
struct Cli {
    /// File to inspect
    input: PathBuf,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli: Cli = parse_args();
    init_logging("warn");

    if let Err(e) = inspect(&cli.input, cli.config.as_deref(), ReportProfile::Source).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
