use std::path::PathBuf;

use clap::Parser;
use mkv2mp4_cli::{init_logging, inspect, parse_args};
use mkv2mp4_core::ReportProfile;
use tracing::error;

/// Print the media profile of a file known to play correctly, to use as a conversion reference.
#[derive(Parser)]
#[command(name = "inspect-mp4", version)]
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

    if let Err(e) = inspect(&cli.input, cli.config.as_deref(), ReportProfile::Reference).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
