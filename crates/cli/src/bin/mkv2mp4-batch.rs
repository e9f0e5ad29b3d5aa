use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mkv2mp4_cli::{init_logging, load_config, parse_args};
use mkv2mp4_core::{BatchConverter, FfmpegConverter, JobOutcome, JobStatus};
use tracing::error;

/// Convert every MKV in a directory to a fixed 720p H.264/AAC MP4 profile, in parallel
#[derive(Parser)]
#[command(name = "mkv2mp4-batch", version)]
struct Cli {
    /// Directory to read source files from [default: batch.input_dir]
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory to write converted files into [default: batch.output_dir]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Maximum number of concurrent ffmpeg processes [default: batch.max_workers]
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u16).range(1..))]
    workers: Option<u16>,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli: Cli = parse_args();
    init_logging("info");

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.input_dir {
        config.batch.input_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.batch.output_dir = dir;
    }
    if let Some(workers) = cli.workers {
        config.batch.max_workers = workers as usize;
    }

    let input_dir = config.batch.input_dir.clone();
    let extension = config.batch.source_extension.clone();
    let batch = BatchConverter::new(
        FfmpegConverter::new(config.tools),
        config.batch,
        config.profile,
    );

    let report = batch
        .run(print_outcome)
        .await
        .with_context(|| format!("Batch conversion of {} failed", input_dir.display()))?;

    if report.summary.total == 0 {
        println!("No .{} files found in {}", extension, input_dir.display());
        return Ok(());
    }

    let summary = report.summary;
    println!(
        "Converted {} of {} files ({} failed)",
        summary.succeeded, summary.total, summary.failed
    );
    Ok(())
}

fn print_outcome(outcome: &JobOutcome) {
    match &outcome.status {
        JobStatus::Succeeded => println!("Finished: {}", outcome.file_name),
        JobStatus::Failed { reason, .. } => {
            println!("Failed: {} ({})", outcome.file_name, reason)
        }
    }
}
