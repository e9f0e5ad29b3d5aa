use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use mkv2mp4_cli::{init_logging, load_config, parse_args, INSTALL_HINT};
use mkv2mp4_core::{
    resolve_inputs, AdaptiveConverter, AdaptiveOptions, Converter, FfmpegConverter, FileOutcome,
    FileReport, RemuxPolicy, SkipReason,
};
use tracing::{debug, error, info};

/// Convert MKV files to MP4 (remux or re-encode with ffmpeg)
#[derive(Parser)]
#[command(name = "mkv2mp4", version)]
struct Cli {
    /// Input file or directory (use --batch to treat as folder)
    input: Option<PathBuf>,

    /// Treat input as a directory and convert all .mkv files inside
    #[arg(long)]
    batch: bool,

    /// Directory to write outputs into
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Force re-encoding video to h264
    #[arg(long)]
    reencode_video: bool,

    /// Force re-encoding audio to AAC
    #[arg(long)]
    reencode_audio: bool,

    /// CRF for x264 (lower = higher quality)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=51))]
    crf: Option<u8>,

    /// x264 preset (ultrafast ... veryslow)
    #[arg(long)]
    preset: Option<String>,

    /// Audio bitrate for AAC when re-encoding, e.g. 128k, 192k
    #[arg(long)]
    audio_bitrate: Option<String>,

    /// Force pixel format to yuv420p (improves compatibility on many TVs)
    #[arg(long)]
    force_yuv420: bool,

    /// Overwrite existing output files (outputs are always overwritten)
    #[arg(short = 'y', long)]
    yes: bool,

    /// Skip ffprobe inspection and assume remux is okay (not recommended)
    #[arg(long)]
    no_ffprobe: bool,

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
    let config = load_config(cli.config.as_deref())?;
    if cli.yes {
        debug!("--yes given; existing outputs are overwritten regardless");
    }

    let converter = FfmpegConverter::new(config.tools.clone());
    converter
        .validate()
        .await
        .map_err(|e| anyhow!("{}\n{}", e, INSTALL_HINT))?;

    let extension = &config.batch.source_extension;
    let inputs = resolve_inputs(cli.input.as_deref(), cli.batch, extension).await?;
    if inputs.is_empty() {
        let dir = cli.input.unwrap_or_default();
        println!("No .{} files found in {}", extension, dir.display());
        return Ok(());
    }

    let mut params = config.encode.to_params();
    params.reencode_video = cli.reencode_video;
    params.reencode_audio = cli.reencode_audio;
    params.force_yuv420 = cli.force_yuv420;
    if let Some(crf) = cli.crf {
        params.crf = crf;
    }
    if let Some(preset) = cli.preset {
        params.preset = preset;
    }
    if let Some(bitrate) = cli.audio_bitrate {
        params.audio_bitrate = bitrate;
    }

    let options = AdaptiveOptions {
        output_dir: cli.output_dir.unwrap_or(config.encode.output_dir),
        target_extension: config.batch.target_extension.clone(),
        params,
        probe: !cli.no_ffprobe,
    };
    info!(
        files = inputs.len(),
        output_dir = %options.output_dir.display(),
        "Converting"
    );

    let adaptive = AdaptiveConverter::new(
        converter,
        RemuxPolicy::from_config(&config.policy),
        options,
    );
    adaptive.process(inputs, print_report).await;
    Ok(())
}

fn print_report(report: &FileReport) {
    match &report.outcome {
        FileOutcome::Skipped(SkipReason::MissingInput) => {
            println!("Skipping missing file: {}", report.input.display());
        }
        FileOutcome::Done { output } => println!("Done: {}", output.display()),
        FileOutcome::Failed {
            exit_code: Some(code),
            ..
        } => println!(
            "ffmpeg failed on {} with return code {}",
            report.input.display(),
            code
        ),
        FileOutcome::Failed { reason, .. } => {
            println!("Failed converting {}: {}", report.input.display(), reason)
        }
    }
}
