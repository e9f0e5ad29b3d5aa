//! ffmpeg command-line construction.

use std::ffi::OsString;
use std::path::Path;

use super::config::ConverterConfig;
use super::types::{
    ConversionJob, ConversionPlan, EncodeParams, TargetProfile, AUDIO_ENCODER,
    COMPAT_PIXEL_FORMAT, DOWNMIX_CHANNELS, VIDEO_ENCODER,
};

/// Builds the full ffmpeg argument list for a job (program name excluded).
///
/// Paths are passed through as `OsString` so file names that are not valid
/// UTF-8 reach ffmpeg unchanged.
pub fn build_ffmpeg_args(job: &ConversionJob, config: &ConverterConfig) -> Vec<OsString> {
    let mut options = Vec::new();
    match &job.plan {
        ConversionPlan::Adaptive(params) => push_adaptive_args(&mut options, params),
        ConversionPlan::Profile(profile) => push_profile_args(&mut options, profile),
    }
    options.extend(config.extra_ffmpeg_args.iter().cloned());

    // Index at the front so playback can start before the download finishes
    options.extend(["-movflags".to_string(), "+faststart".to_string()]);

    let mut args: Vec<OsString> = Vec::with_capacity(options.len() + 4);
    args.push("-y".into()); // Overwrite output
    args.push("-i".into());
    args.push(job.input_path.clone().into_os_string());
    args.extend(options.into_iter().map(OsString::from));
    args.push(job.output_path.clone().into_os_string());
    args
}

fn push_adaptive_args(args: &mut Vec<String>, params: &EncodeParams) {
    if params.reencode_video {
        args.extend([
            "-c:v".to_string(),
            VIDEO_ENCODER.to_string(),
            "-preset".to_string(),
            params.preset.clone(),
            "-crf".to_string(),
            params.crf.to_string(),
        ]);
        if params.force_yuv420 {
            args.extend(["-pix_fmt".to_string(), COMPAT_PIXEL_FORMAT.to_string()]);
        }
    } else {
        args.extend(["-c:v".to_string(), "copy".to_string()]);
    }

    if params.reencode_audio {
        args.extend([
            "-c:a".to_string(),
            AUDIO_ENCODER.to_string(),
            "-b:a".to_string(),
            params.audio_bitrate.clone(),
            "-ac".to_string(),
            DOWNMIX_CHANNELS.to_string(),
        ]);
    } else {
        args.extend(["-c:a".to_string(), "copy".to_string()]);
    }
}

fn push_profile_args(args: &mut Vec<String>, profile: &TargetProfile) {
    args.extend([
        "-map".to_string(),
        "0:v:0".to_string(),
        "-map".to_string(),
        "0:a:0".to_string(),
        "-c:v".to_string(),
        profile.video_codec.clone(),
        "-profile:v".to_string(),
        profile.video_profile.clone(),
        "-level:v".to_string(),
        profile.video_level.clone(),
        "-preset".to_string(),
        profile.preset.clone(),
        "-crf".to_string(),
        profile.crf.to_string(),
        "-vf".to_string(),
        format!(
            "scale={}:{},format={}",
            profile.width, profile.height, profile.pixel_format
        ),
        "-r".to_string(),
        profile.frame_rate.clone(),
        "-c:a".to_string(),
        profile.audio_codec.clone(),
        "-b:a".to_string(),
        profile.audio_bitrate.clone(),
        "-ac".to_string(),
        profile.audio_channels.to_string(),
        "-ar".to_string(),
        profile.audio_sample_rate.to_string(),
    ]);
}

/// Renders a command line for display, quoting arguments that contain
/// whitespace or quotes.
pub fn display_command(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|arg| arg.to_string_lossy().into_owned())
        .map(|arg| {
            if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'')
            {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
