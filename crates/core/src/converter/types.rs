//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Target video encoder used whenever video is re-encoded.
pub const VIDEO_ENCODER: &str = "libx264";

/// Target audio encoder used whenever audio is re-encoded.
pub const AUDIO_ENCODER: &str = "aac";

/// Pixel format forced by `force_yuv420`.
pub const COMPAT_PIXEL_FORMAT: &str = "yuv420p";

/// Channel count audio is downmixed to when re-encoded.
pub const DOWNMIX_CHANNELS: u8 = 2;

/// Per-file encode parameters for the adaptive converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeParams {
    /// Re-encode video instead of copying it.
    pub reencode_video: bool,
    /// Re-encode audio instead of copying it.
    pub reencode_audio: bool,
    /// Constant Rate Factor for x264 (lower = better quality, 0-51).
    pub crf: u8,
    /// x264 preset name.
    pub preset: String,
    /// AAC bitrate, e.g. "160k".
    pub audio_bitrate: String,
    /// Force yuv420p output when re-encoding video.
    pub force_yuv420: bool,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            reencode_video: false,
            reencode_audio: false,
            crf: 23,
            preset: "medium".to_string(),
            audio_bitrate: "160k".to_string(),
            force_yuv420: false,
        }
    }
}

impl EncodeParams {
    /// Whether the caller already forced both streams to be re-encoded,
    /// which makes probing pointless.
    pub fn reencodes_everything(&self) -> bool {
        self.reencode_video && self.reencode_audio
    }

    /// Same parameters with both streams re-encoded.
    pub fn with_full_reencode(mut self) -> Self {
        self.reencode_video = true;
        self.reencode_audio = true;
        self
    }
}

/// Fixed encode profile used by the batch converter. Appears as the
/// `[profile]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProfile {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Output frame rate as an ffmpeg rational.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: String,
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
    #[serde(default = "default_video_profile")]
    pub video_profile: String,
    #[serde(default = "default_video_level")]
    pub video_level: String,
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default = "default_profile_crf")]
    pub crf: u8,
    #[serde(default = "default_pixel_format")]
    pub pixel_format: String,
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
    #[serde(default = "default_profile_audio_bitrate")]
    pub audio_bitrate: String,
    #[serde(default = "default_audio_channels")]
    pub audio_channels: u8,
    #[serde(default = "default_audio_sample_rate")]
    pub audio_sample_rate: u32,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_frame_rate() -> String {
    "30000/1001".to_string()
}

fn default_video_codec() -> String {
    VIDEO_ENCODER.to_string()
}

fn default_video_profile() -> String {
    "high".to_string()
}

fn default_video_level() -> String {
    "4.0".to_string()
}

fn default_preset() -> String {
    "medium".to_string()
}

fn default_profile_crf() -> u8 {
    20
}

fn default_pixel_format() -> String {
    COMPAT_PIXEL_FORMAT.to_string()
}

fn default_audio_codec() -> String {
    AUDIO_ENCODER.to_string()
}

fn default_profile_audio_bitrate() -> String {
    "128k".to_string()
}

fn default_audio_channels() -> u8 {
    DOWNMIX_CHANNELS
}

fn default_audio_sample_rate() -> u32 {
    32000
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            frame_rate: default_frame_rate(),
            video_codec: default_video_codec(),
            video_profile: default_video_profile(),
            video_level: default_video_level(),
            preset: default_preset(),
            crf: default_profile_crf(),
            pixel_format: default_pixel_format(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_profile_audio_bitrate(),
            audio_channels: default_audio_channels(),
            audio_sample_rate: default_audio_sample_rate(),
        }
    }
}

/// How a job's streams are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionPlan {
    /// Copy or re-encode each stream as the parameters say.
    Adaptive(EncodeParams),
    /// Always re-encode to the fixed profile.
    Profile(TargetProfile),
}

/// What happens to the encoder's own console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Stream it live to this process's terminal.
    Inherit,
    /// Discard stdout; keep stderr only to report failures.
    Suppress,
}

/// A conversion job request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path.
    pub output_path: PathBuf,
    /// How to produce the output.
    pub plan: ConversionPlan,
}

impl ConversionJob {
    pub fn new(input_path: PathBuf, output_path: PathBuf, plan: ConversionPlan) -> Self {
        Self {
            input_path,
            output_path,
            plan,
        }
    }

    /// Input file name for display.
    pub fn input_name(&self) -> String {
        display_name(&self.input_path)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Result of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Output file path.
    pub output_path: PathBuf,
    /// Output file size in bytes.
    pub output_size_bytes: u64,
    /// Conversion duration in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_params_defaults() {
        let params = EncodeParams::default();
        assert_eq!(params.crf, 23);
        assert_eq!(params.preset, "medium");
        assert_eq!(params.audio_bitrate, "160k");
        assert!(!params.reencodes_everything());
    }

    #[test]
    fn test_full_reencode() {
        let params = EncodeParams {
            reencode_video: true,
            ..Default::default()
        };
        assert!(!params.reencodes_everything());
        assert!(params.with_full_reencode().reencodes_everything());
    }

    #[test]
    fn test_target_profile_defaults() {
        let profile = TargetProfile::default();
        assert_eq!((profile.width, profile.height), (1280, 720));
        assert_eq!(profile.frame_rate, "30000/1001");
        assert_eq!(profile.video_level, "4.0");
        assert_eq!(profile.crf, 20);
        assert_eq!(profile.audio_sample_rate, 32000);
    }

    #[test]
    fn test_input_name() {
        let job = ConversionJob::new(
            PathBuf::from("/media/show/ep01.mkv"),
            PathBuf::from("/out/ep01.mp4"),
            ConversionPlan::Adaptive(EncodeParams::default()),
        );
        assert_eq!(job.input_name(), "ep01.mkv");
    }
}
