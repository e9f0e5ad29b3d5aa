use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::converter::{ConverterConfig, EncodeParams, TargetProfile};
use crate::policy::PolicyConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ConverterConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub encode: EncodeConfig,
    #[serde(default)]
    pub profile: TargetProfile,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Parallel batch converter configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Directory scanned for source files (not recursive)
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Directory converted files are written to (created if absent)
    #[serde(default = "default_batch_output_dir")]
    pub output_dir: PathBuf,
    /// Maximum number of encoder processes running at once
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Extension of the files picked up, without the dot
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
    /// Extension of the produced files, without the dot
    #[serde(default = "default_target_extension")]
    pub target_extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_batch_output_dir(),
            max_workers: default_max_workers(),
            source_extension: default_source_extension(),
            target_extension: default_target_extension(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("source")
}

fn default_batch_output_dir() -> PathBuf {
    PathBuf::from("converted")
}

fn default_max_workers() -> usize {
    4
}

fn default_source_extension() -> String {
    "mkv".to_string()
}

fn default_target_extension() -> String {
    "mp4".to_string()
}

/// Defaults for the adaptive converter; command-line flags take precedence.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncodeConfig {
    #[serde(default = "default_crf")]
    pub crf: u8,
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
    #[serde(default = "default_encode_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            crf: default_crf(),
            preset: default_preset(),
            audio_bitrate: default_audio_bitrate(),
            output_dir: default_encode_output_dir(),
        }
    }
}

impl EncodeConfig {
    /// Encode parameters with both re-encode flags cleared.
    pub fn to_params(&self) -> EncodeParams {
        EncodeParams {
            reencode_video: false,
            reencode_audio: false,
            crf: self.crf,
            preset: self.preset.clone(),
            audio_bitrate: self.audio_bitrate.clone(),
            force_yuv420: false,
        }
    }
}

fn default_crf() -> u8 {
    23
}

fn default_preset() -> String {
    "medium".to_string()
}

fn default_audio_bitrate() -> String {
    "160k".to_string()
}

fn default_encode_output_dir() -> PathBuf {
    PathBuf::from(".")
}
