//! Converter module for remuxing and re-encoding media files.
//!
//! This module provides the `Converter` trait and an FFmpeg-backed
//! implementation that shells out to `ffmpeg` and `ffprobe`.
//!
//! # Features
//!
//! - Stream copy ("remux") of video and/or audio into MP4
//! - Re-encoding to H.264 (x264) and stereo AAC with configurable CRF, preset and bitrate
//! - A fixed target profile for bulk conversions
//! - Live or suppressed encoder output
//!
//! # Example
//!
//! ```ignore
//! use mkv2mp4_core::converter::{
//!     ConversionJob, ConversionPlan, Converter, EncodeParams, FfmpegConverter, OutputMode,
//! };
//!
//! let converter = FfmpegConverter::with_defaults();
//!
//! // Validate ffmpeg is available
//! converter.validate().await?;
//!
//! // Remux an MKV into MP4 without touching the streams
//! let job = ConversionJob::new(
//!     PathBuf::from("show.mkv"),
//!     PathBuf::from("converted/show.mp4"),
//!     ConversionPlan::Adaptive(EncodeParams::default()),
//! );
//!
//! let result = converter.convert(job, OutputMode::Inherit).await?;
//! println!("Converted in {} ms", result.duration_ms);
//! ```

mod command;
mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use command::{build_ffmpeg_args, display_command};
pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{
    ConversionJob, ConversionPlan, ConversionResult, EncodeParams, OutputMode, TargetProfile,
    AUDIO_ENCODER, COMPAT_PIXEL_FORMAT, DOWNMIX_CHANNELS, VIDEO_ENCODER,
};

pub(crate) use types::display_name;
