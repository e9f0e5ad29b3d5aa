//! Probe module: ffprobe output model and the media profile report.
//!
//! Running ffprobe itself is the job of the [`Converter`](crate::converter::Converter)
//! backend; this module only models and renders what it returns.
//!
//! # Example
//!
//! ```ignore
//! use mkv2mp4_core::converter::{Converter, FfmpegConverter};
//! use mkv2mp4_core::probe::{render_report, ReportProfile};
//!
//! let converter = FfmpegConverter::with_defaults();
//! let probe = converter.probe(Path::new("episode.mkv")).await?;
//! print!("{}", render_report(&probe, ReportProfile::Source));
//! ```

mod report;
mod types;

pub use report::{
    format_frame_rate, render_report, ReportProfile, NULL_MARKER, UNKNOWN_FRAME_RATE,
};
pub use types::{MediaProbeResult, ProbeFormat, ProbeStream, StreamKind};
