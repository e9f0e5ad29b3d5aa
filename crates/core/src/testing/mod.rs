//! Testing utilities and a mock tool backend.
//!
//! `MockConverter` stands in for ffmpeg/ffprobe so the batch and adaptive
//! pipelines can be exercised without real media or binaries.
//!
//! # Example
//!
//! ```rust,ignore
//! use mkv2mp4_core::testing::{fixtures, MockConverter};
//!
//! let converter = MockConverter::new();
//! converter
//!     .set_probe_result("show.mkv", fixtures::probe_with_codecs(Some("hevc"), Some("dts")))
//!     .await;
//! ```

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedConversion};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    use crate::probe::{MediaProbeResult, ProbeStream};

    /// Probe result with one video and one audio stream (either may be absent).
    pub fn probe_with_codecs(video: Option<&str>, audio: Option<&str>) -> MediaProbeResult {
        let mut streams = Vec::new();
        if let Some(codec) = video {
            streams.push(ProbeStream {
                codec_type: Some("video".to_string()),
                codec_name: Some(codec.to_string()),
                ..Default::default()
            });
        }
        if let Some(codec) = audio {
            streams.push(ProbeStream {
                codec_type: Some("audio".to_string()),
                codec_name: Some(codec.to_string()),
                ..Default::default()
            });
        }
        MediaProbeResult {
            streams,
            ..Default::default()
        }
    }

    /// Creates empty files with the given names under `dir`.
    pub fn touch_all(dir: &Path, names: &[&str]) -> std::io::Result<Vec<PathBuf>> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, b"")?;
                Ok(path)
            })
            .collect()
    }
}
