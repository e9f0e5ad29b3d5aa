//! FFmpeg-based converter implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

use super::command::{build_ffmpeg_args, display_command};
use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionJob, ConversionResult, OutputMode};
use crate::probe::MediaProbeResult;

/// Lines of encoder stderr kept when a suppressed conversion fails.
const STDERR_TAIL_LINES: usize = 20;

/// FFmpeg-based converter implementation.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    /// Creates a new FFmpeg converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// The configuration this converter was built with.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Parses ffprobe JSON output.
    fn parse_probe_output(output: &str) -> Result<MediaProbeResult, ConverterError> {
        MediaProbeResult::from_json(output).map_err(|e| ConverterError::ParseError {
            reason: format!("Failed to parse ffprobe output: {}", e),
        })
    }

    fn map_spawn_error(&self, e: std::io::Error) -> ConverterError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConverterError::FfmpegNotFound {
                path: self.config.ffmpeg_path.clone(),
            }
        } else {
            ConverterError::Io(e)
        }
    }

    /// Runs ffmpeg for one job and waits for it to exit.
    async fn run_conversion(
        &self,
        job: &ConversionJob,
        mode: OutputMode,
    ) -> Result<ConversionResult, ConverterError> {
        let start = Instant::now();

        // Ensure output directory exists
        if let Some(parent) = job.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|_| {
                    ConverterError::OutputDirectoryFailed {
                        path: parent.to_path_buf(),
                    }
                })?;
            }
        }

        let args = build_ffmpeg_args(job, &self.config);
        info!(
            input = %job.input_path.display(),
            output = %job.output_path.display(),
            "Running ffmpeg: {}",
            display_command(&self.config.ffmpeg_path, &args)
        );

        let mut command = Command::new(&self.config.ffmpeg_path);
        command.args(&args).stdin(Stdio::null());

        let (status, stderr) = match mode {
            OutputMode::Inherit => {
                let mut child = command
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .spawn()
                    .map_err(|e| self.map_spawn_error(e))?;
                (child.wait().await?, None)
            }
            OutputMode::Suppress => {
                let output = command
                    .stdout(Stdio::null())
                    .stderr(Stdio::piped())
                    .output()
                    .await
                    .map_err(|e| self.map_spawn_error(e))?;
                (output.status, Some(stderr_tail(&output.stderr)))
            }
        };

        if !status.success() {
            return Err(ConverterError::conversion_failed(
                match status.code() {
                    Some(code) => format!("ffmpeg exited with code {}", code),
                    None => "ffmpeg was terminated by a signal".to_string(),
                },
                status.code(),
                stderr.filter(|s| !s.is_empty()),
            ));
        }

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(&job.output_path).await.map_err(|_| {
            ConverterError::conversion_failed("Output file not created", status.code(), None)
        })?;

        let result = ConversionResult {
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            output = %result.output_path.display(),
            size_bytes = result.output_size_bytes,
            duration_ms = result.duration_ms,
            "Conversion finished"
        );
        Ok(result)
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let skip = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[skip..].join("\n")
}

#[async_trait]
impl Converter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe(&self, path: &Path) -> Result<MediaProbeResult, ConverterError> {
        if !path.exists() {
            return Err(ConverterError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::FfprobeNotFound {
                        path: self.config.ffprobe_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(ConverterError::probe_failed(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_probe_output(&stdout)
    }

    async fn convert(
        &self,
        job: ConversionJob,
        output: OutputMode,
    ) -> Result<ConversionResult, ConverterError> {
        self.run_conversion(&job, output).await
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        which::which(&self.config.ffmpeg_path).map_err(|_| ConverterError::FfmpegNotFound {
            path: self.config.ffmpeg_path.clone(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::StreamKind;
    use std::path::PathBuf;

    #[test]
    fn test_parse_probe_output_video() {
        let json = r#"{
            "format": {
                "filename": "test.mkv",
                "format_name": "matroska,webm",
                "duration": "7200.0",
                "size": "5000000000"
            },
            "streams": [
                {
                    "codec_type": "video",
                    "codec_name": "h264",
                    "width": 1920,
                    "height": 1080,
                    "avg_frame_rate": "24000/1001"
                },
                {
                    "codec_type": "audio",
                    "codec_name": "aac",
                    "bit_rate": "192000",
                    "sample_rate": "48000",
                    "channels": 6
                }
            ]
        }"#;

        let info = FfmpegConverter::parse_probe_output(json).unwrap();
        assert_eq!(info.format.format_name.as_deref(), Some("matroska,webm"));
        assert_eq!(info.streams.len(), 2);
        assert_eq!(info.streams[0].kind(), StreamKind::Video);
        assert_eq!(
            info.primary_codecs(),
            (Some("h264".to_string()), Some("aac".to_string()))
        );
    }

    #[test]
    fn test_parse_probe_output_invalid() {
        let err = FfmpegConverter::parse_probe_output("{ nope").unwrap_err();
        assert!(matches!(err, ConverterError::ParseError { .. }));
    }

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let text: String = (0..30).map(|i| format!("line {}\n", i)).collect();
        let tail = stderr_tail(text.as_bytes());
        assert!(tail.starts_with("line 10"));
        assert!(tail.ends_with("line 29"));
    }

    #[tokio::test]
    async fn test_probe_missing_input() {
        let converter = FfmpegConverter::with_defaults();
        let err = converter
            .probe(Path::new("/nonexistent/input.mkv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConverterError::InputNotFound { .. }));
    }

    #[tokio::test]
    async fn test_validate_missing_ffmpeg() {
        let converter = FfmpegConverter::new(ConverterConfig::with_paths(
            PathBuf::from("/nonexistent/bin/ffmpeg"),
            PathBuf::from("/nonexistent/bin/ffprobe"),
        ));
        let err = converter.validate().await.unwrap_err();
        assert!(matches!(err, ConverterError::FfmpegNotFound { .. }));
    }

    #[tokio::test]
    async fn test_convert_missing_ffmpeg() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mkv");
        std::fs::write(&input, b"").unwrap();

        let converter = FfmpegConverter::new(ConverterConfig::with_paths(
            PathBuf::from("/nonexistent/bin/ffmpeg"),
            PathBuf::from("/nonexistent/bin/ffprobe"),
        ));
        let job = ConversionJob::new(
            input,
            dir.path().join("out").join("in.mp4"),
            super::super::types::ConversionPlan::Adaptive(Default::default()),
        );
        let err = converter.convert(job, OutputMode::Suppress).await.unwrap_err();
        assert!(err.is_missing_tool());
    }
}
