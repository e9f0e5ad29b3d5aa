//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{
    ConversionJob, ConversionResult, Converter, ConverterError, OutputMode,
};
use crate::probe::{MediaProbeResult, ProbeStream};

/// A recorded conversion job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The job that was submitted.
    pub job: ConversionJob,
    /// Where the encoder output was sent.
    pub output: OutputMode,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track probe calls and conversion jobs for assertions
/// - Per-file probe results and probe failures
/// - Per-file encoder exit codes
/// - Per-file conversion delays, to shuffle completion order
///
/// # Example
///
/// ```rust,ignore
/// use mkv2mp4_core::testing::{MockConverter, fixtures};
///
/// let converter = MockConverter::new();
/// converter.set_probe_result("/media/ep01.mkv", fixtures::probe_with_codecs(Some("hevc"), Some("aac"))).await;
/// converter.fail_conversion("/media/ep02.mkv", 1).await;
///
/// // ... run the pipeline ...
///
/// assert_eq!(converter.conversion_count().await, 2);
/// ```
/// Clones share state, so a test can keep a handle after moving one into a pipeline.
#[derive(Debug, Clone)]
pub struct MockConverter {
    /// Recorded conversions, in the order they finished.
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    /// Paths passed to `probe`, in call order.
    probe_calls: Arc<RwLock<Vec<PathBuf>>>,
    /// Pre-configured probe results by path.
    probe_results: Arc<RwLock<HashMap<PathBuf, MediaProbeResult>>>,
    /// Paths whose probe fails.
    probe_failures: Arc<RwLock<HashSet<PathBuf>>>,
    /// Input paths whose conversion exits with the given code.
    conversion_failures: Arc<RwLock<HashMap<PathBuf, i32>>>,
    /// Simulated conversion time by input path.
    conversion_delays: Arc<RwLock<HashMap<PathBuf, Duration>>>,
    /// Whether `validate` reports a missing encoder.
    ffmpeg_missing: Arc<RwLock<bool>>,
    /// Conversions currently running.
    active: Arc<AtomicUsize>,
    /// Highest number of conversions seen running at once.
    peak_active: Arc<AtomicUsize>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            conversions: Arc::new(RwLock::new(Vec::new())),
            probe_calls: Arc::new(RwLock::new(Vec::new())),
            probe_results: Arc::new(RwLock::new(HashMap::new())),
            probe_failures: Arc::new(RwLock::new(HashSet::new())),
            conversion_failures: Arc::new(RwLock::new(HashMap::new())),
            conversion_delays: Arc::new(RwLock::new(HashMap::new())),
            ffmpeg_missing: Arc::new(RwLock::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
            peak_active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of conversions performed.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Paths that were probed, in call order.
    pub async fn probe_calls(&self) -> Vec<PathBuf> {
        self.probe_calls.read().await.clone()
    }

    /// Set a probe result for a specific path.
    pub async fn set_probe_result(&self, path: impl AsRef<Path>, info: MediaProbeResult) {
        self.probe_results
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), info);
    }

    /// Make probing this path fail.
    pub async fn fail_probe(&self, path: impl AsRef<Path>) {
        self.probe_failures
            .write()
            .await
            .insert(path.as_ref().to_path_buf());
    }

    /// Make converting this input exit with `exit_code`.
    pub async fn fail_conversion(&self, input: impl AsRef<Path>, exit_code: i32) {
        self.conversion_failures
            .write()
            .await
            .insert(input.as_ref().to_path_buf(), exit_code);
    }

    /// Make converting this input take `delay`.
    pub async fn set_conversion_delay(&self, input: impl AsRef<Path>, delay: Duration) {
        self.conversion_delays
            .write()
            .await
            .insert(input.as_ref().to_path_buf(), delay);
    }

    /// Make `validate` report a missing encoder.
    pub async fn set_ffmpeg_missing(&self, missing: bool) {
        *self.ffmpeg_missing.write().await = missing;
    }

    /// Highest number of conversions that were running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }

    /// Probe result for files without a configured one: h264 video + aac audio.
    fn default_probe() -> MediaProbeResult {
        let stream = |codec_type: &str, codec_name: &str| ProbeStream {
            codec_type: Some(codec_type.to_string()),
            codec_name: Some(codec_name.to_string()),
            ..Default::default()
        };
        MediaProbeResult {
            streams: vec![stream("video", "h264"), stream("audio", "aac")],
            ..Default::default()
        }
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<MediaProbeResult, ConverterError> {
        self.probe_calls.write().await.push(path.to_path_buf());

        if self.probe_failures.read().await.contains(path) {
            return Err(ConverterError::probe_failed(format!(
                "ffprobe failed: {}: Invalid data found when processing input",
                path.display()
            )));
        }

        // Check for pre-configured result
        if let Some(info) = self.probe_results.read().await.get(path) {
            return Ok(info.clone());
        }

        Ok(Self::default_probe())
    }

    async fn convert(
        &self,
        job: ConversionJob,
        output: OutputMode,
    ) -> Result<ConversionResult, ConverterError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(now, Ordering::SeqCst);

        // Simulate conversion time
        let delay = self
            .conversion_delays
            .read()
            .await
            .get(&job.input_path)
            .copied()
            .unwrap_or(Duration::ZERO);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .conversion_failures
            .read()
            .await
            .get(&job.input_path)
            .copied();

        self.active.fetch_sub(1, Ordering::SeqCst);

        // Record the conversion
        self.conversions.write().await.push(RecordedConversion {
            job: job.clone(),
            output,
            success: failure.is_none(),
        });

        if let Some(code) = failure {
            return Err(ConverterError::conversion_failed(
                format!("ffmpeg exited with code {}", code),
                Some(code),
                None,
            ));
        }

        Ok(ConversionResult {
            output_path: job.output_path,
            output_size_bytes: 50 * 1024 * 1024, // 50 MB
            duration_ms: delay.as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if *self.ffmpeg_missing.read().await {
            return Err(ConverterError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ConversionPlan, EncodeParams};

    fn create_test_job(input: &str) -> ConversionJob {
        ConversionJob::new(
            PathBuf::from(input),
            PathBuf::from("/output/test.mp4"),
            ConversionPlan::Adaptive(EncodeParams::default()),
        )
    }

    #[tokio::test]
    async fn test_basic_conversion() {
        let converter = MockConverter::new();

        let result = converter
            .convert(create_test_job("/input/test.mkv"), OutputMode::Inherit)
            .await
            .unwrap();

        assert_eq!(result.output_path, PathBuf::from("/output/test.mp4"));
        assert_eq!(converter.conversion_count().await, 1);
    }

    #[tokio::test]
    async fn test_default_probe() {
        let converter = MockConverter::new();

        let info = converter.probe(Path::new("/test/video.mkv")).await.unwrap();
        assert_eq!(
            info.primary_codecs(),
            (Some("h264".to_string()), Some("aac".to_string()))
        );
        assert_eq!(
            converter.probe_calls().await,
            vec![PathBuf::from("/test/video.mkv")]
        );
    }

    #[tokio::test]
    async fn test_custom_probe_result_and_failure() {
        let converter = MockConverter::new();
        converter
            .set_probe_result("/custom/file.mkv", MediaProbeResult::default())
            .await;
        converter.fail_probe("/broken/file.mkv").await;

        let result = converter.probe(Path::new("/custom/file.mkv")).await.unwrap();
        assert!(result.streams.is_empty());

        let err = converter
            .probe(Path::new("/broken/file.mkv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConverterError::ProbeFailed { .. }));
    }

    #[tokio::test]
    async fn test_conversion_failure_is_recorded() {
        let converter = MockConverter::new();
        converter.fail_conversion("/input/bad.mkv", 183).await;

        let err = converter
            .convert(create_test_job("/input/bad.mkv"), OutputMode::Suppress)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), Some(183));

        let conversions = converter.recorded_conversions().await;
        assert_eq!(conversions.len(), 1);
        assert!(!conversions[0].success);
        assert_eq!(conversions[0].output, OutputMode::Suppress);
    }

    #[tokio::test]
    async fn test_validate_missing_ffmpeg() {
        let converter = MockConverter::new();
        assert!(converter.validate().await.is_ok());

        converter.set_ffmpeg_missing(true).await;
        assert!(converter.validate().await.unwrap_err().is_missing_tool());
    }
}
