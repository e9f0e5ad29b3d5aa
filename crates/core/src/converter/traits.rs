//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ConverterError;
use super::types::{ConversionJob, ConversionResult, OutputMode};
use crate::probe::MediaProbeResult;

/// A backend that can probe and convert media files.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Probes a media file for its container and stream metadata.
    async fn probe(&self, path: &Path) -> Result<MediaProbeResult, ConverterError>;

    /// Runs one conversion job to completion.
    ///
    /// A non-zero encoder exit is reported as [`ConverterError::ConversionFailed`]
    /// carrying the exit code.
    async fn convert(
        &self,
        job: ConversionJob,
        output: OutputMode,
    ) -> Result<ConversionResult, ConverterError>;

    /// Validates that the encoder is available. The prober is not checked.
    async fn validate(&self) -> Result<(), ConverterError>;
}
