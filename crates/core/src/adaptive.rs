//! Adaptive converter: remux when the codecs allow it, re-encode otherwise.
//!
//! Inputs are processed one at a time with the encoder's output streamed to
//! the console. Every input ends in its own [`FileOutcome`]; a missing file or
//! a failed encode never stops the files after it.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::converter::{
    display_name, ConversionJob, ConversionPlan, Converter, EncodeParams, OutputMode,
};
use crate::paths::{find_source_files, safe_output_path};
use crate::policy::RemuxPolicy;
use crate::probe::MediaProbeResult;
use crate::runner::JobRunner;

/// Invalid input/mode combination. The CLI exits with status 1 on these.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("Please specify an input MKV file or use --batch to process a directory.")]
    MissingInput,

    #[error("--batch requires an input directory (or path).")]
    MissingBatchDirectory,

    #[error("Failed to list {path}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turns the positional input and `--batch` flag into the list of inputs.
///
/// Without `--batch` the path is the only input, whether it exists or not;
/// existence is checked per file later. With `--batch` the path is listed.
pub async fn resolve_inputs(
    input: Option<&Path>,
    batch: bool,
    extension: &str,
) -> Result<Vec<PathBuf>, UsageError> {
    match (input, batch) {
        (None, true) => Err(UsageError::MissingBatchDirectory),
        (None, false) => Err(UsageError::MissingInput),
        (Some(path), false) => Ok(vec![path.to_path_buf()]),
        (Some(path), true) => {
            find_source_files(path, extension)
                .await
                .map_err(|source| UsageError::Listing {
                    path: path.to_path_buf(),
                    source,
                })
        }
    }
}

/// Settings shared by every file of one run.
#[derive(Debug, Clone)]
pub struct AdaptiveOptions {
    pub output_dir: PathBuf,
    /// Output extension; also the container looked up in the remux policy.
    pub target_extension: String,
    /// Caller's parameters before the codec decision.
    pub params: EncodeParams,
    /// Probe codecs before deciding. Off means the caller's flags are used as-is.
    pub probe: bool,
}

impl Default for AdaptiveOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            target_extension: "mp4".to_string(),
            params: EncodeParams::default(),
            probe: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The input is not an existing regular file.
    MissingInput,
}

/// How the stream handling for one file was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecDecision {
    /// Both streams were forced to re-encode, so nothing was probed.
    Forced,
    /// Probing was disabled; the caller's flags were used unchanged.
    Unprobed,
    /// Codecs were probed and checked against the policy.
    Probed {
        video: Option<String>,
        audio: Option<String>,
        remux_safe: bool,
    },
    /// Probing failed; both streams are re-encoded.
    ProbeFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Skipped(SkipReason),
    Done {
        output: PathBuf,
    },
    Failed {
        reason: String,
        exit_code: Option<i32>,
    },
}

/// Per-input result of an adaptive run.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `None` when the file was skipped before the decision.
    pub decision: Option<CodecDecision>,
    /// Parameters the encoder actually ran with.
    pub params: Option<EncodeParams>,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn file_name(&self) -> String {
        display_name(&self.input)
    }

    fn skipped(input: PathBuf, output: PathBuf, reason: SkipReason) -> Self {
        Self {
            input,
            output,
            decision: None,
            params: None,
            outcome: FileOutcome::Skipped(reason),
        }
    }
}

/// Final parameters for a probed file.
///
/// Safe files keep the caller's flags. Unsafe files get both streams
/// re-encoded, unless video was already forced, in which case audio is only
/// re-encoded when its codec is not allowed either.
pub fn decide_params(
    policy: &RemuxPolicy,
    container: &str,
    params: &EncodeParams,
    probe: &MediaProbeResult,
) -> (CodecDecision, EncodeParams) {
    let (video, audio) = probe.primary_codecs();
    let remux_safe = policy.is_remux_safe(container, video.as_deref(), audio.as_deref());

    let mut decided = params.clone();
    if !remux_safe {
        if !params.reencode_video {
            decided = decided.with_full_reencode();
        } else {
            let audio_ok = policy
                .allow_list(container)
                .map(|allow| allow.allows_audio(audio.as_deref()))
                .unwrap_or(false);
            decided.reencode_audio |= !audio_ok;
        }
    }

    (
        CodecDecision::Probed {
            video,
            audio,
            remux_safe,
        },
        decided,
    )
}

/// Human-readable stream handling, e.g. "re-encoding video to h264, copying audio".
pub fn describe_streams(params: &EncodeParams) -> String {
    let video = if params.reencode_video {
        "re-encoding video to h264"
    } else {
        "copying video"
    };
    let audio = if params.reencode_audio {
        "re-encoding audio to AAC"
    } else {
        "copying audio"
    };
    format!("{}, {}", video, audio)
}

/// Processes inputs one at a time.
pub struct AdaptiveConverter<C: Converter> {
    converter: C,
    policy: RemuxPolicy,
    options: AdaptiveOptions,
}

impl<C: Converter> AdaptiveConverter<C> {
    pub fn new(converter: C, policy: RemuxPolicy, options: AdaptiveOptions) -> Self {
        Self {
            converter,
            policy,
            options,
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn options(&self) -> &AdaptiveOptions {
        &self.options
    }

    /// Runs every input in order, calling `on_complete` after each one.
    pub async fn process<F>(&self, inputs: Vec<PathBuf>, on_complete: F) -> Vec<FileReport>
    where
        F: FnMut(&FileReport),
    {
        JobRunner::sequential()
            .run_with(inputs, |input| self.process_one(input), on_complete)
            .await
    }

    async fn process_one(&self, input: PathBuf) -> FileReport {
        let output = safe_output_path(
            &input,
            &self.options.output_dir,
            &self.options.target_extension,
        );

        let is_file = tokio::fs::metadata(&input)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            debug!(input = %input.display(), "Input is not a regular file");
            return FileReport::skipped(input, output, SkipReason::MissingInput);
        }

        // Existing outputs are replaced; the encoder always runs with -y.

        let (decision, params) = self.decide(&input).await;

        let job = ConversionJob::new(
            input.clone(),
            output.clone(),
            ConversionPlan::Adaptive(params.clone()),
        );
        let outcome = match self.converter.convert(job, OutputMode::Inherit).await {
            Ok(result) => FileOutcome::Done {
                output: result.output_path,
            },
            Err(e) => {
                warn!(
                    input = %input.display(),
                    exit_code = ?e.exit_code(),
                    "ffmpeg failed: {}", e
                );
                FileOutcome::Failed {
                    reason: e.to_string(),
                    exit_code: e.exit_code(),
                }
            }
        };

        FileReport {
            input,
            output,
            decision: Some(decision),
            params: Some(params),
            outcome,
        }
    }

    async fn decide(&self, input: &Path) -> (CodecDecision, EncodeParams) {
        let params = &self.options.params;
        if params.reencodes_everything() {
            return (CodecDecision::Forced, params.clone());
        }
        if !self.options.probe {
            return (CodecDecision::Unprobed, params.clone());
        }

        match self.converter.probe(input).await {
            Ok(probe) => {
                let (decision, decided) =
                    decide_params(&self.policy, &self.options.target_extension, params, &probe);
                if let CodecDecision::Probed {
                    video,
                    audio,
                    remux_safe,
                } = &decision
                {
                    info!(
                        input = %input.display(),
                        "Detected codecs: video={} audio={}",
                        video.as_deref().unwrap_or("None"),
                        audio.as_deref().unwrap_or("None")
                    );
                    if *remux_safe {
                        info!("Codec combination looks safe for remuxing; copying streams");
                    } else {
                        info!("Codecs are not safe to remux; {}", describe_streams(&decided));
                    }
                }
                (decision, decided)
            }
            Err(e) => {
                warn!(
                    input = %input.display(),
                    "ffprobe failed; falling back to re-encoding: {}", e
                );
                (
                    CodecDecision::ProbeFailed {
                        reason: e.to_string(),
                    },
                    params.clone().with_full_reencode(),
                )
            }
        }
    }
}
