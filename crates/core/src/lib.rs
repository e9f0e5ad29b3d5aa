pub mod adaptive;
pub mod batch;
pub mod config;
pub mod converter;
pub mod paths;
pub mod policy;
pub mod probe;
pub mod runner;
pub mod testing;

pub use adaptive::{
    decide_params, describe_streams, resolve_inputs, AdaptiveConverter, AdaptiveOptions, CodecDecision, FileOutcome,
    FileReport, SkipReason, UsageError,
};
pub use batch::{BatchConverter, BatchError, BatchReport, BatchSummary, JobOutcome, JobStatus};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, BatchConfig,
    Config, ConfigError, EncodeConfig,
};
pub use converter::{
    ConversionJob, ConversionPlan, Converter, ConverterConfig, ConverterError, EncodeParams,
    FfmpegConverter, OutputMode, TargetProfile,
};
pub use paths::{find_source_files, safe_output_path};
pub use policy::{is_remux_safe, CodecAllowList, PolicyConfig, RemuxPolicy};
pub use probe::{format_frame_rate, render_report, MediaProbeResult, ReportProfile};
pub use runner::JobRunner;
