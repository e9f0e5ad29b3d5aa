//! Parallel batch converter.
//!
//! Converts every source file of one directory to the fixed target profile,
//! with up to `max_workers` encoder processes running at once. Encoder output
//! is suppressed; each job reports its own outcome when it finishes, so
//! outcomes arrive in completion order.

use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::BatchConfig;
use crate::converter::{
    display_name, ConversionJob, ConversionPlan, Converter, TargetProfile, OutputMode,
};
use crate::paths::{find_source_files, safe_output_path};
use crate::runner::JobRunner;

/// Error type for batch runs. Per-file failures are not errors; they are
/// reported as [`JobStatus::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The configured input directory does not exist.
    #[error("Input directory not found: {path}")]
    InputDirNotFound { path: PathBuf },

    /// The output directory could not be created or the input listed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How one job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Succeeded,
    Failed {
        reason: String,
        exit_code: Option<i32>,
    },
}

/// Outcome of one file in a batch run.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// Input file name, used for completion lines.
    pub file_name: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub status: JobStatus,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == JobStatus::Succeeded
    }
}

/// Counts over a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[JobOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Outcomes in completion order.
    pub outcomes: Vec<JobOutcome>,
    pub summary: BatchSummary,
}

/// Runs the fixed-profile conversion over a directory.
pub struct BatchConverter<C: Converter> {
    converter: C,
    config: BatchConfig,
    profile: TargetProfile,
}

impl<C: Converter> BatchConverter<C> {
    pub fn new(converter: C, config: BatchConfig, profile: TargetProfile) -> Self {
        Self {
            converter,
            config,
            profile,
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Source files this run would pick up, sorted.
    pub async fn sources(&self) -> Result<Vec<PathBuf>, BatchError> {
        let input_dir = &self.config.input_dir;
        if !tokio::fs::metadata(input_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(BatchError::InputDirNotFound {
                path: input_dir.clone(),
            });
        }
        Ok(find_source_files(input_dir, &self.config.source_extension).await?)
    }

    /// Converts every source file, calling `on_complete` as each job finishes.
    pub async fn run<F>(&self, on_complete: F) -> Result<BatchReport, BatchError>
    where
        F: FnMut(&JobOutcome),
    {
        let sources = self.sources().await?;
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        if sources.is_empty() {
            return Ok(BatchReport {
                outcomes: Vec::new(),
                summary: BatchSummary::default(),
            });
        }

        let runner = JobRunner::new(self.config.max_workers);
        info!(
            backend = self.converter.name(),
            files = sources.len(),
            workers = runner.concurrency(),
            input_dir = %self.config.input_dir.display(),
            output_dir = %self.config.output_dir.display(),
            "Starting batch conversion"
        );

        let outcomes = runner
            .run_with(sources, |input| self.convert_one(input), on_complete)
            .await;

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch conversion finished"
        );
        Ok(BatchReport { outcomes, summary })
    }

    async fn convert_one(&self, input: PathBuf) -> JobOutcome {
        let output = safe_output_path(
            &input,
            &self.config.output_dir,
            &self.config.target_extension,
        );
        let job = ConversionJob::new(
            input.clone(),
            output.clone(),
            ConversionPlan::Profile(self.profile.clone()),
        );

        let status = match self.converter.convert(job, OutputMode::Suppress).await {
            Ok(_) => JobStatus::Succeeded,
            Err(e) => {
                warn!(
                    input = %input.display(),
                    exit_code = ?e.exit_code(),
                    error = %e,
                    "Conversion failed"
                );
                JobStatus::Failed {
                    reason: e.to_string(),
                    exit_code: e.exit_code(),
                }
            }
        };

        JobOutcome {
            file_name: display_name(&input),
            input_path: input,
            output_path: output,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockConverter};
    use std::path::Path;
    use std::time::Duration;

    fn batch_config(root: &Path, workers: usize) -> BatchConfig {
        BatchConfig {
            input_dir: root.join("source"),
            output_dir: root.join("converted"),
            max_workers: workers,
            ..Default::default()
        }
    }

    fn setup(names: &[&str]) -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("source")).unwrap();
        let files = fixtures::touch_all(&dir.path().join("source"), names).unwrap();
        (dir, files)
    }

    #[tokio::test]
    async fn test_one_invocation_and_outcome_per_input() {
        for workers in [1, 2, 4, 8] {
            let (dir, _) = setup(&["a.mkv", "b.MKV", "c.mkv", "d.mkv", "e.mkv", "notes.txt"]);
            let batch = BatchConverter::new(
                MockConverter::new(),
                batch_config(dir.path(), workers),
                TargetProfile::default(),
            );

            let mut lines = Vec::new();
            let report = batch.run(|o| lines.push(o.file_name.clone())).await.unwrap();

            assert_eq!(batch.converter().conversion_count().await, 5);
            assert_eq!(report.outcomes.len(), 5);
            assert_eq!(lines.len(), 5);
            assert!(batch.converter().peak_concurrency() <= workers);

            let mut names = lines.clone();
            names.sort();
            assert_eq!(names, vec!["a.mkv", "b.MKV", "c.mkv", "d.mkv", "e.mkv"]);
        }
    }

    #[tokio::test]
    async fn test_jobs_use_profile_plan_and_suppressed_output() {
        let (dir, files) = setup(&["show.mkv"]);
        let batch = BatchConverter::new(
            MockConverter::new(),
            batch_config(dir.path(), 4),
            TargetProfile::default(),
        );
        batch.run(|_| {}).await.unwrap();

        let recorded = batch.converter().recorded_conversions().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].output, OutputMode::Suppress);
        assert_eq!(recorded[0].job.input_path, files[0]);
        assert_eq!(
            recorded[0].job.output_path,
            dir.path().join("converted").join("show.mp4")
        );
        assert!(matches!(recorded[0].job.plan, ConversionPlan::Profile(_)));
        assert!(dir.path().join("converted").is_dir());
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_masked() {
        let (dir, files) = setup(&["good.mkv", "bad.mkv", "also_good.mkv"]);
        let converter = MockConverter::new();
        converter.fail_conversion(&files[1], 1).await;

        let batch = BatchConverter::new(
            converter,
            batch_config(dir.path(), 2),
            TargetProfile::default(),
        );
        let report = batch.run(|_| {}).await.unwrap();

        assert_eq!(
            report.summary,
            BatchSummary {
                total: 3,
                succeeded: 2,
                failed: 1
            }
        );
        let failed: Vec<_> = report.outcomes.iter().filter(|o| !o.succeeded()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].file_name, "bad.mkv");
        assert!(matches!(
            failed[0].status,
            JobStatus::Failed {
                exit_code: Some(1),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_outcomes_follow_completion_order() {
        let (dir, files) = setup(&["slow.mkv", "fast.mkv"]);
        let converter = MockConverter::new();
        converter
            .set_conversion_delay(&files[1], Duration::from_millis(100))
            .await;

        let batch = BatchConverter::new(
            converter,
            batch_config(dir.path(), 2),
            TargetProfile::default(),
        );
        let report = batch.run(|_| {}).await.unwrap();

        let names: Vec<_> = report.outcomes.iter().map(|o| o.file_name.as_str()).collect();
        // "fast.mkv" sorts first but is the one made slow here
        assert_eq!(names, vec!["slow.mkv", "fast.mkv"]);
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let (dir, _) = setup(&[]);
        let batch = BatchConverter::new(
            MockConverter::new(),
            batch_config(dir.path(), 4),
            TargetProfile::default(),
        );
        let report = batch.run(|_| {}).await.unwrap();

        assert!(report.outcomes.is_empty());
        assert_eq!(report.summary, BatchSummary::default());
        assert!(dir.path().join("converted").is_dir());
    }

    #[tokio::test]
    async fn test_missing_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let batch = BatchConverter::new(
            MockConverter::new(),
            batch_config(dir.path(), 4),
            TargetProfile::default(),
        );
        let err = batch.run(|_| {}).await.unwrap_err();
        assert!(matches!(err, BatchError::InputDirNotFound { .. }));
    }
}
