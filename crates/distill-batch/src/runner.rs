//! Batch driver: discovery, resume, and per-file processing

use crate::error::BatchError;
use crate::limiter::RateLimiter;
use distill_genai::TextGenerator;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Extension written for every output file
const OUTPUT_EXT: &str = "json";

/// What to do when a file fails after retries are exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// Abort the whole batch on the first unrecovered failure (default)
    FailFast,
    /// Record the failure in the summary and move on to the next file
    Continue,
}

/// Configuration for a batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory holding the input transcripts
    pub input_dir: PathBuf,
    /// Directory the JSON records are written to
    pub output_dir: PathBuf,
    /// Extension (without dot) selecting input files
    pub input_ext: String,
    /// Failure handling mode
    pub error_mode: ErrorMode,
}

impl BatchConfig {
    /// Create a configuration with the default `md` extension and
    /// fail-fast error handling
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            input_ext: "md".to_string(),
            error_mode: ErrorMode::FailFast,
        }
    }

    /// Select a different input extension (without dot)
    pub fn with_input_ext(mut self, input_ext: impl Into<String>) -> Self {
        self.input_ext = input_ext.into();
        self
    }

    /// Select the failure handling mode
    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }
}

/// One unit of work: an input transcript and its derived output path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    /// Input transcript
    pub input: PathBuf,
    /// Output record, same name with the `.json` extension
    pub output: PathBuf,
}

/// Outcome counts for a completed run
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files processed and written this run
    pub completed: usize,
    /// Files whose output already existed
    pub skipped: usize,
    /// Per-file failures (only populated in [`ErrorMode::Continue`])
    pub failures: Vec<(PathBuf, BatchError)>,
}

impl BatchSummary {
    /// Whether the run finished without any per-file failure
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives a batch end-to-end: one file at a time, in lexicographic order,
/// skipping files whose output already exists.
pub struct BatchRunner {
    config: BatchConfig,
    limiter: RateLimiter,
}

impl BatchRunner {
    /// Create a runner from a configuration and a rate limiter
    pub fn new(config: BatchConfig, limiter: RateLimiter) -> Self {
        Self { config, limiter }
    }

    /// List pending work: input files with the configured extension,
    /// sorted lexicographically for deterministic, resumable ordering.
    pub fn discover(&self) -> Result<Vec<BatchItem>, BatchError> {
        let entries = fs::read_dir(&self.config.input_dir).map_err(|source| BatchError::List {
            path: self.config.input_dir.clone(),
            source,
        })?;

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| BatchError::List {
                path: self.config.input_dir.clone(),
                source,
            })?;
            let input = entry.path();
            if input.extension().and_then(|e| e.to_str()) != Some(self.config.input_ext.as_str()) {
                continue;
            }
            items.push(BatchItem {
                output: self.output_path_for(&input),
                input,
            });
        }

        items.sort_by(|a, b| a.input.cmp(&b.input));
        Ok(items)
    }

    /// Derive the output path: swap directory and extension
    fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.config.output_dir.join(format!("{stem}.{OUTPUT_EXT}"))
    }

    /// Run the batch to completion.
    ///
    /// # Errors
    ///
    /// In [`ErrorMode::FailFast`] the first unrecovered per-file error
    /// aborts the run; outputs written earlier in the run stay on disk and
    /// are skipped on the next attempt. In [`ErrorMode::Continue`] per-file
    /// errors are collected in the summary instead.
    pub async fn run<G: TextGenerator>(
        &mut self,
        generator: &G,
    ) -> Result<BatchSummary, BatchError> {
        fs::create_dir_all(&self.config.output_dir).map_err(|source| BatchError::CreateDir {
            path: self.config.output_dir.clone(),
            source,
        })?;

        let items = self.discover()?;
        info!(
            "discovered {} input files in {}",
            items.len(),
            self.config.input_dir.display()
        );

        let mut summary = BatchSummary::default();
        for (index, item) in items.iter().enumerate() {
            if item.output.exists() {
                debug!("skipping {}, output exists", item.input.display());
                summary.skipped += 1;
                continue;
            }

            info!(
                "[{}/{}] processing {}",
                index + 1,
                items.len(),
                item.input.display()
            );
            match self.process(generator, item).await {
                Ok(()) => summary.completed += 1,
                Err(e) => match self.config.error_mode {
                    ErrorMode::FailFast => return Err(e),
                    ErrorMode::Continue => {
                        error!("{e}");
                        summary.failures.push((item.input.clone(), e));
                    }
                },
            }
        }

        info!(
            "batch finished: {} completed, {} skipped, {} failed",
            summary.completed,
            summary.skipped,
            summary.failures.len()
        );
        Ok(summary)
    }

    /// Process one file: read, throttle, generate, parse, write.
    async fn process<G: TextGenerator>(
        &mut self,
        generator: &G,
        item: &BatchItem,
    ) -> Result<(), BatchError> {
        let text = fs::read_to_string(&item.input).map_err(|source| BatchError::Read {
            path: item.input.clone(),
            source,
        })?;

        self.limiter.throttle().await;
        let response =
            generator
                .generate(&text)
                .await
                .map_err(|source| BatchError::Generate {
                    path: item.input.clone(),
                    source,
                })?;
        self.limiter.record();

        let document: serde_json::Value =
            serde_json::from_str(&response).map_err(|source| BatchError::Parse {
                path: item.input.clone(),
                source,
            })?;

        // 2-space indentation, non-ASCII left literal
        let pretty = serde_json::to_string_pretty(&document).map_err(|source| BatchError::Parse {
            path: item.input.clone(),
            source,
        })?;
        fs::write(&item.output, pretty).map_err(|source| BatchError::Write {
            path: item.output.clone(),
            source,
        })?;

        Ok(())
    }
}
