//! Settings resolution for the CLI.
//!
//! Precedence, lowest to highest: compiled defaults, optional TOML settings
//! file, command-line flags.

use crate::cli::Cli;
use crate::error::Result;
use distill_batch::{BatchConfig, ErrorMode};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default input directory
pub const DEFAULT_INPUT_DIR: &str = "transcripts";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "records";

/// Default schema document path
pub const DEFAULT_SCHEMA: &str = "schema.json";

/// Default requests-per-minute ceiling
pub const DEFAULT_RPM: usize = 15;

/// Default input extension (without dot)
pub const DEFAULT_INPUT_EXT: &str = "md";

/// Optional settings file contents; every field may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory of input transcripts
    pub input_dir: Option<PathBuf>,
    /// Directory the JSON records are written to
    pub output_dir: Option<PathBuf>,
    /// JSON Schema document path
    pub schema: Option<PathBuf>,
    /// Model to request
    pub model: Option<String>,
    /// Generation service endpoint
    pub endpoint: Option<String>,
    /// Requests-per-minute ceiling
    pub rpm: Option<usize>,
    /// Input file extension
    pub input_ext: Option<String>,
    /// Keep going on per-file failures
    pub continue_on_error: Option<bool>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory of input transcripts
    pub input_dir: PathBuf,
    /// Directory the JSON records are written to
    pub output_dir: PathBuf,
    /// JSON Schema document path
    pub schema: PathBuf,
    /// Model to request
    pub model: String,
    /// Generation service endpoint
    pub endpoint: String,
    /// Requests-per-minute ceiling
    pub rpm: usize,
    /// Input file extension
    pub input_ext: String,
    /// Keep going on per-file failures
    pub continue_on_error: bool,
}

impl RunConfig {
    /// Merge CLI flags over settings-file values over compiled defaults.
    pub fn resolve(cli: &Cli, settings: Settings) -> Self {
        Self {
            input_dir: cli
                .input_dir
                .clone()
                .or(settings.input_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR)),
            output_dir: cli
                .output_dir
                .clone()
                .or(settings.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            schema: cli
                .schema
                .clone()
                .or(settings.schema)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA)),
            model: cli
                .model
                .clone()
                .or(settings.model)
                .unwrap_or_else(|| distill_genai::DEFAULT_MODEL.to_string()),
            endpoint: cli
                .endpoint
                .clone()
                .or(settings.endpoint)
                .unwrap_or_else(|| distill_genai::DEFAULT_ENDPOINT.to_string()),
            rpm: cli.rpm.or(settings.rpm).unwrap_or(DEFAULT_RPM),
            input_ext: cli
                .input_ext
                .clone()
                .or(settings.input_ext)
                .unwrap_or_else(|| DEFAULT_INPUT_EXT.to_string()),
            continue_on_error: cli
                .continue_on_error
                .or(settings.continue_on_error)
                .unwrap_or(false),
        }
    }

    /// Batch driver configuration for this run.
    pub fn batch_config(&self) -> BatchConfig {
        let mode = if self.continue_on_error {
            ErrorMode::Continue
        } else {
            ErrorMode::FailFast
        };
        BatchConfig::new(&self.input_dir, &self.output_dir)
            .with_input_ext(&self.input_ext)
            .with_error_mode(mode)
    }
}
