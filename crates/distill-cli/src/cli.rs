//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Convert a directory of text transcripts into structured JSON records.
///
/// Each input file is sent once to the generation service with the
/// configured response schema; outputs that already exist are skipped, so
/// an interrupted batch can simply be re-run.
#[derive(Debug, Parser)]
#[command(name = "distill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory of input transcripts
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Directory the JSON records are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JSON Schema document describing the output shape
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Model to request
    #[arg(short, long)]
    pub model: Option<String>,

    /// Generation service endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Requests-per-minute ceiling (0 disables throttling)
    #[arg(short, long)]
    pub rpm: Option<usize>,

    /// Input file extension, without the dot
    #[arg(long)]
    pub input_ext: Option<String>,

    /// Record per-file failures and keep going instead of aborting
    /// (accepts an explicit =true/=false to override the settings file)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub continue_on_error: Option<bool>,

    /// API credential for the generation service
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Settings file (TOML); flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
