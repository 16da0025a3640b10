//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Schema loading or validation error
    #[error("schema error: {0}")]
    Schema(#[from] distill_schema::SchemaError),

    /// Client construction or generation error
    #[error("generation error: {0}")]
    Generate(#[from] distill_genai::GenerateError),

    /// Batch run error
    #[error("batch error: {0}")]
    Batch(#[from] distill_batch::BatchError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file parsing error
    #[error("settings file error: {0}")]
    Toml(#[from] toml::de::Error),
}
