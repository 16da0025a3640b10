//! Error types for batch orchestration

use distill_genai::GenerateError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running a batch.
///
/// Every variant names the file or directory involved so an aborted run can
/// be diagnosed and resumed.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Input directory could not be listed
    #[error("failed to list input directory {}: {source}", path.display())]
    List {
        /// Input directory
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Output directory could not be created
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        /// Output directory
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Input file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Input file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Output file could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Output file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Generation failed after the retry policy gave up
    #[error("generation failed for {}: {source}", path.display())]
    Generate {
        /// Input file whose request failed
        path: PathBuf,
        /// Underlying client error
        source: GenerateError,
    },

    /// Service response was not a valid JSON document
    #[error("response for {} is not valid JSON: {source}", path.display())]
    Parse {
        /// Input file whose response failed to parse
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },
}
