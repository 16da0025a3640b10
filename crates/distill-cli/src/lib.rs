//! Distill CLI library.
//!
//! Argument parsing, settings resolution, and error plumbing for the
//! `distill` binary, which converts a directory of transcripts into
//! structured JSON records via a remote generation service.

pub mod cli;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use config::{RunConfig, Settings};
pub use error::{CliError, Result};
