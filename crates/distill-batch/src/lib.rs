//! Distill Batch Orchestration
//!
//! Sequential, rate-limited batch driver: walks a directory of transcripts,
//! sends each one through a [`TextGenerator`](distill_genai::TextGenerator),
//! and writes one JSON record per input.
//!
//! # Overview
//!
//! ```text
//! input dir → discover (sorted) → skip existing → throttle → generate
//!           → parse JSON → write output
//! ```
//!
//! One file is processed end-to-end before the next begins; the only
//! suspension points are the rate limiter's sleep and the request await.
//! Resumption after interruption is implicit: outputs already on disk are
//! skipped without a network call, so re-running a partially completed
//! batch finishes only the remaining files.
//!
//! # Examples
//!
//! ```no_run
//! use distill_batch::{BatchConfig, BatchRunner, RateLimiter};
//! use distill_genai::MockGenerator;
//!
//! # async fn example() -> Result<(), distill_batch::BatchError> {
//! let config = BatchConfig::new("transcripts", "records");
//! let mut runner = BatchRunner::new(config, RateLimiter::new(15));
//!
//! let generator = MockGenerator::new(r#"{"title": "x"}"#);
//! let summary = runner.run(&generator).await?;
//! println!("{} completed, {} skipped", summary.completed, summary.skipped);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod limiter;
mod runner;

pub use error::BatchError;
pub use limiter::RateLimiter;
pub use runner::{BatchConfig, BatchItem, BatchRunner, BatchSummary, ErrorMode};
