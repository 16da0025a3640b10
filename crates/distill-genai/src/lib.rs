//! Distill Generation Client
//!
//! Client layer for the remote generative-AI text completion service.
//!
//! # Architecture
//!
//! The batch driver talks to the service through the [`TextGenerator`]
//! trait, so orchestration code never depends on a concrete backend:
//!
//! - [`GeminiClient`]: HTTP client for the Gemini `generateContent` API,
//!   with exponential-backoff retry of transient failures
//! - [`MockGenerator`]: deterministic in-process generator for testing
//!
//! # Examples
//!
//! ```
//! use distill_genai::{MockGenerator, TextGenerator};
//!
//! # async fn example() {
//! let generator = MockGenerator::new(r#"{"title": "hello"}"#);
//! let result = generator.generate("transcript text").await.unwrap();
//! assert_eq!(result, r#"{"title": "hello"}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;
mod retry;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::{GeminiClient, SamplingConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use retry::{retry_with_policy, RetryPolicy};

/// Errors that can occur while generating text
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Request never reached the service or the connection dropped
    #[error("network error: {0}")]
    Network(String),

    /// Service rejected or failed the request with an HTTP error status
    #[error("service error (HTTP {status}): {message}")]
    Service {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// Credential was missing, invalid, or lacked access
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Service rejected the request as malformed
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Service answered but the envelope carried no generated text
    #[error("empty response from service")]
    EmptyResponse,

    /// Retry policy ran out of attempts
    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Total attempts made, including the first
        attempts: u32,
        /// Error from the final attempt
        last: Box<GenerateError>,
    },
}

impl GenerateError {
    /// Whether waiting and retrying is expected to help.
    ///
    /// Network failures, remote rate rejections (429) and 5xx-class service
    /// errors are transient; everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerateError::Network(_) => true,
            GenerateError::Service { status, .. } => {
                *status == 429 || (500..=599).contains(status)
            }
            _ => false,
        }
    }
}

/// Trait for text generation backends
///
/// The seam between batch orchestration and the remote service.
pub trait TextGenerator {
    /// Generate a text completion for the given prompt
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, GenerateError>> + Send;
}

/// Deterministic generator for testing
///
/// Returns scripted responses in order, falling back to a fixed default,
/// without making any network calls.
///
/// # Examples
///
/// ```
/// use distill_genai::{GenerateError, MockGenerator, TextGenerator};
///
/// # async fn example() {
/// let generator = MockGenerator::new("{}");
/// generator.push_failure(GenerateError::Service {
///     status: 503,
///     message: "overloaded".to_string(),
/// });
/// generator.push_response(r#"{"ok": "yes"}"#);
///
/// assert!(generator.generate("first").await.is_err());
/// assert_eq!(generator.generate("second").await.unwrap(), r#"{"ok": "yes"}"#);
/// assert_eq!(generator.generate("third").await.unwrap(), "{}");
/// assert_eq!(generator.call_count(), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockGenerator {
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, GenerateError>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockGenerator {
    /// Create a mock that returns a fixed response once the script is empty
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a successful response for the next unscripted call
    pub fn push_response(&self, response: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(response.into()));
    }

    /// Queue a failure for the next unscripted call
    pub fn push_failure(&self, error: GenerateError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Number of times `generate` has been called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        *self.call_count.lock().unwrap() += 1;

        match self.script.lock().unwrap().pop_front() {
            Some(scripted) => scripted,
            None => Ok(self.default_response.clone()),
        }
    }
}
