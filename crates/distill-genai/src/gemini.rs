//! Gemini API client
//!
//! HTTP integration with the Gemini `generateContent` endpoint. Every
//! request carries the prompt, a fixed sampling configuration, a fixed
//! system instruction, and the translated response schema so the service
//! returns a JSON document of the configured shape.

use crate::retry::{retry_with_policy, RetryPolicy};
use crate::{GenerateError, TextGenerator};
use distill_schema::ServiceSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Per-request timeout (2 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const SYSTEM_INSTRUCTION: &str = "Please output JSON according to the schema.";

/// Sampling configuration sent with every request
#[derive(Debug, Clone, Copy)]
pub struct SamplingConfig {
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    /// Top-k sampling cutoff
    pub top_k: i32,
    /// Maximum tokens the service may generate
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}

/// Client for the Gemini generation service
///
/// Wraps a single `generateContent` call with the configured retry policy.
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: String,
    sampling: SamplingConfig,
    schema: ServiceSchema,
    retry: RetryPolicy,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
    response_schema: &'a ServiceSchema,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiClient {
    /// Create a new client for the default endpoint.
    ///
    /// # Parameters
    ///
    /// - `api_key`: service credential
    /// - `model`: model to use (e.g. [`DEFAULT_MODEL`])
    /// - `schema`: translated response-shape constraint
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        schema: ServiceSchema,
    ) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GenerateError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            sampling: SamplingConfig::default(),
            schema,
            retry: RetryPolicy::default(),
            client,
        })
    }

    /// Override the API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the sampling configuration
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generate a completion, retrying transient failures per the policy.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::RetriesExhausted`] once the policy gives up
    /// on a transient condition; authentication and request-validation
    /// failures propagate immediately without retry.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        retry_with_policy(&self.retry, || self.request_once(prompt)).await
    }

    /// Issue exactly one request, classifying failures by status.
    async fn request_once(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: self.sampling.temperature,
                top_p: self.sampling.top_p,
                top_k: self.sampling.top_k,
                max_output_tokens: self.sampling.max_output_tokens,
                response_mime_type: "application/json",
                response_schema: &self.schema,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(match status.as_u16() {
                401 | 403 => GenerateError::Auth(message),
                400 | 404 => GenerateError::InvalidRequest(message),
                code => GenerateError::Service {
                    status: code,
                    message,
                },
            });
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Network(format!("failed to read response: {e}")))?;

        extract_text(envelope)
    }
}

/// Pull the generated text out of the response envelope.
fn extract_text(envelope: GenerateContentResponse) -> Result<String, GenerateError> {
    let text: String = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GenerateError::EmptyResponse);
    }
    Ok(text)
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.generate(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distill_schema::{translate, SchemaNode};
    use serde_json::json;

    fn schema() -> ServiceSchema {
        let doc = json!({
            "type": "object",
            "properties": { "title": { "type": "string" } },
            "required": ["title"]
        });
        translate(&SchemaNode::from_value(&doc).unwrap())
    }

    #[test]
    fn test_client_defaults() {
        let client = GeminiClient::new("key", DEFAULT_MODEL, schema()).unwrap();
        assert_eq!(client.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.sampling.top_k, 40);
    }

    #[test]
    fn test_builder_overrides() {
        let client = GeminiClient::new("key", "custom-model", schema())
            .unwrap()
            .with_endpoint("http://localhost:8080")
            .with_retry_policy(RetryPolicy::default().with_max_attempts(2));
        assert_eq!(client.endpoint, "http://localhost:8080");
        assert_eq!(client.retry.max_attempts, 2);
    }

    #[test]
    fn test_request_wire_shape() {
        let schema = schema();
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "transcript".to_string(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: 1.0,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 8192,
                response_mime_type: "application/json",
                response_schema: &schema,
            },
        };

        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(wire["contents"][0]["parts"][0]["text"], "transcript");
        assert_eq!(
            wire["systemInstruction"]["parts"][0]["text"],
            SYSTEM_INSTRUCTION
        );
        assert_eq!(wire["generationConfig"]["topK"], 40);
        assert_eq!(
            wire["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            wire["generationConfig"]["responseSchema"]["type"],
            "OBJECT"
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let envelope = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![
                        Part {
                            text: "{\"a\":".to_string(),
                        },
                        Part {
                            text: " 1}".to_string(),
                        },
                    ],
                }),
            }],
        };
        assert_eq!(extract_text(envelope).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_text_empty_envelope() {
        let envelope = GenerateContentResponse { candidates: vec![] };
        assert!(matches!(
            extract_text(envelope),
            Err(GenerateError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_connection_error_is_network() {
        // Unroutable endpoint, single attempt
        let client = GeminiClient::new("key", DEFAULT_MODEL, schema())
            .unwrap()
            .with_endpoint("http://127.0.0.1:1")
            .with_retry_policy(RetryPolicy::default().with_max_attempts(1));

        match client.generate("text").await {
            Err(GenerateError::RetriesExhausted { last, .. }) => {
                assert!(matches!(*last, GenerateError::Network(_)));
            }
            other => panic!("expected exhausted network error, got {other:?}"),
        }
    }
}
