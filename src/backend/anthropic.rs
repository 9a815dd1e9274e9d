//! Anthropic Messages API backend.
//!
//! Direct integration via `reqwest` with retry and exponential backoff on
//! transient failures (network errors, 429, 529, 5xx). Client errors fail
//! immediately. Emits one latency/outcome observation per `invoke` call.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use super::{BackendError, GenerativeBackend, RawResponse};
use crate::prompt::StructuredRequest;
use crate::telemetry::{telemetry, CallObservation, CallOutcome};

/// Default model used for persona simulation.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Anthropic Messages API adapter.
#[derive(Debug, Clone)]
pub struct AnthropicBackend {
    /// Model name (e.g. [`DEFAULT_MODEL`]).
    pub model: String,
    /// API key. Defaults to the `ANTHROPIC_API_KEY` environment variable.
    pub api_key: Option<String>,
    /// Custom base URL override.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout: f64,
    /// Maximum retries after the first attempt (2 → 3 attempts total).
    pub max_retries: u32,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
    /// Anthropic API version header.
    pub anthropic_version: String,
}

impl AnthropicBackend {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `model` - Anthropic model name.
    /// * `api_key` - Optional API key (defaults to `ANTHROPIC_API_KEY`).
    /// * `base_url` - Optional custom base URL.
    pub fn new(
        model: impl Into<String>,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        let api_key = api_key.or_else(|| std::env::var("ANTHROPIC_API_KEY").ok());
        Self {
            model: model.into(),
            api_key,
            base_url,
            timeout: 60.0,
            max_retries: 2,
            max_tokens: 2000,
            anthropic_version: "2023-06-01".to_string(),
        }
    }

    /// Get the API base URL.
    pub fn api_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| "https://api.anthropic.com".to_string())
    }

    /// Build the request body for the Anthropic Messages API.
    ///
    /// The structured request's system block maps to the separate `system`
    /// parameter; the user block becomes the single user message.
    pub fn build_request_body(&self, request: &StructuredRequest) -> Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": request.system,
            "messages": [{
                "role": "user",
                "content": request.user,
            }],
        })
    }

    /// Concatenate the text blocks of a Messages API response.
    fn extract_text(response: &Value) -> Result<String, BackendError> {
        let content = response
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                BackendError::MalformedPayload("no content array in response".to_string())
            })?;

        let mut parts: Vec<&str> = Vec::new();
        for block in content {
            let block_type = block.get("type").and_then(|t| t.as_str()).unwrap_or("");
            match block_type {
                "text" => {
                    if let Some(text) = block.get("text").and_then(|t| t.as_str()) {
                        parts.push(text);
                    }
                }
                other => {
                    log::debug!("ignoring content block type: {}", other);
                }
            }
        }

        if parts.is_empty() {
            return Err(BackendError::MalformedPayload(
                "response carried no text blocks".to_string(),
            ));
        }
        Ok(parts.join(""))
    }

    fn observe(&self, outcome: CallOutcome, latency: Duration, attempts: u32) {
        telemetry().record(CallObservation {
            provider: self.provider().to_string(),
            outcome,
            latency_ms: latency.as_millis() as u64,
            attempts,
        });
    }
}

#[async_trait]
impl GenerativeBackend for AnthropicBackend {
    async fn invoke(&self, request: &StructuredRequest) -> Result<RawResponse, BackendError> {
        let started = Instant::now();

        let api_key = match self.api_key.as_ref() {
            Some(key) => key,
            None => {
                let err = BackendError::Auth(
                    "API key not set; set ANTHROPIC_API_KEY or pass api_key".to_string(),
                );
                self.observe(CallOutcome::NonRetryableFailure, started.elapsed(), 0);
                return Err(err);
            }
        };

        let body = self.build_request_body(request);
        let endpoint = format!("{}/v1/messages", self.api_base_url());

        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(self.timeout))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                self.observe(CallOutcome::NonRetryableFailure, started.elapsed(), 0);
                return Err(BackendError::Transport(e.to_string()));
            }
        };

        let mut last_error = BackendError::Transport("no attempt made".to_string());
        let mut retry_delay = Duration::from_secs(1);
        let mut attempts = 0u32;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                log::warn!(
                    "anthropic retry attempt {} after {:?}: {}",
                    attempt,
                    retry_delay,
                    last_error
                );
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }
            attempts += 1;

            let response = match client
                .post(&endpoint)
                .header("content-type", "application/json")
                .header("x-api-key", api_key.as_str())
                .header("anthropic-version", &self.anthropic_version)
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = BackendError::Transport(e.to_string());
                    continue;
                }
            };

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if let Some(retry_after) = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                {
                    retry_delay = Duration::from_secs(retry_after);
                }
                last_error = BackendError::RateLimited;
                continue;
            }

            if status.as_u16() == 529 {
                last_error = BackendError::Overloaded;
                continue;
            }

            if status.is_server_error() {
                last_error = BackendError::Server {
                    status: status.as_u16(),
                };
                continue;
            }

            let response_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    last_error = BackendError::Transport(e.to_string());
                    continue;
                }
            };

            // Client errors are never retried.
            if status.is_client_error() {
                let err = match status.as_u16() {
                    401 | 403 => BackendError::Auth(response_text),
                    code => BackendError::Request {
                        status: code,
                        message: response_text,
                    },
                };
                self.observe(CallOutcome::NonRetryableFailure, started.elapsed(), attempts);
                return Err(err);
            }

            let response_json: Value = match serde_json::from_str(&response_text) {
                Ok(json) => json,
                Err(e) => {
                    let head: String = response_text.chars().take(500).collect();
                    let err = BackendError::MalformedPayload(format!(
                        "unparseable response envelope: {} - body: {}",
                        e, head
                    ));
                    self.observe(CallOutcome::NonRetryableFailure, started.elapsed(), attempts);
                    return Err(err);
                }
            };

            // API-level error envelope with a 2xx transport status.
            if response_json.get("type").and_then(|t| t.as_str()) == Some("error") {
                let message = response_json
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .unwrap_or("unknown provider error")
                    .to_string();
                let err = BackendError::Request {
                    status: status.as_u16(),
                    message,
                };
                self.observe(CallOutcome::NonRetryableFailure, started.elapsed(), attempts);
                return Err(err);
            }

            match Self::extract_text(&response_json) {
                Ok(text) => {
                    self.observe(CallOutcome::Success, started.elapsed(), attempts);
                    return Ok(RawResponse { text });
                }
                Err(err) => {
                    self.observe(CallOutcome::NonRetryableFailure, started.elapsed(), attempts);
                    return Err(err);
                }
            }
        }

        let err = BackendError::RetriesExhausted {
            attempts,
            last: last_error.to_string(),
        };
        self.observe(CallOutcome::RetryableFailure, started.elapsed(), attempts);
        Err(err)
    }

    fn provider(&self) -> &str {
        "anthropic"
    }
}
