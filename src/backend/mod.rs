//! Generative backend adapter.
//!
//! The adapter owns transport- and provider-level health only: timeouts,
//! retries with exponential backoff, and the retryable/non-retryable split.
//! It never inspects response *content* — interpreting the payload is the
//! validator's job.

pub mod anthropic;

pub use anthropic::AnthropicBackend;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::prompt::StructuredRequest;

/// Uninterpreted provider output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawResponse {
    pub text: String,
}

/// Transport- and provider-level failures.
///
/// `is_retryable` drives the adapter's internal retry loop; callers only see
/// a retryable error once the budget is exhausted (as `RetriesExhausted`).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network-level failure (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider rate limit (429-equivalent).
    #[error("rate limited by provider")]
    RateLimited,

    /// Provider overloaded (529-equivalent).
    #[error("provider overloaded")]
    Overloaded,

    /// Provider-side server error (5xx-equivalent).
    #[error("provider server error: status {status}")]
    Server { status: u16 },

    /// Authentication or authorization failure. Never retried.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider rejected the request as malformed. Never retried.
    #[error("provider rejected request (status {status}): {message}")]
    Request { status: u16, message: String },

    /// The provider returned a payload the adapter could not frame (missing
    /// content blocks, unparseable envelope). Content-level schema problems
    /// are NOT this error — those belong to the validator.
    #[error("malformed provider payload: {0}")]
    MalformedPayload(String),

    /// Retry budget exhausted; `last` is the final retryable failure.
    #[error("retry budget exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

impl BackendError {
    /// Whether the failure is transient and worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::Transport(_)
                | BackendError::RateLimited
                | BackendError::Overloaded
                | BackendError::Server { .. }
        )
    }
}

/// A generative-language provider.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Invoke the provider once (internally retrying transient failures up
    /// to the configured budget) and return its raw output.
    async fn invoke(&self, request: &StructuredRequest) -> Result<RawResponse, BackendError>;

    /// Provider name, for logs and telemetry.
    fn provider(&self) -> &str;
}
