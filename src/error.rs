//! Error types for the request pipeline.
//!
//! Each stage returns its own error so the caller can tell a network problem
//! from an API contract change. `PipelineError` is what the orchestrator hands
//! back to `main`.

use serde::Deserialize;
use thiserror::Error;

/// Memory for the response buffer could not be reserved.
#[derive(Debug, Error)]
#[error("out of memory while growing the response buffer to {requested} bytes")]
pub struct AllocationFailure {
    pub requested: usize,
}

/// The request payload could not be serialized.
#[derive(Debug, Error)]
#[error("failed to serialize request payload: {0}")]
pub struct SerializationFailure(#[from] pub serde_json::Error);

/// Failures of the single HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connect or overall request timeout elapsed.
    #[error("request to the API timed out")]
    Timeout,

    /// Connection-level failure (DNS, refused, TLS, reset).
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The server answered with a non-2xx status. `body` holds the bytes as
    /// received; they are only decoded for display.
    #[error("API request failed with HTTP {status}: {}", api_error_message(.body))]
    HttpError { status: u16, body: Vec<u8> },

    /// The body could not be accumulated.
    #[error(transparent)]
    Allocation(#[from] AllocationFailure),
}

/// The API key cannot be sent as an `x-api-key` header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidApiKey {
    #[error("API key is empty")]
    Empty,

    #[error("API key contains characters not allowed in an HTTP header")]
    NotHeaderSafe,
}

/// Failures decoding the API response.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(&'static str),
}

/// First failure of a build → send → parse run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Serialization(#[from] SerializationFailure),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull `error.message` out of a structured API error body, falling back to the
/// raw body text.
pub fn api_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ApiErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned())
}
