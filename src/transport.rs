//! HTTP transport for the Anthropic messages API.
//!
//! Performs exactly one authenticated POST per call. The body is streamed into
//! a [`ResponseBuffer`] and the outcome is classified by status code: 2xx hands
//! back the raw bytes, anything else becomes [`TransportError::HttpError`]
//! carrying the server's body for display.

use crate::buffer::ResponseBuffer;
use crate::config::{Config, Timeouts};
use crate::error::{InvalidApiKey, TransportError};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::error::Error as _;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// API key ready to be sent as the `x-api-key` header.
///
/// The value is marked sensitive and never printed, not even by `Debug`.
#[derive(Clone)]
pub struct ApiKey(HeaderValue);

impl ApiKey {
    /// Validate a trimmed key.
    pub fn new(raw: &str) -> Result<Self, InvalidApiKey> {
        if raw.is_empty() {
            return Err(InvalidApiKey::Empty);
        }
        let mut value = HeaderValue::from_str(raw).map_err(|_| InvalidApiKey::NotHeaderSafe)?;
        value.set_sensitive(true);
        Ok(Self(value))
    }

    /// Length of the key in bytes, for diagnostics.
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    fn header_value(&self) -> HeaderValue {
        self.0.clone()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Status and body of a successful exchange.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Settings the transport is built with.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Value of the `anthropic-version` header.
    pub api_version: String,
    /// Emit per-chunk body traces. Sizes only, never contents.
    pub verbose: bool,
}

impl TransportConfig {
    pub fn from_config(config: &Config, verbose: bool) -> Self {
        Self::with_timeouts(config.timeouts, config.api.version.clone(), verbose)
    }

    pub fn with_timeouts(timeouts: Timeouts, api_version: String, verbose: bool) -> Self {
        Self {
            connect_timeout: timeouts.connect(),
            request_timeout: timeouts.request(),
            api_version,
            verbose,
        }
    }
}

/// Sends a serialized payload and returns the raw reply.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(
        &self,
        endpoint: &str,
        api_key: &ApiKey,
        payload: Vec<u8>,
    ) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
    api_version: String,
    verbose: bool,
}

impl HttpTransport {
    /// Create a new transport.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(classify)?;

        Ok(Self {
            client,
            api_version: config.api_version,
            verbose: config.verbose,
        })
    }
}

#[async_trait]
impl MessageTransport for HttpTransport {
    async fn send(
        &self,
        endpoint: &str,
        api_key: &ApiKey,
        payload: Vec<u8>,
    ) -> Result<RawResponse, TransportError> {
        debug!("Sending API request ({} byte payload)", payload.len());
        let started = Instant::now();

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header("x-api-key", api_key.header_value())
            .header("anthropic-version", self.api_version.as_str())
            .body(payload)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        debug!("HTTP response code: {}", status.as_u16());

        let mut buffer = ResponseBuffer::new(self.verbose);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(classify)?;
            buffer.append(&chunk)?;
        }

        debug!("API request completed in {:.2?}", started.elapsed());
        if buffer.is_empty() {
            debug!("API returned an empty body");
        }

        if !status.is_success() {
            return Err(TransportError::HttpError {
                status: status.as_u16(),
                body: buffer.into_bytes(),
            });
        }

        debug!("API response received (length: {})", buffer.len());
        Ok(RawResponse {
            status: status.as_u16(),
            body: buffer.into_bytes(),
        })
    }
}

/// Map a reqwest failure onto the transport taxonomy.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout;
    }

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    TransportError::NetworkFailure(message)
}
