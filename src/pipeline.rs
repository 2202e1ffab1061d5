//! Build → send → parse.

use crate::config::ApiConfig;
use crate::error::PipelineError;
use crate::payload;
use crate::response::{self, CommitMessage};
use crate::transport::{ApiKey, MessageTransport};
use tracing::debug;

/// Runs one request through the pipeline.
pub struct Pipeline<T> {
    api: ApiConfig,
    transport: T,
}

impl<T: MessageTransport> Pipeline<T> {
    pub fn new(api: ApiConfig, transport: T) -> Self {
        Self { api, transport }
    }

    /// Ask the model for a title and description of `diff`.
    ///
    /// The first failing stage ends the run; nothing partial is returned.
    pub async fn generate(
        &self,
        api_key: &ApiKey,
        profile: &str,
        diff: &str,
    ) -> Result<CommitMessage, PipelineError> {
        debug!("Preparing API request");
        let body = payload::build(&self.api, profile, diff)?;

        let raw = self
            .transport
            .send(&self.api.endpoint, api_key, body)
            .await?;
        debug!("Received HTTP {} with {} bytes", raw.status, raw.body.len());

        Ok(response::parse(&raw.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, TransportError};
    use crate::transport::RawResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a canned outcome and records what it was given.
    struct StubTransport {
        reply: Mutex<Option<Result<RawResponse, TransportError>>>,
        seen: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl StubTransport {
        fn new(reply: Result<RawResponse, TransportError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn ok(body: &str) -> Self {
            Self::new(Ok(RawResponse {
                status: 200,
                body: body.as_bytes().to_vec(),
            }))
        }
    }

    #[async_trait]
    impl MessageTransport for StubTransport {
        async fn send(
            &self,
            endpoint: &str,
            _api_key: &ApiKey,
            payload: Vec<u8>,
        ) -> Result<RawResponse, TransportError> {
            self.seen
                .lock()
                .unwrap()
                .push((endpoint.to_string(), payload));
            self.reply
                .lock()
                .unwrap()
                .take()
                .expect("transport called more than once")
        }
    }

    fn key() -> ApiKey {
        ApiKey::new("sk-test").unwrap()
    }

    #[tokio::test]
    async fn test_success() {
        let pipeline = Pipeline::new(
            ApiConfig::default(),
            StubTransport::ok(r#"{"content":[{"text":"Add cache\n\nSpeeds up lookups."}]}"#),
        );

        let msg = pipeline
            .generate(&key(), "Rust dev", "diff --git a/x b/x")
            .await
            .unwrap();
        assert_eq!(msg.title, "Add cache");
        assert_eq!(msg.description, "\nSpeeds up lookups.");

        let seen = pipeline.transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "https://api.anthropic.com/v1/messages");
        let sent: serde_json::Value = serde_json::from_slice(&seen[0].1).unwrap();
        assert_eq!(
            sent["messages"][0]["content"],
            payload::render_prompt("Rust dev", "diff --git a/x b/x")
        );
    }

    #[tokio::test]
    async fn test_transport_error_surfaces_verbatim() {
        let pipeline = Pipeline::new(
            ApiConfig::default(),
            StubTransport::new(Err(TransportError::HttpError {
                status: 401,
                body: b"denied".to_vec(),
            })),
        );

        let err = pipeline.generate(&key(), "p", "d").await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Transport(TransportError::HttpError { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_timeout_surfaces_verbatim() {
        let pipeline = Pipeline::new(
            ApiConfig::default(),
            StubTransport::new(Err(TransportError::Timeout)),
        );
        let err = pipeline.generate(&key(), "p", "d").await.unwrap_err();
        assert!(matches!(err, PipelineError::Transport(TransportError::Timeout)));
    }

    #[tokio::test]
    async fn test_parse_error_surfaces_verbatim() {
        let pipeline = Pipeline::new(ApiConfig::default(), StubTransport::ok(r#"{"content":[]}"#));
        let err = pipeline.generate(&key(), "p", "d").await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Parse(ParseError::UnexpectedShape(_))
        ));
    }
}
