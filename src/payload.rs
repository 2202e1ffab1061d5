//! Request body for the messages API.

use crate::config::ApiConfig;
use crate::error::SerializationFailure;
use serde::Serialize;
use tracing::debug;

/// Body of a `POST /v1/messages` call.
#[derive(Debug, Serialize)]
pub struct RequestPayload<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

/// Interpolate the profile and diff into the instruction sent to the model.
pub fn render_prompt(profile: &str, diff: &str) -> String {
    format!(
        "Here is my profile:\n\n{profile}\n\nHere is a git diff that needs review:\n\n{diff}\n\nPlease provide a concise title and description of the changes."
    )
}

impl<'a> RequestPayload<'a> {
    pub fn new(api: &'a ApiConfig, profile: &str, diff: &str) -> Self {
        let content = render_prompt(profile, diff);
        debug!("Content length: {} bytes", content.len());

        Self {
            model: &api.model,
            max_tokens: api.max_tokens,
            temperature: api.temperature,
            messages: vec![Message {
                role: "user",
                content,
            }],
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, SerializationFailure> {
        let json = serde_json::to_vec(self)?;
        debug!("JSON request payload created (length: {})", json.len());
        Ok(json)
    }
}

/// Build the JSON request body for `profile` and `diff`.
pub fn build(api: &ApiConfig, profile: &str, diff: &str) -> Result<Vec<u8>, SerializationFailure> {
    RequestPayload::new(api, profile, diff).to_json()
}
