//! Decoding of the messages API reply into a commit title and description.

use crate::error::ParseError;
use serde_json::Value;
use tracing::debug;

/// Title and description derived from the model's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub title: String,
    pub description: String,
}

impl CommitMessage {
    /// Split a reply into title and description.
    ///
    /// Leading blank lines are skipped. The title is the first line without its
    /// `\n`; the description is everything after that `\n`, untouched.
    pub fn from_reply(text: &str) -> Self {
        let text = text.trim_start_matches(['\n', '\r']);

        match text.split_once('\n') {
            Some((title, description)) => Self {
                title: title.to_string(),
                description: description.to_string(),
            },
            None => {
                debug!("No newline found, using entire response as title");
                Self {
                    title: text.to_string(),
                    description: String::new(),
                }
            }
        }
    }
}

/// Extract the reply text: `content[0].text`.
fn reply_text(root: &Value) -> Result<&str, ParseError> {
    let content = root
        .get("content")
        .and_then(Value::as_array)
        .ok_or(ParseError::UnexpectedShape(
            "content field not found or not an array",
        ))?;

    let first = content
        .first()
        .ok_or(ParseError::UnexpectedShape("content array is empty"))?;

    first
        .get("text")
        .and_then(Value::as_str)
        .ok_or(ParseError::UnexpectedShape(
            "text field not found or not a string",
        ))
}

/// Parse a raw response body into a [`CommitMessage`].
pub fn parse(body: &[u8]) -> Result<CommitMessage, ParseError> {
    debug!("Parsing API response");

    let root: Value = serde_json::from_slice(body).map_err(ParseError::MalformedJson)?;
    let text = reply_text(&root)?;
    debug!("Response text length: {} bytes", text.len());

    let message = CommitMessage::from_reply(text);
    debug!(
        "Title extracted ({} bytes), description length: {}",
        message.title.len(),
        message.description.len()
    );
    Ok(message)
}
