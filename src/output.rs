//! Rendering of a [`CommitMessage`] for the terminal and for Markdown files.

use crate::response::CommitMessage;
use anyhow::{Context, Result};
use std::path::Path;

/// `# {title}\n\n{description}`
pub fn render_markdown(message: &CommitMessage) -> String {
    format!("# {}\n\n{}", message.title, message.description)
}

/// Human-readable form printed on stdout.
pub fn render_terminal(message: &CommitMessage) -> String {
    format!(
        "TITLE: {}\n\nDESCRIPTION:\n{}\n",
        message.title, message.description
    )
}

/// Write the Markdown rendering to `path`, replacing any existing file.
pub fn save(path: &Path, message: &CommitMessage) -> Result<()> {
    std::fs::write(path, render_markdown(message))
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}
