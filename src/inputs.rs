//! Loading of the API key, profile and diff.
//!
//! Everything here runs before the request pipeline and hands it plain,
//! already-trimmed strings.

use crate::transport::ApiKey;
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::debug;

const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Read a file as text. Invalid UTF-8 is replaced rather than rejected.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    debug!("Read {} ({} bytes)", path.display(), bytes.len());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Whitespace the original files are expected to be padded with.
fn trim(text: &str) -> &str {
    text.trim_matches([' ', '\t', '\r', '\n'])
}

/// Resolve the API key.
///
/// An explicit key file must exist. Otherwise the default file is used when
/// present, then the `ANTHROPIC_API_KEY` environment variable.
pub fn load_api_key(explicit: Option<&Path>, default_path: &Path) -> Result<ApiKey> {
    load_api_key_with_env(explicit, default_path, std::env::var(API_KEY_ENV).ok())
}

fn load_api_key_with_env(
    explicit: Option<&Path>,
    default_path: &Path,
    env_key: Option<String>,
) -> Result<ApiKey> {
    let raw = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow!("API key file not found at {}", path.display()));
            }
            read_text(path)?
        }
        None if default_path.exists() => {
            debug!("Using default API key from: {}", default_path.display());
            read_text(default_path)?
        }
        None => env_key.ok_or_else(|| {
            anyhow!(
                "API key file not found at {}. Create it first, specify a key file with -k, \
                 or set the {} environment variable.",
                default_path.display(),
                API_KEY_ENV
            )
        })?,
    };

    let key = ApiKey::new(trim(&raw))?;
    debug!("Successfully read API key (length: {})", key.byte_len());
    Ok(key)
}

/// Read and trim the developer profile.
pub fn load_profile(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(anyhow!(
            "Profile file not found at {}. Create it first or specify a profile with -p.",
            path.display()
        ));
    }
    let profile = read_text(path)?;
    Ok(trim(&profile).to_string())
}

/// Take the diff from the argument or from a file.
pub fn load_diff(inline: Option<String>, file: Option<&Path>) -> Result<String> {
    match (inline, file) {
        (_, Some(path)) => read_text(path),
        (Some(diff), None) => Ok(diff),
        (None, None) => Err(anyhow!(
            "Git diff is required (either as an argument or via -d)"
        )),
    }
}
