//! System instruction for the assistant
//!
//! The instruction is product copy, not logic. A default ships inside the
//! binary and an operator can point `SUMMIT_SYSTEM_PROMPT_PATH` at a file to
//! replace it without a rebuild.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Instruction compiled into the binary
const DEFAULT_PROMPT: &str = include_str!("../prompts/summit.md");

#[derive(Debug, Error)]
#[error("failed to read system prompt from {path}: {source}")]
pub struct PromptLoadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Where the active instruction came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    Embedded,
    File(PathBuf),
}

/// The fixed system instruction sent with every request
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    text: String,
    source: PromptSource,
}

impl SystemPrompt {
    pub fn embedded() -> Self {
        Self {
            text: DEFAULT_PROMPT.trim().to_string(),
            source: PromptSource::Embedded,
        }
    }

    /// Load the override at `path`, or the embedded prompt when there is none.
    ///
    /// An unreadable file is an error. A file with nothing but whitespace
    /// falls back to the embedded prompt.
    pub fn load(path: Option<&Path>) -> Result<Self, PromptLoadError> {
        let Some(path) = path else {
            return Ok(Self::embedded());
        };

        let content = std::fs::read_to_string(path).map_err(|source| PromptLoadError {
            path: path.to_path_buf(),
            source,
        })?;

        let trimmed = content.trim();
        if trimmed.is_empty() {
            tracing::warn!(path = %path.display(), "System prompt file is empty, using embedded prompt");
            return Ok(Self::embedded());
        }

        Ok(Self {
            text: trimmed.to_string(),
            source: PromptSource::File(path.to_path_buf()),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &PromptSource {
        &self.source
    }
}
