use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentdexError {
    #[error("unterminated frontmatter: opening '---' has no closing delimiter")]
    UnterminatedFrontmatter,

    #[error("invalid frontmatter: {0}")]
    InvalidFrontmatter(String),

    #[error("invalid name '{0}': must contain at least one letter or digit")]
    InvalidName(String),

    #[error("duplicate name '{name}': already defined by {first}")]
    DuplicateName { name: String, first: String },

    #[error("minAgents ({min}) exceeds maxAgents ({max})")]
    AgentBounds { min: u32, max: u32 },

    #[error("document is not valid UTF-8")]
    InvalidUtf8(#[source] std::string::FromUtf8Error),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgentdexError>;

/// Render the source chain of an error below its top-level message.
fn cause_chain(err: &AgentdexError) -> Option<String> {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(s) = source {
        causes.push(s.to_string());
        source = s.source();
    }
    if causes.is_empty() {
        None
    } else {
        Some(causes.join(": "))
    }
}

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// A per-document failure captured during a batch. Never propagated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    pub source_path: PathBuf,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ParseError {
    pub fn new(source_path: &Path, err: &AgentdexError) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            message: err.to_string(),
            cause: cause_chain(err),
        }
    }
}

// ---------------------------------------------------------------------------
// SyncError
// ---------------------------------------------------------------------------

/// A per-entity failure captured while planning or applying a sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncError {
    pub kind: crate::types::EntityKind,
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl SyncError {
    pub fn new(kind: crate::types::EntityKind, name: &str, err: &AgentdexError) -> Self {
        Self {
            kind,
            name: name.to_string(),
            message: err.to_string(),
            cause: cause_chain(err),
        }
    }
}
