use crate::error::{AgentdexError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const AGENTS_DIR: &str = ".claude/agents";
pub const COMMANDS_DIR: &str = ".claude/commands";

pub const AGENTDEX_DIR: &str = ".agentdex";
pub const CONFIG_FILE: &str = ".agentdex/config.yaml";

pub const MARKDOWN_EXT: &str = "md";

// ---------------------------------------------------------------------------
// RootPaths
// ---------------------------------------------------------------------------

/// Locations of the two document collections scanned by a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootPaths {
    pub agents_dir: PathBuf,
    pub commands_dir: PathBuf,
}

impl RootPaths {
    pub fn new(agents_dir: impl Into<PathBuf>, commands_dir: impl Into<PathBuf>) -> Self {
        Self {
            agents_dir: agents_dir.into(),
            commands_dir: commands_dir.into(),
        }
    }

    /// `<root>/.claude/agents` and `<root>/.claude/commands`.
    pub fn under(root: &Path) -> Self {
        Self::new(agents_dir(root), commands_dir(root))
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn agents_dir(root: &Path) -> PathBuf {
    root.join(AGENTS_DIR)
}

pub fn commands_dir(root: &Path) -> PathBuf {
    root.join(COMMANDS_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(MARKDOWN_EXT)
}

/// File stem used as the fallback entity name.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Name normalization
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap())
}

/// Lowercase, map whitespace and `_` to `-`, drop everything else that is
/// not `[a-z0-9-]`, collapse dash runs and trim dashes at both ends.
pub fn normalize_name(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars().flat_map(char::to_lowercase) {
        let mapped = if c.is_whitespace() || c == '_' { '-' } else { c };
        if mapped == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        } else if mapped.is_ascii_lowercase() || mapped.is_ascii_digit() {
            out.push(mapped);
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if !name_re().is_match(&out) {
        return Err(AgentdexError::InvalidName(raw.to_string()));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
