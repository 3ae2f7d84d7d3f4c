//! Splitting and typing of the YAML preamble at the top of a document.
//!
//! ```markdown
//! ---
//! name: backend-developer
//! tools: Read, Write, Bash
//! ---
//!
//! You are a senior backend developer...
//! ```

use crate::error::{AgentdexError, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

const DELIMITER: &str = "---";

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A document split into its raw preamble (if any) and its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
    pub preamble: Option<&'a str>,
    pub body: &'a str,
}

impl<'a> Document<'a> {
    /// Deserialize the preamble into `T`. A missing or blank preamble yields
    /// `T::default()`.
    pub fn fields<T: DeserializeOwned + Default>(&self) -> Result<T> {
        let raw = match self.preamble {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(T::default()),
        };
        let value: serde_yaml::Value = serde_yaml::from_str(raw)?;
        match value {
            serde_yaml::Value::Null => Ok(T::default()),
            serde_yaml::Value::Mapping(_) => Ok(serde_yaml::from_value(value)?),
            _ => Err(AgentdexError::InvalidFrontmatter(
                "expected a key/value mapping".to_string(),
            )),
        }
    }
}

/// Split `raw` into preamble and body.
///
/// A preamble exists only when the first line is exactly `---`, and runs to
/// the next line that is exactly `---`. An opening delimiter without a
/// closing one is an error.
pub fn split(raw: &str) -> Result<Document<'_>> {
    let content = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(first_end) = line_end(content, 0) else {
        return Ok(plain(content));
    };
    if content[..first_end.0].trim_end() != DELIMITER {
        return Ok(plain(content));
    }

    let preamble_start = first_end.1;
    let mut pos = preamble_start;
    while pos < content.len() {
        let (end, next) = line_end(content, pos).unwrap_or((content.len(), content.len()));
        if content[pos..end].trim_end() == DELIMITER {
            return Ok(Document {
                preamble: Some(&content[preamble_start..pos]),
                body: &content[next..],
            });
        }
        pos = next;
    }

    Err(AgentdexError::UnterminatedFrontmatter)
}

fn plain(content: &str) -> Document<'_> {
    Document {
        preamble: None,
        body: content,
    }
}

/// `(end_of_line, start_of_next_line)` for the line starting at `pos`.
fn line_end(content: &str, pos: usize) -> Option<(usize, usize)> {
    if pos >= content.len() {
        return None;
    }
    match content[pos..].find('\n') {
        Some(i) => Some((pos + i, pos + i + 1)),
        None => Some((content.len(), content.len())),
    }
}

// ---------------------------------------------------------------------------
// Typed preamble fields
// ---------------------------------------------------------------------------

/// A preamble value given either as a YAML list or as one delimited string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListField {
    List(Vec<String>),
    Text(String),
}

impl ListField {
    /// Items in declaration order. Strings are split on commas when any are
    /// present, otherwise on whitespace. Blank items are dropped.
    pub fn items(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            ListField::List(items) => items.iter().map(String::as_str).collect(),
            ListField::Text(s) if s.contains(',') => s.split(',').collect(),
            ListField::Text(s) => s.split_whitespace().collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFrontmatter {
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text", alias = "human_name")]
    pub human_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(default)]
    pub tools: Option<ListField>,
    #[serde(default)]
    pub capabilities: Option<ListField>,
    #[serde(default)]
    pub collaborators: Option<ListField>,
    /// Keys the engine does not read, kept for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFrontmatter {
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_text", alias = "workflow_id")]
    pub workflow_id: Option<String>,
    #[serde(default, alias = "min_agents")]
    pub min_agents: Option<u32>,
    #[serde(default, alias = "max_agents")]
    pub max_agents: Option<u32>,
    #[serde(default, alias = "allows_parallel")]
    pub allows_parallel: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Any YAML scalar as text, so `color: 336699` or `name: 2048` read as
/// strings instead of failing the whole preamble.
fn scalar_text<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    match Option::<serde_yaml::Value>::deserialize(d)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(D::Error::custom("expected a scalar value")),
    }
}

/// `Some(trimmed)` only for present, non-blank values.
pub fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_preamble_returns_whole_document() {
        let doc = split("# Title\n\nBody text\n").unwrap();
        assert_eq!(doc.preamble, None);
        assert_eq!(doc.body, "# Title\n\nBody text\n");
    }

    #[test]
    fn splits_preamble_and_body() {
        let doc = split("---\nname: a\n---\n# Body\n").unwrap();
        assert_eq!(doc.preamble, Some("name: a\n"));
        assert_eq!(doc.body, "# Body\n");
    }

    #[test]
    fn handles_crlf_and_bom() {
        let doc = split("\u{feff}---\r\nname: a\r\n---\r\nbody").unwrap();
        assert_eq!(doc.preamble, Some("name: a\r\n"));
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn closing_delimiter_at_eof() {
        let doc = split("---\nname: a\n---").unwrap();
        assert_eq!(doc.preamble, Some("name: a\n"));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn unterminated_preamble_is_error() {
        let err = split("---\nname: a\n# Body never closes\n").unwrap_err();
        assert!(matches!(err, AgentdexError::UnterminatedFrontmatter));
    }

    #[test]
    fn horizontal_rule_later_in_body_is_not_a_preamble() {
        let doc = split("Intro\n---\nmore\n").unwrap();
        assert_eq!(doc.preamble, None);
    }

    #[test]
    fn empty_preamble_defaults() {
        let doc = split("---\n---\nbody").unwrap();
        let fm: AgentFrontmatter = doc.fields().unwrap();
        assert_eq!(fm, AgentFrontmatter::default());
    }

    #[test]
    fn scalar_preamble_is_rejected() {
        let doc = split("---\njust a string\n---\nbody").unwrap();
        let err = doc.fields::<AgentFrontmatter>().unwrap_err();
        assert!(matches!(err, AgentdexError::InvalidFrontmatter(_)));
    }

    #[test]
    fn agent_fields_and_extras() {
        let raw = "---\nname: code-reviewer\nhumanName: Code Reviewer\ncolor: \"#FF8800\"\ntools: Read, Grep\nmodel: opus\ncapabilities:\n  - Static Analysis\n---\nbody";
        let fm: AgentFrontmatter = split(raw).unwrap().fields().unwrap();
        assert_eq!(fm.name.as_deref(), Some("code-reviewer"));
        assert_eq!(fm.human_name.as_deref(), Some("Code Reviewer"));
        assert_eq!(fm.color.as_deref(), Some("#FF8800"));
        assert_eq!(fm.tools.unwrap().items(), vec!["Read", "Grep"]);
        assert_eq!(
            fm.capabilities.unwrap().items(),
            vec!["Static Analysis".to_string()]
        );
        assert!(fm.extra.contains_key("model"));
    }

    #[test]
    fn command_fields() {
        let raw = "---\nname: feature\nworkflowId: feature-flow\nminAgents: 2\nmaxAgents: 4\nallowsParallel: true\n---\n";
        let fm: CommandFrontmatter = split(raw).unwrap().fields().unwrap();
        assert_eq!(fm.workflow_id.as_deref(), Some("feature-flow"));
        assert_eq!(fm.min_agents, Some(2));
        assert_eq!(fm.max_agents, Some(4));
        assert_eq!(fm.allows_parallel, Some(true));
    }

    #[test]
    fn numeric_and_boolean_scalars_become_text() {
        let fm: AgentFrontmatter = split("---\nname: 2048\ncolor: 336699\ndescription: true\n---\n")
            .unwrap()
            .fields()
            .unwrap();
        assert_eq!(fm.name.as_deref(), Some("2048"));
        assert_eq!(fm.color.as_deref(), Some("336699"));
        assert_eq!(fm.description.as_deref(), Some("true"));

        let fm: CommandFrontmatter = split("---\nname: 404\nworkflowId: 7\n---\n")
            .unwrap()
            .fields()
            .unwrap();
        assert_eq!(fm.name.as_deref(), Some("404"));
        assert_eq!(fm.workflow_id.as_deref(), Some("7"));
    }

    #[test]
    fn nested_value_in_text_field_is_rejected() {
        let doc = split("---\ncolor:\n  r: 1\n---\n").unwrap();
        assert!(doc.fields::<AgentFrontmatter>().is_err());
    }

    #[test]
    fn list_field_splitting() {
        assert_eq!(
            ListField::Text("Read Write  Bash".into()).items(),
            vec!["Read", "Write", "Bash"]
        );
        assert_eq!(
            ListField::Text("Read, Web Search,".into()).items(),
            vec!["Read", "Web Search"]
        );
        assert_eq!(
            ListField::List(vec![" a ".into(), "".into()]).items(),
            vec!["a"]
        );
    }

    #[test]
    fn explicit_empty_is_distinguishable_from_absent() {
        let fm: AgentFrontmatter = split("---\ndescription: \"\"\n---\n")
            .unwrap()
            .fields()
            .unwrap();
        assert_eq!(fm.description.as_deref(), Some(""));
        assert_eq!(non_empty(&fm.description), None);
        assert_eq!(fm.name, None);
    }
}
