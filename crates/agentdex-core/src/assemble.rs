//! Preamble-wins merge of typed frontmatter and extractor fallbacks.
//!
//! For every field: a present, non-blank preamble value is used as-is,
//! otherwise the matching extractor runs over the body, otherwise a
//! default derived from the file name applies.

use crate::error::{AgentdexError, Result};
use crate::extract::{self, MAX_CAPABILITIES, MAX_COLLABORATORS};
use crate::frontmatter::{self, non_empty, AgentFrontmatter, CommandFrontmatter, ListField};
use crate::loader::SourceDocument;
use crate::paths::normalize_name;
use crate::types::{AgentRecord, CommandRecord};
use tracing::warn;

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

pub fn assemble_agent(doc: &SourceDocument) -> Result<AgentRecord> {
    let text = doc.text()?;
    let split = frontmatter::split(&text)?;
    let fm: AgentFrontmatter = split.fields()?;
    let body = split.body;

    let name = entity_name(&fm.name, doc)?;

    let description = non_empty(&fm.description)
        .or_else(|| extract::extract_description(body))
        .unwrap_or_else(|| format!("{} agent", title_case(&name)));

    let tools = fm
        .tools
        .as_ref()
        .map(|t| dedupe_exact(t.items()))
        .unwrap_or_default();

    let capabilities = match declared(&fm.capabilities) {
        Some(items) => cap(dedupe_exact(items), MAX_CAPABILITIES),
        None => extract::extract_capabilities(body),
    };

    let collaborators = match declared(&fm.collaborators) {
        Some(items) => {
            let others = dedupe_lowercase(items).into_iter().filter(|c| *c != name);
            cap(others.collect(), MAX_COLLABORATORS)
        }
        None => extract::extract_collaborators_excluding(body, &name),
    };

    let color = non_empty(&fm.color).and_then(|c| {
        let normalized = normalize_color(&c);
        if normalized.is_none() {
            warn!(path = %doc.path.display(), color = %c, "ignoring invalid color");
        }
        normalized
    });

    Ok(AgentRecord {
        name,
        human_name: non_empty(&fm.human_name),
        color,
        description,
        tools,
        capabilities,
        collaborators,
        source_path: doc.path.clone(),
        raw_body: body.to_string(),
        created_at: doc.created_at,
        updated_at: doc.updated_at,
    })
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A command record plus the body-derived lists the workflow synthesizer
/// consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandAssembly {
    pub record: CommandRecord,
    pub steps: Vec<String>,
    pub gates: Vec<String>,
    pub referenced_agents: Vec<String>,
}

pub fn assemble_command(doc: &SourceDocument) -> Result<CommandAssembly> {
    let text = doc.text()?;
    let split = frontmatter::split(&text)?;
    let fm: CommandFrontmatter = split.fields()?;
    let body = split.body;

    let name = entity_name(&fm.name, doc)?;
    let referenced_agents = extract::extract_referenced_agents(body);
    let (min_agents, max_agents) = agent_bounds(&fm, referenced_agents.len())?;

    let record = CommandRecord {
        name,
        description: non_empty(&fm.description).or_else(|| extract::extract_description(body)),
        workflow_ref: non_empty(&fm.workflow_id),
        min_agents,
        max_agents,
        allows_parallel: fm.allows_parallel.unwrap_or(false),
        source_path: doc.path.clone(),
        raw_body: body.to_string(),
        created_at: doc.created_at,
        updated_at: doc.updated_at,
    };

    Ok(CommandAssembly {
        record,
        steps: extract::extract_steps(body),
        gates: extract::extract_gates(body),
        referenced_agents,
    })
}

/// Declared bounds win; otherwise `min` is 1 when any agent is referenced
/// and `max` is the referenced count.
fn agent_bounds(fm: &CommandFrontmatter, referenced: usize) -> Result<(u32, u32)> {
    let count = u32::try_from(referenced).unwrap_or(u32::MAX);
    let min = fm.min_agents.unwrap_or(u32::from(count > 0));
    let max = fm.max_agents.unwrap_or(count);
    if min > max {
        return Err(AgentdexError::AgentBounds { min, max });
    }
    Ok((min, max))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entity_name(declared: &Option<String>, doc: &SourceDocument) -> Result<String> {
    let raw = non_empty(declared).unwrap_or_else(|| doc.stem());
    normalize_name(&raw)
}

/// Non-empty declared list items, or `None` to fall back to extraction.
fn declared(field: &Option<ListField>) -> Option<Vec<String>> {
    field.as_ref().map(ListField::items).filter(|v| !v.is_empty())
}

fn dedupe_exact(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn dedupe_lowercase(items: Vec<String>) -> Vec<String> {
    dedupe_exact(items.into_iter().map(|s| s.to_lowercase()).collect())
}

fn cap(mut items: Vec<String>, max: usize) -> Vec<String> {
    items.truncate(max);
    items
}

/// `#rgb` / `#rrggbb` (with or without `#`) lowercased, or a bare
/// alphabetic color name such as `blue`.
pub fn normalize_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Some(format!("#{}", hex.to_ascii_lowercase()));
    }
    if !trimmed.starts_with('#')
        && !trimmed.is_empty()
        && trimmed.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Some(trimmed.to_ascii_lowercase());
    }
    None
}

/// `backend-developer` -> `Backend Developer`.
pub fn title_case(name: &str) -> String {
    name.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
