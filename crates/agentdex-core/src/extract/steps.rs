//! Workflow step extraction as a priority-ordered list of tiers.
//!
//! Each [`Tier`] runs its strategies in order and merges their output with
//! the tier's dedupe key. [`first_non_empty`] returns the first tier that
//! produced anything; lower tiers are never consulted after that.

use super::{exact_key, OrderedSet};
use crate::markdown::{self, Boundary};
use regex::Regex;
use std::sync::OnceLock;

pub const ORCHESTRATOR_STEP: &str = "Orchestrator analyzes the task and selects agents";
pub const PARALLEL_STEP: &str = "Selected agents execute in parallel";

// ---------------------------------------------------------------------------
// Strategy / Tier
// ---------------------------------------------------------------------------

/// A named, pure step-extraction function.
#[derive(Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub extract: fn(&str) -> Vec<String>,
}

pub struct Tier {
    pub name: &'static str,
    pub strategies: Vec<Strategy>,
    pub dedupe_key: fn(&str) -> String,
}

impl Tier {
    pub fn run(&self, text: &str) -> Vec<String> {
        let mut set = OrderedSet::new(self.dedupe_key);
        for strategy in &self.strategies {
            set.extend((strategy.extract)(text));
        }
        set.into_vec()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierOutcome {
    /// Name of the tier that produced the steps, `None` if every tier was empty.
    pub tier: Option<&'static str>,
    pub steps: Vec<String>,
}

pub fn first_non_empty(tiers: &[Tier], text: &str) -> TierOutcome {
    for tier in tiers {
        let steps = tier.run(text);
        if !steps.is_empty() {
            return TierOutcome {
                tier: Some(tier.name),
                steps,
            };
        }
    }
    TierOutcome {
        tier: None,
        steps: Vec::new(),
    }
}

pub fn default_tiers() -> Vec<Tier> {
    vec![
        Tier {
            name: "agent-steps",
            strategies: vec![
                Strategy {
                    name: "workflow-section",
                    extract: workflow_section,
                },
                Strategy {
                    name: "standard-flow-section",
                    extract: standard_flow_section,
                },
            ],
            dedupe_key: agent_action_key,
        },
        Tier {
            name: "diagram-steps",
            strategies: vec![
                Strategy {
                    name: "ascii-steps",
                    extract: ascii_steps,
                },
                Strategy {
                    name: "orchestrator-block",
                    extract: orchestrator_block,
                },
            ],
            dedupe_key: exact_key,
        },
    ]
}

/// Ordered workflow steps for a command body.
pub fn extract_steps(text: &str) -> Vec<String> {
    first_non_empty(&default_tiers(), text).steps
}

// ---------------------------------------------------------------------------
// Tier 1: `N. **agent** -> action` lines
// ---------------------------------------------------------------------------

static AGENT_STEP_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn agent_step_re() -> &'static Regex {
    AGENT_STEP_RE.get_or_init(|| {
        Regex::new(
            r"(?m)^[ \t]*\d+\.[ \t]+\*\*([A-Za-z0-9][A-Za-z0-9_-]*)\*\*[ \t]*(?:->|→|:)[ \t]*(.+?)[ \t]*\r?$",
        )
        .unwrap()
    })
}

fn agent_steps(section: &str) -> Vec<String> {
    agent_step_re()
        .captures_iter(section)
        .map(|cap| format!("{}: {}", cap[1].to_lowercase(), &cap[2]))
        .collect()
}

fn workflow_section(text: &str) -> Vec<String> {
    markdown::section(
        text,
        |level, title| {
            level == 2
                && title
                    .split_whitespace()
                    .next()
                    .is_some_and(|w| w.eq_ignore_ascii_case("workflow"))
        },
        Boundary::SameOrHigher,
    )
    .map(agent_steps)
    .unwrap_or_default()
}

fn standard_flow_section(text: &str) -> Vec<String> {
    markdown::section(
        text,
        |level, title| level == 3 && title.eq_ignore_ascii_case("standard flow"),
        Boundary::SameOrHigher,
    )
    .map(agent_steps)
    .unwrap_or_default()
}

/// `(agent, action)` with the action lowercased and whitespace collapsed, so
/// one agent may appear with several distinct actions.
fn agent_action_key(step: &str) -> String {
    let (agent, action) = step.split_once(": ").unwrap_or((step, ""));
    let action = action
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    format!("{}\u{0}{}", agent.to_lowercase(), action)
}

// ---------------------------------------------------------------------------
// Tier 2: diagrams and orchestration blocks
// ---------------------------------------------------------------------------

static ASCII_STEP_RE: OnceLock<Regex> = OnceLock::new();

fn ascii_step_re() -> &'static Regex {
    ASCII_STEP_RE.get_or_init(|| {
        Regex::new(
            r"(?m)^[ \t]*(?:[|│┃║][ \t]*)?Step[ \t]+(\d+)[ \t]*:[ \t]*(.+?)[ \t]*(?:[|│┃║][ \t]*)?\r?$",
        )
        .unwrap()
    })
}

fn ascii_steps(text: &str) -> Vec<String> {
    ascii_step_re()
        .captures_iter(text)
        .map(|cap| format!("Step {}: {}", &cap[1], &cap[2]))
        .collect()
}

fn orchestrator_block(text: &str) -> Vec<String> {
    let mut steps = Vec::new();
    for block in markdown::fenced_blocks(text) {
        let lower = block.to_lowercase();
        if lower.contains("orchestrator") {
            steps.push(ORCHESTRATOR_STEP.to_string());
        }
        if lower.contains("agents execute in parallel") {
            steps.push(PARALLEL_STEP.to_string());
        }
    }
    steps
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
