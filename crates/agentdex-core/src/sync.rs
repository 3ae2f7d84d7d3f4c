//! Diffing parsed entities against persisted state.
//!
//! Persistence is external: the planner talks to an [`EntityStore`] that
//! upserts identity-free `*Input` values keyed by name.

use crate::error::{AgentdexError, Result, SyncError};
use crate::types::{
    AgentRecord, CommandRecord, EntityKind, Gate, ParseResult, WorkflowRecord, WorkflowType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub description: String,
    pub tools: Vec<String>,
    pub capabilities: Vec<String>,
    pub collaborators: Vec<String>,
    pub source_path: String,
    pub raw_body: String,
}

impl From<&AgentRecord> for AgentInput {
    fn from(a: &AgentRecord) -> Self {
        Self {
            name: a.name.clone(),
            human_name: a.human_name.clone(),
            color: a.color.clone(),
            description: a.description.clone(),
            tools: a.tools.clone(),
            capabilities: a.capabilities.clone(),
            collaborators: a.collaborators.clone(),
            source_path: a.source_path.display().to_string(),
            raw_body: a.raw_body.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_ref: Option<String>,
    pub min_agents: u32,
    pub max_agents: u32,
    pub allows_parallel: bool,
    pub raw_body: String,
}

impl From<&CommandRecord> for CommandInput {
    fn from(c: &CommandRecord) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
            workflow_ref: c.workflow_ref.clone(),
            min_agents: c.min_agents,
            max_agents: c.max_agents,
            allows_parallel: c.allows_parallel,
            raw_body: c.raw_body.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInput {
    pub name: String,
    #[serde(rename = "type")]
    pub workflow_type: WorkflowType,
    pub description: String,
    pub agent_sequence: Vec<String>,
    pub steps: Vec<String>,
    pub gates: Vec<Gate>,
}

impl From<&WorkflowRecord> for WorkflowInput {
    fn from(w: &WorkflowRecord) -> Self {
        Self {
            name: w.name.clone(),
            workflow_type: w.workflow_type,
            description: w.description.clone(),
            agent_sequence: w.agent_sequence.clone(),
            steps: w.steps.clone(),
            gates: w.gates.clone(),
        }
    }
}

/// One entity ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityInput {
    Agent(AgentInput),
    Command(CommandInput),
    Workflow(WorkflowInput),
}

impl EntityInput {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityInput::Agent(_) => EntityKind::Agent,
            EntityInput::Command(_) => EntityKind::Command,
            EntityInput::Workflow(_) => EntityKind::Workflow,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EntityInput::Agent(a) => &a.name,
            EntityInput::Command(c) => &c.name,
            EntityInput::Workflow(w) => &w.name,
        }
    }
}

// ---------------------------------------------------------------------------
// EntityStore
// ---------------------------------------------------------------------------

/// Persistence seam: lookup and upsert by name.
pub trait EntityStore {
    fn agent(&self, name: &str) -> Result<Option<AgentInput>>;
    fn command(&self, name: &str) -> Result<Option<CommandInput>>;
    fn workflow(&self, name: &str) -> Result<Option<WorkflowInput>>;

    fn upsert_agent(&mut self, input: &AgentInput) -> Result<()>;
    fn upsert_command(&mut self, input: &CommandInput) -> Result<()>;
    fn upsert_workflow(&mut self, input: &WorkflowInput) -> Result<()>;
}

/// In-memory store, also the on-disk shape of file-backed stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    pub agents: BTreeMap<String, AgentInput>,
    #[serde(default)]
    pub commands: BTreeMap<String, CommandInput>,
    #[serde(default)]
    pub workflows: BTreeMap<String, WorkflowInput>,
}

impl EntityStore for MemoryStore {
    fn agent(&self, name: &str) -> Result<Option<AgentInput>> {
        Ok(self.agents.get(name).cloned())
    }

    fn command(&self, name: &str) -> Result<Option<CommandInput>> {
        Ok(self.commands.get(name).cloned())
    }

    fn workflow(&self, name: &str) -> Result<Option<WorkflowInput>> {
        Ok(self.workflows.get(name).cloned())
    }

    fn upsert_agent(&mut self, input: &AgentInput) -> Result<()> {
        self.agents.insert(input.name.clone(), input.clone());
        Ok(())
    }

    fn upsert_command(&mut self, input: &CommandInput) -> Result<()> {
        self.commands.insert(input.name.clone(), input.clone());
        Ok(())
    }

    fn upsert_workflow(&mut self, input: &WorkflowInput) -> Result<()> {
        self.workflows.insert(input.name.clone(), input.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Create,
    Update,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncOp {
    pub action: SyncAction,
    pub input: EntityInput,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncPlan {
    pub ops: Vec<SyncOp>,
    pub errors: Vec<SyncError>,
}

impl SyncPlan {
    pub fn count(&self, action: SyncAction) -> usize {
        self.ops.iter().filter(|op| op.action == action).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: usize,
    pub errors: Vec<SyncError>,
}

// ---------------------------------------------------------------------------
// SyncPlanner
// ---------------------------------------------------------------------------

pub struct SyncPlanner;

impl SyncPlanner {
    /// One operation per parsed entity: agents, then workflows, then the
    /// commands that reference them.
    pub fn plan(result: &ParseResult, store: &dyn EntityStore) -> SyncPlan {
        let mut plan = SyncPlan::default();

        for agent in &result.agents {
            let input = AgentInput::from(agent);
            let existing = store.agent(&input.name);
            push_op(&mut plan, EntityInput::Agent(input), existing, |e| {
                EntityInput::Agent(e)
            });
        }
        for workflow in &result.workflows {
            let input = WorkflowInput::from(workflow);
            let existing = store.workflow(&input.name);
            push_op(&mut plan, EntityInput::Workflow(input), existing, |e| {
                EntityInput::Workflow(e)
            });
        }
        for command in &result.commands {
            let input = CommandInput::from(command);
            let existing = store.command(&input.name);
            push_op(&mut plan, EntityInput::Command(input), existing, |e| {
                EntityInput::Command(e)
            });
        }

        debug!(
            create = plan.count(SyncAction::Create),
            update = plan.count(SyncAction::Update),
            unchanged = plan.count(SyncAction::Unchanged),
            errors = plan.errors.len(),
            "sync planned"
        );
        plan
    }

    /// Apply every create/update independently; failures are collected.
    pub fn apply(plan: SyncPlan, store: &mut dyn EntityStore) -> SyncReport {
        let mut report = SyncReport {
            errors: plan.errors,
            ..SyncReport::default()
        };

        for op in plan.ops {
            if op.action == SyncAction::Unchanged {
                report.unchanged += 1;
                continue;
            }
            let written = match &op.input {
                EntityInput::Agent(a) => store.upsert_agent(a),
                EntityInput::Command(c) => store.upsert_command(c),
                EntityInput::Workflow(w) => store.upsert_workflow(w),
            };
            let label = format!("{}:{}", op.input.kind(), op.input.name());
            match (written, op.action) {
                (Ok(()), SyncAction::Create) => report.created.push(label),
                (Ok(()), _) => report.updated.push(label),
                (Err(e), _) => {
                    warn!(entity = %label, error = %e, "upsert failed");
                    report
                        .errors
                        .push(SyncError::new(op.input.kind(), op.input.name(), &e));
                }
            }
        }
        report
    }
}

fn push_op<T>(
    plan: &mut SyncPlan,
    input: EntityInput,
    existing: Result<Option<T>>,
    wrap: impl FnOnce(T) -> EntityInput,
) {
    let action = match existing.map(|found| found.map(wrap)) {
        Ok(None) => SyncAction::Create,
        Ok(Some(stored)) if stored == input => SyncAction::Unchanged,
        Ok(Some(_)) => SyncAction::Update,
        Err(e) => {
            plan.errors
                .push(SyncError::new(input.kind(), input.name(), &e));
            return;
        }
    };
    plan.ops.push(SyncOp { action, input });
}

/// Convenience for stores that only fail with a message.
pub fn store_error(message: impl Into<String>) -> AgentdexError {
    AgentdexError::Store(message.into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
