use crate::assemble::{assemble_agent, assemble_command};
use crate::error::{AgentdexError, ParseError, Result};
use crate::loader::{load_collection, SourceDocument};
use crate::paths::RootPaths;
use crate::types::{AgentRecord, CommandRecord, ParseResult, WorkflowRecord};
use crate::workflow;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Single documents
// ---------------------------------------------------------------------------

pub fn parse_agent_document(doc: &SourceDocument) -> Result<AgentRecord> {
    assemble_agent(doc)
}

/// A command and the workflow synthesized from it, if any. A synthesized
/// workflow becomes the command's `workflow_ref` unless one was declared.
pub fn parse_command_document(
    doc: &SourceDocument,
) -> Result<(CommandRecord, Option<WorkflowRecord>)> {
    let assembly = assemble_command(doc)?;
    let workflow = workflow::synthesize(&assembly);
    let mut record = assembly.record;
    if record.workflow_ref.is_none() {
        record.workflow_ref = workflow.as_ref().map(|w| w.name.clone());
    }
    Ok((record, workflow))
}

// ---------------------------------------------------------------------------
// BatchParser
// ---------------------------------------------------------------------------

/// Parses both collections. Holds only configuration, so it can be shared
/// freely between threads.
#[derive(Debug, Clone)]
pub struct BatchParser {
    paths: RootPaths,
}

#[derive(Debug, Default)]
pub struct AgentBatch {
    pub agents: Vec<AgentRecord>,
    pub errors: Vec<ParseError>,
}

#[derive(Debug, Default)]
pub struct CommandBatch {
    pub commands: Vec<CommandRecord>,
    pub workflows: Vec<WorkflowRecord>,
    pub errors: Vec<ParseError>,
}

impl BatchParser {
    pub fn new(paths: RootPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &RootPaths {
        &self.paths
    }

    pub fn parse_agents(&self) -> AgentBatch {
        let loaded = load_collection(&self.paths.agents_dir);
        let mut batch = AgentBatch {
            errors: loaded.errors,
            ..AgentBatch::default()
        };
        let mut names = NameRegistry::default();

        for doc in &loaded.documents {
            let parsed = parse_agent_document(doc)
                .and_then(|agent| names.claim(&agent.name, doc).map(|_| agent));
            match parsed {
                Ok(agent) => {
                    debug!(name = %agent.name, path = %doc.path.display(), "parsed agent");
                    batch.agents.push(agent);
                }
                Err(e) => batch.errors.push(reject(doc, &e)),
            }
        }

        batch.agents.sort_by(|a, b| locale_cmp(&a.name, &b.name));
        batch
    }

    pub fn parse_commands(&self) -> CommandBatch {
        let loaded = load_collection(&self.paths.commands_dir);
        let mut batch = CommandBatch {
            errors: loaded.errors,
            ..CommandBatch::default()
        };
        let mut names = NameRegistry::default();

        for doc in &loaded.documents {
            let parsed = parse_command_document(doc)
                .and_then(|parsed| names.claim(&parsed.0.name, doc).map(|_| parsed));
            match parsed {
                Ok((command, workflow)) => {
                    debug!(
                        name = %command.name,
                        path = %doc.path.display(),
                        workflow = workflow.is_some(),
                        "parsed command"
                    );
                    batch.commands.push(command);
                    batch.workflows.extend(workflow);
                }
                Err(e) => batch.errors.push(reject(doc, &e)),
            }
        }

        batch.commands.sort_by(|a, b| locale_cmp(&a.name, &b.name));
        batch.workflows.sort_by(|a, b| locale_cmp(&a.name, &b.name));
        batch
    }

    /// Parse both collections. Never fails: every per-file problem is
    /// reported in `errors` next to the records that did parse.
    pub fn parse_all(&self) -> ParseResult {
        let agents = self.parse_agents();
        let commands = self.parse_commands();

        let mut errors = agents.errors;
        errors.extend(commands.errors);

        info!(
            agents = agents.agents.len(),
            commands = commands.commands.len(),
            workflows = commands.workflows.len(),
            errors = errors.len(),
            "parse complete"
        );

        ParseResult {
            agents: agents.agents,
            commands: commands.commands,
            workflows: commands.workflows,
            errors,
            timestamp: Utc::now(),
        }
    }
}

fn reject(doc: &SourceDocument, err: &AgentdexError) -> ParseError {
    warn!(path = %doc.path.display(), error = %err, "skipping document");
    ParseError::new(&doc.path, err)
}

/// First document to claim a name keeps it.
#[derive(Default)]
struct NameRegistry {
    owners: HashMap<String, PathBuf>,
}

impl NameRegistry {
    fn claim(&mut self, name: &str, doc: &SourceDocument) -> Result<()> {
        if let Some(first) = self.owners.get(name) {
            return Err(AgentdexError::DuplicateName {
                name: name.to_string(),
                first: first.display().to_string(),
            });
        }
        self.owners.insert(name.to_string(), doc.path.clone());
        Ok(())
    }
}

/// Case-insensitive ordering with a byte-order tie break.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> BatchParser {
        let paths = RootPaths::under(dir.path());
        std::fs::create_dir_all(&paths.agents_dir).unwrap();
        std::fs::create_dir_all(&paths.commands_dir).unwrap();
        BatchParser::new(paths)
    }

    fn write(dir: &std::path::Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn empty_collections() {
        let dir = TempDir::new().unwrap();
        let result = setup(&dir).parse_all();
        assert!(result.agents.is_empty());
        assert!(result.commands.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn missing_collections_are_not_errors() {
        let dir = TempDir::new().unwrap();
        let result = BatchParser::new(RootPaths::under(dir.path())).parse_all();
        assert!(result.agents.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn agents_sorted_by_name_not_file() {
        let dir = TempDir::new().unwrap();
        let parser = setup(&dir);
        let agents = &parser.paths().agents_dir;
        write(agents, "a.md", "---\nname: zulu\n---\n");
        write(agents, "b.md", "---\nname: Alpha\n---\n");
        write(agents, "c.md", "---\nname: mike\n---\n");

        let batch = parser.parse_agents();
        let names: Vec<&str> = batch.agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mike", "zulu"]);
    }

    #[test]
    fn duplicate_names_keep_first_file() {
        let dir = TempDir::new().unwrap();
        let parser = setup(&dir);
        let agents = &parser.paths().agents_dir;
        write(agents, "a.md", "---\nname: reviewer\ndescription: first\n---\n");
        write(agents, "b.md", "---\nname: Reviewer\ndescription: second\n---\n");

        let batch = parser.parse_agents();
        assert_eq!(batch.agents.len(), 1);
        assert_eq!(batch.agents[0].description, "first");
        assert_eq!(batch.errors.len(), 1);
        assert!(batch.errors[0].source_path.ends_with("b.md"));
        assert!(batch.errors[0].message.contains("duplicate name"));
    }

    #[test]
    fn commands_produce_workflows_and_refs() {
        let dir = TempDir::new().unwrap();
        let parser = setup(&dir);
        let commands = &parser.paths().commands_dir;
        write(
            commands,
            "feature.md",
            "## Workflow\n1. **api-designer** -> Define schema\n",
        );
        write(commands, "lint.md", "Run the linter.\n");
        write(
            commands,
            "release.md",
            "---\nworkflowId: release-train\n---\n## Workflow\n1. **devops-engineer** -> Ship\n",
        );

        let batch = parser.parse_commands();
        assert!(batch.errors.is_empty());
        let refs: Vec<Option<&str>> = batch
            .commands
            .iter()
            .map(|c| c.workflow_ref.as_deref())
            .collect();
        assert_eq!(
            refs,
            vec![Some("feature-workflow"), None, Some("release-train")]
        );
        let wf_names: Vec<&str> = batch.workflows.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(wf_names, vec!["feature-workflow", "release-workflow"]);
    }

    #[test]
    fn malformed_document_is_isolated() {
        let dir = TempDir::new().unwrap();
        let parser = setup(&dir);
        let commands = &parser.paths().commands_dir;
        write(commands, "good.md", "Fine.\n");
        write(commands, "bad.md", "---\nname: bad\nno closing delimiter\n");

        let result = parser.parse_all();
        assert_eq!(result.commands.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].source_path.ends_with("bad.md"));
    }

    #[test]
    fn locale_ordering() {
        let mut names = vec!["beta", "Alpha", "alpha", "Gamma"];
        names.sort_by(|a, b| locale_cmp(a, b));
        assert_eq!(names, vec!["Alpha", "alpha", "beta", "Gamma"]);
    }
}
