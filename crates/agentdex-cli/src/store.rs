use agentdex_core::io::{read_json_or_default, write_json};
use agentdex_core::sync::{AgentInput, CommandInput, EntityStore, MemoryStore, WorkflowInput};
use agentdex_core::Result;
use std::path::{Path, PathBuf};

/// A [`MemoryStore`] persisted as one pretty-printed JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            inner: read_json_or_default(path)?,
        })
    }

    pub fn save(&self) -> Result<()> {
        write_json(&self.path, &self.inner)
    }
}

impl EntityStore for JsonFileStore {
    fn agent(&self, name: &str) -> Result<Option<AgentInput>> {
        self.inner.agent(name)
    }

    fn command(&self, name: &str) -> Result<Option<CommandInput>> {
        self.inner.command(name)
    }

    fn workflow(&self, name: &str) -> Result<Option<WorkflowInput>> {
        self.inner.workflow(name)
    }

    fn upsert_agent(&mut self, input: &AgentInput) -> Result<()> {
        self.inner.upsert_agent(input)
    }

    fn upsert_command(&mut self, input: &CommandInput) -> Result<()> {
        self.inner.upsert_command(input)
    }

    fn upsert_workflow(&mut self, input: &WorkflowInput) -> Result<()> {
        self.inner.upsert_workflow(input)
    }
}
