use crate::error::Result;
use crate::paths::{self, RootPaths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// CollectionsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "default_agents_dir")]
    pub agents: PathBuf,
    #[serde(default = "default_commands_dir")]
    pub commands: PathBuf,
}

fn default_agents_dir() -> PathBuf {
    PathBuf::from(paths::AGENTS_DIR)
}

fn default_commands_dir() -> PathBuf {
    PathBuf::from(paths::COMMANDS_DIR)
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            agents: default_agents_dir(),
            commands: default_commands_dir(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

/// Contents of `.agentdex/config.yaml`. Every field is optional on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub collections: CollectionsConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            collections: CollectionsConfig::default(),
        }
    }
}

impl Config {
    /// Load the config for `root`, falling back to defaults when the file
    /// does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Resolve collection directories against `root`. Absolute paths are
    /// used as-is.
    pub fn root_paths(&self, root: &Path) -> RootPaths {
        RootPaths::new(
            root.join(&self.collections.agents),
            root.join(&self.collections.commands),
        )
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let resolved = self.root_paths(root);

        // 1. Both collections pointing at one directory mixes agents and commands
        if resolved.agents_dir == resolved.commands_dir {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "agents and commands share the directory {}",
                    resolved.agents_dir.display()
                ),
            });
        }

        // 2. Missing directories are skipped at parse time, but worth flagging
        for (label, dir) in [
            ("agents", &resolved.agents_dir),
            ("commands", &resolved.commands_dir),
        ] {
            if !dir.is_dir() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("{label} directory not found: {}", dir.display()),
                });
            }
        }

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("unknown config version {}", self.version),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
