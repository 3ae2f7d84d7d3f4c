pub mod config;
pub mod parse;
pub mod show;
pub mod sync;

use agentdex_core::config::Config;
use agentdex_core::types::ParseResult;
use agentdex_core::BatchParser;
use anyhow::Context;
use std::path::Path;

/// Load the config for `root` and run a full batch.
pub fn parse_root(root: &Path) -> anyhow::Result<ParseResult> {
    let config = Config::load(root).context("failed to load config")?;
    Ok(BatchParser::new(config.root_paths(root)).parse_all())
}
