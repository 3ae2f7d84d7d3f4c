mod cmd;
mod output;
mod root;
mod store;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agentdex",
    about = "Index agent and command definitions from markdown and synthesize workflows",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .claude/ or .git/)
    #[arg(long, global = true, env = "AGENTDEX_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Debug logging (RUST_LOG still applies)
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse both collections and summarize agents, commands, and workflows
    Parse,

    /// Show one parsed entity
    Show {
        /// Entity kind: agent, command, or workflow
        kind: String,
        /// Entity name
        name: String,
    },

    /// Diff parsed entities against a JSON store and apply the changes
    Sync {
        /// Path to the JSON store file (created if missing)
        #[arg(long)]
        store: PathBuf,
        /// Print the plan without writing the store
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect and validate .agentdex/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Parse => cmd::parse::run(&root, cli.json),
        Commands::Show { kind, name } => cmd::show::run(&root, &kind, &name, cli.json),
        Commands::Sync { store, dry_run } => cmd::sync::run(&root, &store, dry_run, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
