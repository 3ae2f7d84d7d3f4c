pub mod assemble;
pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod frontmatter;
pub mod io;
pub mod loader;
pub mod markdown;
pub mod paths;
pub mod sync;
pub mod types;
pub mod workflow;

pub use batch::BatchParser;
pub use error::{AgentdexError, ParseError, Result, SyncError};
pub use paths::RootPaths;
