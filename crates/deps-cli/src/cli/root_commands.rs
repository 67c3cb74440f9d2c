use clap::{Args, Subcommand};

use crate::cli::global::non_empty;
use crate::cli::subcommands::{DepsCommands, ProjectsCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Fetch, score, and store the dependencies of a project version.
    Ingest(IngestArgs),
    /// List the published versions of a project.
    Versions {
        #[arg(value_parser = non_empty)]
        name: String,
    },
    /// Stored projects.
    Projects {
        #[command(subcommand)]
        action: ProjectsCommands,
    },
    /// Stored dependencies.
    Deps {
        #[command(subcommand)]
        action: DepsCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct IngestArgs {
    #[arg(value_parser = non_empty)]
    pub name: String,
    #[arg(value_parser = non_empty)]
    pub version: String,
    /// Abort if ingestion takes longer than this many seconds (overrides config).
    #[arg(long)]
    pub deadline_secs: Option<u64>,
}
