use clap::Subcommand;

use crate::cli::global::non_empty;

/// Stored project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectsCommands {
    /// List every stored project version.
    List,
    /// Delete a project version and its dependencies.
    Delete {
        #[arg(value_parser = non_empty)]
        name: String,
        #[arg(value_parser = non_empty)]
        version: String,
    },
    /// Projects that depend on the given package.
    ByDependency {
        #[arg(value_parser = non_empty)]
        dependency: String,
    },
}
