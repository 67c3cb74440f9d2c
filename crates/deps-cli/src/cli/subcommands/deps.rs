use clap::{Args, Subcommand};

use crate::cli::global::{finite_score, non_empty};

/// Stored dependency commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DepsCommands {
    /// List the dependencies of a project version.
    List {
        #[arg(value_parser = non_empty)]
        name: String,
        #[arg(value_parser = non_empty)]
        version: String,
    },
    /// Dependency names scored within 1e-9 of the given value.
    ByScore {
        #[arg(value_parser = finite_score, allow_negative_numbers = true)]
        score: f64,
    },
    /// Add a dependency to a project version by hand.
    Add(DependencyArgs),
    /// Overwrite the score of an existing dependency.
    Update(DependencyArgs),
    /// Remove a dependency from a project version.
    Remove {
        #[arg(value_parser = non_empty)]
        name: String,
        #[arg(value_parser = non_empty)]
        version: String,
        #[arg(value_parser = non_empty)]
        dependency: String,
    },
}

#[derive(Clone, Debug, Args)]
pub struct DependencyArgs {
    /// Project name.
    #[arg(value_parser = non_empty)]
    pub name: String,
    /// Project version.
    #[arg(value_parser = non_empty)]
    pub version: String,
    /// Dependency package name.
    #[arg(value_parser = non_empty)]
    pub dependency: String,
    #[arg(value_parser = finite_score, allow_negative_numbers = true)]
    pub score: f64,
    /// Scorecard Unix timestamp; 0 when unknown.
    #[arg(long, default_value_t = 0)]
    pub updated_at: i64,
}
