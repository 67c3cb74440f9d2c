//! Database error types for deps-db.

use deps_core::errors::{Classify, ErrorKind};
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// No project row for `(name, version)`.
    #[error("project not found: {name}@{version}")]
    ProjectNotFound { name: String, version: String },

    /// No project references the given dependency name.
    #[error("no project depends on {dependency}")]
    NoProjectsForDependency { dependency: String },

    /// The project exists but has no dependency with that name.
    #[error("dependency {dependency} not found in {name}@{version}")]
    DependencyNotFound {
        name: String,
        version: String,
        dependency: String,
    },

    /// The `(project, dependency)` pair is already stored.
    #[error("dependency {dependency} already exists in {name}@{version}")]
    DependencyExists {
        name: String,
        version: String,
        dependency: String,
    },

    /// A SQL statement failed, with the operation it belonged to.
    #[error("{context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: libsql::Error,
    },

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

impl DatabaseError {
    pub(crate) fn query(context: &'static str) -> impl FnOnce(libsql::Error) -> Self {
        move |source| Self::Query { context, source }
    }
}

impl Classify for DatabaseError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::ProjectNotFound { .. }
            | Self::NoProjectsForDependency { .. }
            | Self::DependencyNotFound { .. } => ErrorKind::NotFound,
            Self::DependencyExists { .. } => ErrorKind::AlreadyExists,
            Self::Query { .. } | Self::Migration(_) | Self::NoResult | Self::LibSql(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// True when SQLite rejected a write because of a UNIQUE constraint.
pub(crate) fn is_unique_violation(err: &libsql::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}
