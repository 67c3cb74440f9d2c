//! Ingestion error types.

use std::time::Duration;

use deps_client::MetadataError;
use deps_core::errors::{Classify, ErrorKind};
use deps_db::error::DatabaseError;
use thiserror::Error;

/// A failed ingestion stage or pass-through operation, annotated with the
/// project it was working on. Classification follows the underlying cause.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("fetch dependency graph of {project}@{version}")]
    DependencyGraph {
        project: String,
        version: String,
        #[source]
        source: MetadataError,
    },

    #[error("resolve source repositories for {project}@{version}")]
    SourceRepos {
        project: String,
        version: String,
        #[source]
        source: MetadataError,
    },

    #[error("resolve scores for {project}@{version}")]
    Scores {
        project: String,
        version: String,
        #[source]
        source: MetadataError,
    },

    #[error("store {project}@{version}")]
    Store {
        project: String,
        version: String,
        #[source]
        source: DatabaseError,
    },

    #[error("list versions of {project}")]
    Versions {
        project: String,
        #[source]
        source: MetadataError,
    },

    /// A read or manual-edit operation on the store failed.
    #[error("{operation} {subject}")]
    Storage {
        operation: &'static str,
        subject: String,
        #[source]
        source: DatabaseError,
    },

    #[error("ingestion of {project}@{version} did not finish within {deadline:?}")]
    DeadlineExceeded {
        project: String,
        version: String,
        deadline: Duration,
    },
}

impl IngestError {
    pub(crate) fn storage(
        operation: &'static str,
        subject: impl Into<String>,
    ) -> impl FnOnce(DatabaseError) -> Self {
        let subject = subject.into();
        move |source| Self::Storage {
            operation,
            subject,
            source,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl Classify for IngestError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::DependencyGraph { source, .. }
            | Self::SourceRepos { source, .. }
            | Self::Scores { source, .. }
            | Self::Versions { source, .. } => source.kind(),
            Self::Store { source, .. } | Self::Storage { source, .. } => source.kind(),
            Self::DeadlineExceeded { .. } => ErrorKind::Internal,
        }
    }
}
