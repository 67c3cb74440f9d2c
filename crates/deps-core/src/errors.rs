//! Cross-cutting error taxonomy for depsmanager.
//!
//! Domain-specific errors (`MetadataError`, `DatabaseError`, `IngestError`)
//! live in their own crates and wrap their causes with context. Each of them
//! implements [`Classify`] so callers at the edge can map any failure onto one
//! of the [`ErrorKind`] tags without inspecting variants.

use std::fmt;

use serde::Serialize;

/// Coarse category of a failure, as seen by whoever called into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A remote project/version, a stored project, or a stored dependency is absent.
    NotFound,
    /// A manual insert collided with an existing `(project, dependency)` pair.
    AlreadyExists,
    /// Transport, decoding, or database failure.
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every error type that crosses a crate boundary.
pub trait Classify: std::error::Error {
    /// The tag of this error. Wrapping errors delegate to their source.
    fn kind(&self) -> ErrorKind;
}
