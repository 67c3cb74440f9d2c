use serde::{Deserialize, Serialize};

use super::Dependency;

/// A stored project, unique by `(name, version)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    /// Opaque version string, not required to be semver.
    pub version: String,
    /// Unix timestamp of the last ingestion, set by the caller at write time.
    pub updated_at: i64,
}

impl Project {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>, updated_at: i64) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            updated_at,
        }
    }
}

/// A project paired with its full candidate dependency list.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDependencyRecord {
    pub project: Project,
    pub dependencies: Vec<Dependency>,
}

/// Dependencies of one project version, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectDependencies {
    pub project_name: String,
    pub dependencies: Vec<Dependency>,
}
