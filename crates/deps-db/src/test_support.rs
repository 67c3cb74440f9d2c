//! Shared test utilities for deps-db.

use std::time::Duration;

use deps_core::entities::{Dependency, Project, ProjectDependencyRecord};

use crate::service::DepsStore;

/// Create an in-memory store.
pub async fn test_store() -> DepsStore {
    DepsStore::open_local(":memory:", Duration::from_millis(500))
        .await
        .unwrap()
}

pub fn record(
    name: &str,
    version: &str,
    updated_at: i64,
    deps: &[(&str, f64)],
) -> ProjectDependencyRecord {
    ProjectDependencyRecord {
        project: Project::new(name, version, updated_at),
        dependencies: deps
            .iter()
            .map(|(dep, score)| Dependency::new(*dep, *score, 1_700_000_000))
            .collect(),
    }
}

pub fn names(deps: &[Dependency]) -> Vec<&str> {
    deps.iter().map(|d| d.name.as_str()).collect()
}
