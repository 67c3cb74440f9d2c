//! Entity structs for depsmanager domain objects.
//!
//! `Project` and `Dependency` map to the `projects` and `dependency` tables.
//! `ProjectDependencyRecord` is never persisted as such: it is the unit of work
//! handed from the ingestion pipeline to the store.

mod dependency;
mod project;

pub use dependency::{Dependency, SCORE_TOLERANCE, scores_match};
pub use project::{Project, ProjectDependencies, ProjectDependencyRecord};
