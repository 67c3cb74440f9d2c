//! The ingestion orchestrator and its pass-through operations.

use std::time::Duration;

use chrono::{DateTime, Utc};
use deps_client::{MetadataClient, VersionKey};
use deps_core::entities::{Dependency, Project, ProjectDependencies, ProjectDependencyRecord};
use deps_db::{ProjectStore, ReconcileOutcome};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::pipeline::{index_source_repos, score_dependencies, unique_dependency_keys};

/// Source of "now" for project timestamps.
pub type Clock = fn() -> DateTime<Utc>;

/// Result of one successful ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestSummary {
    pub project: Project,
    /// Number of scored dependencies handed to the store.
    pub dependencies: usize,
    pub outcome: Outcome,
}

/// Serializable mirror of [`ReconcileOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Outcome {
    Inserted { dependencies: usize },
    Updated { added: usize, removed: usize },
}

impl From<ReconcileOutcome> for Outcome {
    fn from(outcome: ReconcileOutcome) -> Self {
        match outcome {
            ReconcileOutcome::Inserted { dependencies } => Self::Inserted { dependencies },
            ReconcileOutcome::Updated { added, removed } => Self::Updated { added, removed },
        }
    }
}

/// Drives a metadata client and a project store through the ingestion
/// pipeline. Every remote call is issued after the previous one finished.
pub struct IngestService<M, S> {
    client: M,
    store: S,
    ecosystem: String,
    clock: Clock,
}

impl<M: MetadataClient, S: ProjectStore> IngestService<M, S> {
    /// Create a service querying `ecosystem` (e.g. `npm`) with the system clock.
    pub fn new(client: M, store: S, ecosystem: impl Into<String>) -> Self {
        Self {
            client,
            store,
            ecosystem: ecosystem.into(),
            clock: Utc::now,
        }
    }

    /// Replace the clock used for project timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub const fn client(&self) -> &M {
        &self.client
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn ecosystem(&self) -> &str {
        &self.ecosystem
    }

    pub fn into_parts(self) -> (M, S) {
        (self.client, self.store)
    }

    /// Fetch, score, and reconcile the dependencies of `name@version`.
    ///
    /// A project whose graph has no dependencies, or none of whose
    /// dependencies resolve to a source repository, is stored with an empty
    /// dependency set.
    ///
    /// # Errors
    ///
    /// Returns the [`IngestError`] variant of the stage that failed. Nothing
    /// is written unless every remote call succeeded.
    pub async fn ingest_project(
        &self,
        name: &str,
        version: &str,
    ) -> Result<IngestSummary, IngestError> {
        let nodes = self
            .client
            .get_dependency_graph(&self.ecosystem, name, version)
            .await
            .map_err(|source| IngestError::DependencyGraph {
                project: name.to_string(),
                version: version.to_string(),
                source,
            })?;
        let node_count = nodes.len();
        let keys = unique_dependency_keys(nodes);
        debug!(
            project = name,
            version,
            nodes = node_count,
            unique = keys.len(),
            "dependency graph fetched"
        );

        let dependencies = if keys.is_empty() {
            Vec::new()
        } else {
            self.resolve_scored(name, version, &keys).await?
        };

        let record = ProjectDependencyRecord {
            project: Project::new(name, version, (self.clock)().timestamp()),
            dependencies,
        };
        let outcome = self
            .store
            .reconcile(&record)
            .await
            .map_err(|source| IngestError::Store {
                project: name.to_string(),
                version: version.to_string(),
                source,
            })?;

        info!(
            project = name,
            version,
            dependencies = record.dependencies.len(),
            "project ingested"
        );
        Ok(IngestSummary {
            dependencies: record.dependencies.len(),
            project: record.project,
            outcome: outcome.into(),
        })
    }

    /// [`ingest_project`](Self::ingest_project) bounded by `deadline`.
    ///
    /// On expiry the in-flight remote call or store transaction is dropped;
    /// an open transaction rolls back.
    ///
    /// # Errors
    ///
    /// `IngestError::DeadlineExceeded` on expiry, otherwise as `ingest_project`.
    pub async fn ingest_project_with_deadline(
        &self,
        name: &str,
        version: &str,
        deadline: Duration,
    ) -> Result<IngestSummary, IngestError> {
        match tokio::time::timeout(deadline, self.ingest_project(name, version)).await {
            Ok(result) => result,
            Err(_) => Err(IngestError::DeadlineExceeded {
                project: name.to_string(),
                version: version.to_string(),
                deadline,
            }),
        }
    }

    async fn resolve_scored(
        &self,
        name: &str,
        version: &str,
        keys: &[VersionKey],
    ) -> Result<Vec<Dependency>, IngestError> {
        let resolutions = self
            .client
            .resolve_source_repos(keys)
            .await
            .map_err(|source| IngestError::SourceRepos {
                project: name.to_string(),
                version: version.to_string(),
                source,
            })?;
        let index = index_source_repos(&resolutions);
        debug!(project = name, version, repositories = index.len(), "source repositories resolved");
        if index.is_empty() {
            return Ok(Vec::new());
        }

        let repo_ids: Vec<String> = index.keys().cloned().collect();
        let scores = self
            .client
            .resolve_scores(&repo_ids)
            .await
            .map_err(|source| IngestError::Scores {
                project: name.to_string(),
                version: version.to_string(),
                source,
            })?;
        let dependencies = score_dependencies(&scores, index);
        debug!(
            project = name,
            version,
            scorecards = scores.len(),
            dependencies = dependencies.len(),
            "scores attached"
        );
        Ok(dependencies)
    }

    /// Published versions of `name` in this service's ecosystem.
    ///
    /// # Errors
    ///
    /// `IngestError::Versions` wrapping the client failure.
    pub async fn list_project_versions(&self, name: &str) -> Result<Vec<String>, IngestError> {
        self.client
            .get_versions(&self.ecosystem, name)
            .await
            .map_err(|source| IngestError::Versions {
                project: name.to_string(),
                source,
            })
    }

    /// # Errors
    ///
    /// `IngestError::Storage` wrapping the store failure.
    pub async fn list_projects(&self) -> Result<Vec<Project>, IngestError> {
        self.store
            .list_projects()
            .await
            .map_err(IngestError::storage("list", "projects"))
    }

    /// # Errors
    ///
    /// NotFound-kind error when `name@version` is not stored.
    pub async fn list_dependencies(
        &self,
        name: &str,
        version: &str,
    ) -> Result<ProjectDependencies, IngestError> {
        let dependencies = self
            .store
            .list_dependencies(name, version)
            .await
            .map_err(IngestError::storage("list dependencies of", format!("{name}@{version}")))?;
        Ok(ProjectDependencies {
            project_name: name.to_string(),
            dependencies,
        })
    }

    /// Delete `name@version` and its dependency rows.
    ///
    /// # Errors
    ///
    /// NotFound-kind error when `name@version` is not stored.
    pub async fn delete_project(&self, name: &str, version: &str) -> Result<(), IngestError> {
        self.store
            .delete_project(name, version)
            .await
            .map_err(IngestError::storage("delete", format!("{name}@{version}")))
    }

    /// # Errors
    ///
    /// NotFound-kind error when no stored project depends on `dependency`.
    pub async fn find_projects_by_dependency(
        &self,
        dependency: &str,
    ) -> Result<Vec<Project>, IngestError> {
        self.store
            .find_projects_by_dependency(dependency)
            .await
            .map_err(IngestError::storage("find projects depending on", dependency))
    }

    /// # Errors
    ///
    /// `IngestError::Storage` wrapping the store failure. No match is an
    /// empty list, not an error.
    pub async fn find_dependency_names_by_score(
        &self,
        score: f64,
    ) -> Result<Vec<String>, IngestError> {
        self.store
            .find_dependency_names_by_score(score)
            .await
            .map_err(IngestError::storage("find dependencies scored", score.to_string()))
    }

    /// # Errors
    ///
    /// NotFound-kind error for an unknown project, AlreadyExists-kind when the
    /// project already has a dependency of that name.
    pub async fn add_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &Dependency,
    ) -> Result<(), IngestError> {
        self.store
            .add_dependency(name, version, dependency)
            .await
            .map_err(IngestError::storage("add dependency to", format!("{name}@{version}")))
    }

    /// # Errors
    ///
    /// NotFound-kind error when the project or the dependency is not stored.
    pub async fn update_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &Dependency,
    ) -> Result<(), IngestError> {
        self.store
            .update_dependency(name, version, dependency)
            .await
            .map_err(IngestError::storage("update dependency of", format!("{name}@{version}")))
    }

    /// # Errors
    ///
    /// NotFound-kind error when the project or the dependency is not stored.
    pub async fn remove_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &str,
    ) -> Result<(), IngestError> {
        self.store
            .remove_dependency(name, version, dependency)
            .await
            .map_err(IngestError::storage("remove dependency from", format!("{name}@{version}")))
    }
}
