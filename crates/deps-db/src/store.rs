//! The persistence seam the ingestion pipeline writes through.

use async_trait::async_trait;
use deps_core::entities::{Dependency, Project, ProjectDependencyRecord};

use crate::error::DatabaseError;
use crate::service::DepsStore;

/// What a reconcile did to the stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The project was new; every dependency was inserted.
    Inserted { dependencies: usize },
    /// The project existed; its timestamp was refreshed and only the delta
    /// was applied.
    Updated { added: usize, removed: usize },
}

impl ReconcileOutcome {
    /// Number of dependency rows inserted or deleted.
    #[must_use]
    pub const fn rows_written(&self) -> usize {
        match *self {
            Self::Inserted { dependencies } => dependencies,
            Self::Updated { added, removed } => added + removed,
        }
    }
}

/// Transactional project/dependency storage.
///
/// Every operation is atomic: a failing statement rolls back the whole
/// operation and leaves prior state untouched.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert the project with all its dependencies, or, if `(name, version)`
    /// already exists, refresh its timestamp and apply only the dependency
    /// delta.
    async fn reconcile(
        &self,
        record: &ProjectDependencyRecord,
    ) -> Result<ReconcileOutcome, DatabaseError>;

    /// Delete a project and, by cascade, its dependencies.
    async fn delete_project(&self, name: &str, version: &str) -> Result<(), DatabaseError>;

    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError>;

    async fn list_dependencies(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Vec<Dependency>, DatabaseError>;

    /// Projects that store a dependency called `dependency`.
    async fn find_projects_by_dependency(
        &self,
        dependency: &str,
    ) -> Result<Vec<Project>, DatabaseError>;

    /// Distinct dependency names whose score is within tolerance of `score`.
    async fn find_dependency_names_by_score(&self, score: f64)
    -> Result<Vec<String>, DatabaseError>;

    async fn add_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &Dependency,
    ) -> Result<(), DatabaseError>;

    /// Overwrite score and timestamp of an existing dependency.
    async fn update_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &Dependency,
    ) -> Result<(), DatabaseError>;

    async fn remove_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &str,
    ) -> Result<(), DatabaseError>;
}

#[async_trait]
impl ProjectStore for DepsStore {
    async fn reconcile(
        &self,
        record: &ProjectDependencyRecord,
    ) -> Result<ReconcileOutcome, DatabaseError> {
        Self::reconcile(self, record).await
    }

    async fn delete_project(&self, name: &str, version: &str) -> Result<(), DatabaseError> {
        Self::delete_project(self, name, version).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        Self::list_projects(self).await
    }

    async fn list_dependencies(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Vec<Dependency>, DatabaseError> {
        Self::list_dependencies(self, name, version).await
    }

    async fn find_projects_by_dependency(
        &self,
        dependency: &str,
    ) -> Result<Vec<Project>, DatabaseError> {
        Self::find_projects_by_dependency(self, dependency).await
    }

    async fn find_dependency_names_by_score(
        &self,
        score: f64,
    ) -> Result<Vec<String>, DatabaseError> {
        Self::find_dependency_names_by_score(self, score).await
    }

    async fn add_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &Dependency,
    ) -> Result<(), DatabaseError> {
        Self::add_dependency(self, name, version, dependency).await
    }

    async fn update_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &Dependency,
    ) -> Result<(), DatabaseError> {
        Self::update_dependency(self, name, version, dependency).await
    }

    async fn remove_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &str,
    ) -> Result<(), DatabaseError> {
        Self::remove_dependency(self, name, version, dependency).await
    }
}
