//! Test doubles shared by the deps-ingest integration tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use deps_client::{
    DependencyNode, MetadataClient, MetadataError, RelatedProject, RepoScore, SourceRepoResolution,
    VersionKey,
};
use deps_core::entities::{Dependency, Project, ProjectDependencyRecord};
use deps_db::error::DatabaseError;
use deps_db::{ProjectStore, ReconcileOutcome};

pub const NOW: i64 = 1_700_000_000;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_opt(NOW, 0).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Versions,
    Graph,
    SourceRepos,
    Scores,
}

/// A recorded call to [`FakeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Versions { ecosystem: String, project: String },
    Graph { ecosystem: String, project: String, version: String },
    SourceRepos(Vec<VersionKey>),
    Scores(Vec<String>),
}

/// Canned metadata service with per-stage failure injection.
#[derive(Default)]
pub struct FakeClient {
    pub versions: Vec<String>,
    pub graph: Vec<DependencyNode>,
    pub resolutions: Vec<SourceRepoResolution>,
    pub scores: Vec<RepoScore>,
    pub fail_at: Option<(Stage, fn() -> MetadataError)>,
    pub graph_delay: Option<Duration>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeClient {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.calls()
            .iter()
            .map(|call| match call {
                Call::Versions { .. } => Stage::Versions,
                Call::Graph { .. } => Stage::Graph,
                Call::SourceRepos(_) => Stage::SourceRepos,
                Call::Scores(_) => Stage::Scores,
            })
            .collect()
    }

    fn check(&self, stage: Stage, call: Call) -> Result<(), MetadataError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_at {
            Some((failing, make)) if failing == stage => Err(make()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl MetadataClient for FakeClient {
    async fn get_versions(
        &self,
        ecosystem: &str,
        project: &str,
    ) -> Result<Vec<String>, MetadataError> {
        self.check(
            Stage::Versions,
            Call::Versions {
                ecosystem: ecosystem.into(),
                project: project.into(),
            },
        )?;
        Ok(self.versions.clone())
    }

    async fn get_dependency_graph(
        &self,
        ecosystem: &str,
        project: &str,
        version: &str,
    ) -> Result<Vec<DependencyNode>, MetadataError> {
        if let Some(delay) = self.graph_delay {
            tokio::time::sleep(delay).await;
        }
        self.check(
            Stage::Graph,
            Call::Graph {
                ecosystem: ecosystem.into(),
                project: project.into(),
                version: version.into(),
            },
        )?;
        Ok(self.graph.clone())
    }

    async fn resolve_source_repos(
        &self,
        keys: &[VersionKey],
    ) -> Result<Vec<SourceRepoResolution>, MetadataError> {
        self.check(Stage::SourceRepos, Call::SourceRepos(keys.to_vec()))?;
        Ok(self.resolutions.clone())
    }

    async fn resolve_scores(&self, repo_ids: &[String]) -> Result<Vec<RepoScore>, MetadataError> {
        self.check(Stage::Scores, Call::Scores(repo_ids.to_vec()))?;
        Ok(self.scores.clone())
    }
}

/// Store double that records every reconcile and answers reads from canned data.
#[derive(Default)]
pub struct RecordingStore {
    pub reconciled: Mutex<Vec<ProjectDependencyRecord>>,
    pub fail_reconcile: bool,
}

impl RecordingStore {
    pub fn records(&self) -> Vec<ProjectDependencyRecord> {
        self.reconciled.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProjectStore for RecordingStore {
    async fn reconcile(
        &self,
        record: &ProjectDependencyRecord,
    ) -> Result<ReconcileOutcome, DatabaseError> {
        if self.fail_reconcile {
            return Err(DatabaseError::NoResult);
        }
        self.reconciled.lock().unwrap().push(record.clone());
        Ok(ReconcileOutcome::Inserted {
            dependencies: record.dependencies.len(),
        })
    }

    async fn delete_project(&self, name: &str, version: &str) -> Result<(), DatabaseError> {
        Err(DatabaseError::ProjectNotFound {
            name: name.into(),
            version: version.into(),
        })
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        Ok(self.records().into_iter().map(|r| r.project).collect())
    }

    async fn list_dependencies(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Vec<Dependency>, DatabaseError> {
        self.records()
            .into_iter()
            .find(|r| r.project.name == name && r.project.version == version)
            .map(|r| r.dependencies)
            .ok_or_else(|| DatabaseError::ProjectNotFound {
                name: name.into(),
                version: version.into(),
            })
    }

    async fn find_projects_by_dependency(
        &self,
        dependency: &str,
    ) -> Result<Vec<Project>, DatabaseError> {
        Err(DatabaseError::NoProjectsForDependency {
            dependency: dependency.into(),
        })
    }

    async fn find_dependency_names_by_score(
        &self,
        _score: f64,
    ) -> Result<Vec<String>, DatabaseError> {
        Ok(Vec::new())
    }

    async fn add_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &Dependency,
    ) -> Result<(), DatabaseError> {
        Err(DatabaseError::DependencyExists {
            name: name.into(),
            version: version.into(),
            dependency: dependency.name.clone(),
        })
    }

    async fn update_dependency(
        &self,
        _name: &str,
        _version: &str,
        _dependency: &Dependency,
    ) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn remove_dependency(
        &self,
        _name: &str,
        _version: &str,
        _dependency: &str,
    ) -> Result<(), DatabaseError> {
        Ok(())
    }
}

// ── Builders ───────────────────────────────────────────────────────

pub fn key(name: &str, version: &str) -> VersionKey {
    VersionKey {
        system: "NPM".into(),
        name: name.into(),
        version: version.into(),
    }
}

pub fn node(name: &str, version: &str, relation: &str) -> DependencyNode {
    DependencyNode {
        version_key: key(name, version),
        relation: relation.into(),
    }
}

pub fn source_repo(name: &str, repo_id: &str) -> SourceRepoResolution {
    SourceRepoResolution {
        name: name.into(),
        related_projects: vec![RelatedProject {
            repo_id: repo_id.into(),
            relation_type: "SOURCE_REPO".into(),
        }],
    }
}

pub fn no_source_repo(name: &str) -> SourceRepoResolution {
    SourceRepoResolution {
        name: name.into(),
        related_projects: vec![RelatedProject {
            repo_id: format!("https://issues.example/{name}"),
            relation_type: "ISSUE_TRACKER".into(),
        }],
    }
}

pub fn scorecard(repo_id: &str, score: f64, date: Option<i64>) -> RepoScore {
    RepoScore {
        repo_id: repo_id.into(),
        scorecard_date: date.map(|secs| Utc.timestamp_opt(secs, 0).unwrap()),
        overall_score: score,
    }
}

/// `@angular/core@17.0.0` depending on rxjs, tslib (twice), and zone.js.
pub fn angular_client() -> FakeClient {
    FakeClient {
        graph: vec![
            node("@angular/core", "17.0.0", "SELF"),
            node("rxjs", "7.8.1", "DIRECT"),
            node("tslib", "2.6.2", "DIRECT"),
            node("zone.js", "0.14.2", "DIRECT"),
            node("tslib", "2.3.0", "INDIRECT"),
        ],
        resolutions: vec![
            source_repo("rxjs", "github.com/reactivex/rxjs"),
            source_repo("tslib", "github.com/microsoft/tslib"),
            source_repo("zone.js", "github.com/angular/angular"),
        ],
        scores: vec![
            scorecard("github.com/angular/angular", 6.4, Some(1_690_000_000)),
            scorecard("github.com/microsoft/tslib", 5.0, None),
            scorecard("github.com/reactivex/rxjs", 7.1, Some(1_695_000_000)),
        ],
        ..FakeClient::default()
    }
}
