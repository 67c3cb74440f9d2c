//! # deps-client
//!
//! Package-metadata service client for depsmanager.
//!
//! [`MetadataClient`] is the seam the ingestion pipeline consumes. It covers
//! four lookups with different cardinalities:
//! - versions of one package
//! - the resolved dependency graph of one package version
//! - a batch of package versions → their related source repositories
//! - a batch of repository ids → their scorecards
//!
//! [`DepsDevClient`] implements it against the deps.dev HTTP API.

mod deps_dev;
mod error;
mod http;

pub use deps_dev::DepsDevClient;
pub use error::MetadataError;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Relation tag of the graph node that is the queried package itself.
pub const RELATION_SELF: &str = "SELF";

/// Relation type marking a related project as the package's source repository.
pub const RELATION_SOURCE_REPO: &str = "SOURCE_REPO";

// ── Types ──────────────────────────────────────────────────────────

/// Identifies one published package version within an ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionKey {
    pub system: String,
    pub name: String,
    pub version: String,
}

/// One node of a resolved dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub version_key: VersionKey,
    /// `SELF`, `DIRECT`, or `INDIRECT`.
    pub relation: String,
}

impl DependencyNode {
    #[must_use]
    pub fn is_self(&self) -> bool {
        self.relation == RELATION_SELF
    }
}

/// A project related to a package version (source repo, issue tracker, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedProject {
    /// Repository identifier, e.g. `github.com/reactivex/rxjs`.
    pub repo_id: String,
    pub relation_type: String,
}

impl RelatedProject {
    #[must_use]
    pub fn is_source_repo(&self) -> bool {
        self.relation_type == RELATION_SOURCE_REPO
    }
}

/// Related projects of one package version, in the order the service sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRepoResolution {
    /// Package name the related projects belong to.
    pub name: String,
    pub related_projects: Vec<RelatedProject>,
}

/// Scorecard summary of one repository.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoScore {
    pub repo_id: String,
    /// `None` when the service has no scorecard date for the repository.
    pub scorecard_date: Option<DateTime<Utc>>,
    pub overall_score: f64,
}

impl RepoScore {
    /// Unix timestamp of the scorecard, or `0` when the date is unknown.
    ///
    /// The zero instant `0001-01-01T00:00:00Z` counts as unknown too.
    #[must_use]
    pub fn scorecard_timestamp(&self) -> i64 {
        self.scorecard_date
            .filter(|date| !is_zero_instant(date))
            .map_or(0, |date| date.timestamp())
    }
}

/// `0001-01-01T00:00:00Z`, the encoding of "unset" some producers emit.
const ZERO_INSTANT_SECS: i64 = -62_135_596_800;

fn is_zero_instant(date: &DateTime<Utc>) -> bool {
    date.timestamp() == ZERO_INSTANT_SECS
}

// ── Seam ───────────────────────────────────────────────────────────

/// Remote lookups the ingestion pipeline depends on.
///
/// Implementations must report an absent project/version as
/// [`MetadataError::NotFound`] and keep transport or decoding failures in the
/// other variants.
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// All published versions of `project`.
    async fn get_versions(
        &self,
        ecosystem: &str,
        project: &str,
    ) -> Result<Vec<String>, MetadataError>;

    /// Direct and transitive dependency nodes of `project@version`, including
    /// the `SELF` node.
    async fn get_dependency_graph(
        &self,
        ecosystem: &str,
        project: &str,
        version: &str,
    ) -> Result<Vec<DependencyNode>, MetadataError>;

    /// Related projects for each requested package version, in one call.
    async fn resolve_source_repos(
        &self,
        keys: &[VersionKey],
    ) -> Result<Vec<SourceRepoResolution>, MetadataError>;

    /// Scorecards for each requested repository id, in one call.
    async fn resolve_scores(&self, repo_ids: &[String]) -> Result<Vec<RepoScore>, MetadataError>;
}
