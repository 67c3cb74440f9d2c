//! deps.dev API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MetadataError;
use crate::http::{check_response, decode_json};
use crate::{
    DependencyNode, MetadataClient, RelatedProject, RepoScore, SourceRepoResolution, VersionKey,
};

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct VersionsResponse {
    #[serde(default)]
    versions: Vec<VersionEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionEntry {
    version_key: VersionOnly,
}

#[derive(Deserialize)]
struct VersionOnly {
    version: String,
}

#[derive(Deserialize)]
struct DependenciesResponse {
    #[serde(default)]
    nodes: Vec<WireNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNode {
    version_key: VersionKey,
    #[serde(default)]
    relation: String,
}

#[derive(Serialize)]
struct BatchRequest<T> {
    requests: Vec<T>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionBatchItem<'a> {
    version_key: &'a VersionKey,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectBatchItem<'a> {
    project_key: ProjectKey<'a>,
}

#[derive(Serialize)]
struct ProjectKey<'a> {
    id: &'a str,
}

#[derive(Deserialize)]
struct VersionBatchResponse {
    #[serde(default)]
    responses: Vec<VersionBatchEntry>,
}

#[derive(Deserialize)]
struct VersionBatchEntry {
    #[serde(default)]
    version: Option<WireVersion>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVersion {
    version_key: NameOnly,
    #[serde(default)]
    related_projects: Vec<WireRelatedProject>,
}

#[derive(Deserialize)]
struct NameOnly {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRelatedProject {
    project_key: OwnedProjectKey,
    #[serde(default)]
    relation_type: String,
}

#[derive(Deserialize)]
struct OwnedProjectKey {
    id: String,
}

#[derive(Deserialize)]
struct ProjectBatchResponse {
    #[serde(default)]
    responses: Vec<ProjectBatchEntry>,
}

#[derive(Deserialize)]
struct ProjectBatchEntry {
    #[serde(default)]
    project: Option<WireProject>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProject {
    project_key: OwnedProjectKey,
    #[serde(default)]
    scorecard: Option<WireScorecard>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireScorecard {
    #[serde(default)]
    date: Option<DateTime<Utc>>,
    #[serde(default)]
    overall_score: f64,
}

impl From<WireVersion> for SourceRepoResolution {
    fn from(version: WireVersion) -> Self {
        Self {
            name: version.version_key.name,
            related_projects: version
                .related_projects
                .into_iter()
                .map(|p| RelatedProject {
                    repo_id: p.project_key.id,
                    relation_type: p.relation_type,
                })
                .collect(),
        }
    }
}

impl From<WireProject> for RepoScore {
    fn from(project: WireProject) -> Self {
        let (scorecard_date, overall_score) = project
            .scorecard
            .map_or((None, 0.0), |s| (s.date, s.overall_score));
        Self {
            repo_id: project.project_key.id,
            scorecard_date,
            overall_score,
        }
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the deps.dev v3 API.
///
/// Every method issues exactly one request; there is no retry and no caching.
#[derive(Debug, Clone)]
pub struct DepsDevClient {
    http: reqwest::Client,
    base_url: String,
}

impl DepsDevClient {
    /// Create a client for the service at `base_url` (e.g. `https://api.deps.dev`).
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Http`] if the underlying `reqwest::Client`
    /// cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, MetadataError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn package_url(&self, ecosystem: &str, project: &str) -> String {
        format!(
            "{}/v3/systems/{}/packages/{}",
            self.base_url,
            ecosystem.to_ascii_uppercase(),
            urlencoding::encode(project)
        )
    }
}

#[async_trait]
impl MetadataClient for DepsDevClient {
    async fn get_versions(
        &self,
        ecosystem: &str,
        project: &str,
    ) -> Result<Vec<String>, MetadataError> {
        let resource = format!("{ecosystem}/{project}");
        let url = self.package_url(ecosystem, project);
        tracing::debug!(%url, "fetching package versions");

        let resp = check_response(self.http.get(&url).send().await?, &resource).await?;
        let data: VersionsResponse = decode_json(resp, &resource).await?;
        Ok(data
            .versions
            .into_iter()
            .map(|v| v.version_key.version)
            .collect())
    }

    async fn get_dependency_graph(
        &self,
        ecosystem: &str,
        project: &str,
        version: &str,
    ) -> Result<Vec<DependencyNode>, MetadataError> {
        let resource = format!("{ecosystem}/{project}@{version}");
        let url = format!(
            "{}/versions/{}:dependencies",
            self.package_url(ecosystem, project),
            urlencoding::encode(version)
        );
        tracing::debug!(%url, "fetching dependency graph");

        let resp = check_response(self.http.get(&url).send().await?, &resource).await?;
        let data: DependenciesResponse = decode_json(resp, &resource).await?;
        Ok(data
            .nodes
            .into_iter()
            .map(|n| DependencyNode {
                version_key: n.version_key,
                relation: n.relation,
            })
            .collect())
    }

    async fn resolve_source_repos(
        &self,
        keys: &[VersionKey],
    ) -> Result<Vec<SourceRepoResolution>, MetadataError> {
        let resource = format!("versionbatch ({} keys)", keys.len());
        let url = format!("{}/v3alpha/versionbatch", self.base_url);
        let body = BatchRequest {
            requests: keys
                .iter()
                .map(|version_key| VersionBatchItem { version_key })
                .collect(),
        };
        tracing::debug!(%url, keys = keys.len(), "resolving source repositories");

        let resp = check_response(self.http.post(&url).json(&body).send().await?, &resource)
            .await?;
        let data: VersionBatchResponse = decode_json(resp, &resource).await?;
        Ok(data
            .responses
            .into_iter()
            .filter_map(|entry| entry.version)
            .map(SourceRepoResolution::from)
            .collect())
    }

    async fn resolve_scores(&self, repo_ids: &[String]) -> Result<Vec<RepoScore>, MetadataError> {
        let resource = format!("projectbatch ({} ids)", repo_ids.len());
        let url = format!("{}/v3alpha/projectbatch", self.base_url);
        let body = BatchRequest {
            requests: repo_ids
                .iter()
                .map(|id| ProjectBatchItem {
                    project_key: ProjectKey { id },
                })
                .collect(),
        };
        tracing::debug!(%url, ids = repo_ids.len(), "resolving repository scores");

        let resp = check_response(self.http.post(&url).json(&body).send().await?, &resource)
            .await?;
        let data: ProjectBatchResponse = decode_json(resp, &resource).await?;
        Ok(data
            .responses
            .into_iter()
            .filter_map(|entry| entry.project)
            .map(RepoScore::from)
            .collect())
    }
}
