//! Pure transformation steps between the remote calls.
//!
//! Kept free of I/O so each step's dedup and re-keying rules can be tested
//! on plain values.

use std::collections::{BTreeMap, HashSet};

use deps_client::{DependencyNode, RepoScore, SourceRepoResolution, VersionKey};
use deps_core::entities::Dependency;

/// Repository id → names of the dependencies whose source it is.
pub type RepoIndex = BTreeMap<String, Vec<String>>;

/// Drop the `SELF` node and keep the first key seen per `(system, name)`.
///
/// The version of that first occurrence is the one sent downstream.
#[must_use]
pub fn unique_dependency_keys(nodes: Vec<DependencyNode>) -> Vec<VersionKey> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    nodes
        .into_iter()
        .filter(|node| !node.is_self())
        .map(|node| node.version_key)
        .filter(|key| seen.insert((key.system.clone(), key.name.clone())))
        .collect()
}

/// Group dependency names by their source repository.
///
/// Only the first `SOURCE_REPO` relation of each resolution counts. Names
/// without one are dropped.
#[must_use]
pub fn index_source_repos(resolutions: &[SourceRepoResolution]) -> RepoIndex {
    let mut index = RepoIndex::new();
    for resolution in resolutions {
        if let Some(repo) = resolution
            .related_projects
            .iter()
            .find(|related| related.is_source_repo())
        {
            index
                .entry(repo.repo_id.clone())
                .or_default()
                .push(resolution.name.clone());
        }
    }
    index
}

/// Emit one dependency per name backed by each scored repository.
///
/// A repository's entry is consumed on first match, so a repeated scorecard
/// in the response does not duplicate names. Repositories the service
/// returned no scorecard for contribute nothing.
#[must_use]
pub fn score_dependencies(scores: &[RepoScore], mut index: RepoIndex) -> Vec<Dependency> {
    let mut dependencies = Vec::new();
    for score in scores {
        let Some(names) = index.remove(&score.repo_id) else {
            continue;
        };
        let updated_at = score.scorecard_timestamp();
        dependencies.extend(
            names
                .into_iter()
                .map(|name| Dependency::new(name, score.overall_score, updated_at)),
        );
    }
    dependencies
}
