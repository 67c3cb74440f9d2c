//! Project repository: reconcile, delete, and project-level queries.

use deps_core::diff::diff;
use deps_core::entities::{Project, ProjectDependencyRecord};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::repos::dependency::{insert_dependency, load_dependencies};
use crate::service::{DepsStore, finish};
use crate::store::ReconcileOutcome;

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        name: row.get::<String>(0)?,
        version: row.get::<String>(1)?,
        updated_at: row.get::<i64>(2)?,
    })
}

/// Id of the `(name, version)` project, or `ProjectNotFound`.
pub(crate) async fn project_id(
    conn: &libsql::Connection,
    name: &str,
    version: &str,
) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id FROM projects WHERE name = ?1 AND version = ?2",
            libsql::params![name, version],
        )
        .await
        .map_err(DatabaseError::query("select project id"))?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i64>(0)?),
        None => Err(DatabaseError::ProjectNotFound {
            name: name.to_string(),
            version: version.to_string(),
        }),
    }
}

async fn reconcile_in(
    conn: &libsql::Connection,
    record: &ProjectDependencyRecord,
) -> Result<ReconcileOutcome, DatabaseError> {
    let project = &record.project;
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO projects (name, version, updated_at) VALUES (?1, ?2, ?3)",
            libsql::params![
                project.name.as_str(),
                project.version.as_str(),
                project.updated_at
            ],
        )
        .await
        .map_err(DatabaseError::query("insert project"))?;

    if inserted == 0 {
        return update_in(conn, record).await;
    }

    let id = conn.last_insert_rowid();
    for dep in &record.dependencies {
        insert_dependency(conn, id, dep)
            .await
            .map_err(DatabaseError::query("insert dependency"))?;
    }
    Ok(ReconcileOutcome::Inserted {
        dependencies: record.dependencies.len(),
    })
}

async fn update_in(
    conn: &libsql::Connection,
    record: &ProjectDependencyRecord,
) -> Result<ReconcileOutcome, DatabaseError> {
    let project = &record.project;
    let id = project_id(conn, &project.name, &project.version).await?;
    let current = load_dependencies(conn, id).await?;

    conn.execute(
        "UPDATE projects SET updated_at = ?1 WHERE id = ?2",
        libsql::params![project.updated_at, id],
    )
    .await
    .map_err(DatabaseError::query("update project timestamp"))?;

    let delta = diff(&current, &record.dependencies);
    debug!(
        project = %project.name,
        version = %project.version,
        removed = delta.only_in_current.len(),
        added = delta.only_in_incoming.len(),
        "dependency delta"
    );

    for dep in &delta.only_in_current {
        conn.execute(
            "DELETE FROM dependency WHERE project_id = ?1 AND dependency_name = ?2",
            libsql::params![id, dep.name.as_str()],
        )
        .await
        .map_err(DatabaseError::query("delete stale dependency"))?;
    }
    for dep in &delta.only_in_incoming {
        insert_dependency(conn, id, dep)
            .await
            .map_err(DatabaseError::query("insert new dependency"))?;
    }

    Ok(ReconcileOutcome::Updated {
        added: delta.only_in_incoming.len(),
        removed: delta.only_in_current.len(),
    })
}

async fn collect_projects(mut rows: libsql::Rows) -> Result<Vec<Project>, DatabaseError> {
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_project(&row)?);
    }
    Ok(results)
}

impl DepsStore {
    /// Insert a new project with its dependencies, or reconcile an existing
    /// one against `record.dependencies`. Runs in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement fails; nothing is written.
    pub async fn reconcile(
        &self,
        record: &ProjectDependencyRecord,
    ) -> Result<ReconcileOutcome, DatabaseError> {
        let _gate = self.lock().await;
        let tx = self.begin("begin reconcile").await?;
        let result = reconcile_in(&tx, record).await;
        let outcome = finish(tx, result).await?;
        info!(
            project = %record.project.name,
            version = %record.project.version,
            ?outcome,
            "project reconciled"
        );
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::ProjectNotFound` if `(name, version)` is not stored.
    pub async fn delete_project(&self, name: &str, version: &str) -> Result<(), DatabaseError> {
        let _gate = self.lock().await;
        let tx = self.begin("begin delete project").await?;
        let result: Result<(), DatabaseError> = async {
            let id = project_id(&tx, name, version).await?;
            tx.execute("DELETE FROM projects WHERE id = ?1", [id])
                .await
                .map_err(DatabaseError::query("delete project"))?;
            Ok(())
        }
        .await;
        finish(tx, result).await
    }

    /// Every stored project, ordered by name then version.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Query` if the select fails.
    pub async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let _gate = self.lock().await;
        let rows = self
            .db()
            .conn()
            .query(
                "SELECT name, version, updated_at FROM projects ORDER BY name, version",
                (),
            )
            .await
            .map_err(DatabaseError::query("list projects"))?;
        collect_projects(rows).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoProjectsForDependency` when nothing matches.
    pub async fn find_projects_by_dependency(
        &self,
        dependency: &str,
    ) -> Result<Vec<Project>, DatabaseError> {
        let _gate = self.lock().await;
        let rows = self
            .db()
            .conn()
            .query(
                "SELECT DISTINCT p.name, p.version, p.updated_at
                 FROM projects p
                 JOIN dependency d ON d.project_id = p.id
                 WHERE d.dependency_name = ?1
                 ORDER BY p.name, p.version",
                [dependency],
            )
            .await
            .map_err(DatabaseError::query("find projects by dependency"))?;
        let projects = collect_projects(rows).await?;
        if projects.is_empty() {
            return Err(DatabaseError::NoProjectsForDependency {
                dependency: dependency.to_string(),
            });
        }
        Ok(projects)
    }
}

/// Dependencies currently stored for `(name, version)`; test-only shortcut
/// that skips the gate.
#[cfg(test)]
pub(crate) async fn stored(
    store: &DepsStore,
    name: &str,
    version: &str,
) -> Vec<deps_core::entities::Dependency> {
    let id = project_id(store.db().conn(), name, version).await.unwrap();
    load_dependencies(store.db().conn(), id).await.unwrap()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{names, record, test_store};

    async fn dependency_row_ids(store: &DepsStore) -> Vec<i64> {
        let mut rows = store
            .db()
            .conn()
            .query("SELECT id FROM dependency ORDER BY id", ())
            .await
            .unwrap();
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            ids.push(row.get::<i64>(0).unwrap());
        }
        ids
    }

    #[tokio::test]
    async fn first_reconcile_inserts_everything() {
        let store = test_store().await;
        let outcome = store
            .reconcile(&record("@angular/core", "17.0.0", 100, &[("rxjs", 7.1), ("zone.js", 6.4)]))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Inserted { dependencies: 2 });
        let deps = stored(&store, "@angular/core", "17.0.0").await;
        assert_eq!(names(&deps), vec!["rxjs", "zone.js"]);
    }

    #[tokio::test]
    async fn empty_dependency_set_is_storable() {
        let store = test_store().await;
        store.reconcile(&record("left-pad", "1.3.0", 100, &[])).await.unwrap();

        let projects = store.list_projects().await.unwrap();
        assert_eq!(projects, vec![Project::new("left-pad", "1.3.0", 100)]);
        assert!(stored(&store, "left-pad", "1.3.0").await.is_empty());
    }

    #[tokio::test]
    async fn identical_reconcile_writes_no_dependency_rows() {
        let store = test_store().await;
        let first = record("@angular/core", "17.0.0", 100, &[("rxjs", 7.1), ("tslib", 5.0)]);
        store.reconcile(&first).await.unwrap();
        let ids_before = dependency_row_ids(&store).await;

        let mut second = first.clone();
        second.project.updated_at = 200;
        let outcome = store.reconcile(&second).await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::Updated { added: 0, removed: 0 });
        assert_eq!(outcome.rows_written(), 0);
        assert_eq!(dependency_row_ids(&store).await, ids_before);
        let projects = store.list_projects().await.unwrap();
        assert_eq!(projects[0].updated_at, 200, "timestamp still refreshed");
    }

    #[tokio::test]
    async fn reconcile_applies_minimal_delta() {
        let store = test_store().await;
        store
            .reconcile(&record("@angular/core", "17.0.0", 100, &[("rxjs", 7.1), ("zone.js", 6.4)]))
            .await
            .unwrap();
        let rxjs_id_before = dependency_row_ids(&store).await[0];

        let outcome = store
            .reconcile(&record("@angular/core", "17.0.0", 200, &[("rxjs", 7.1), ("tslib", 5.0)]))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Updated { added: 1, removed: 1 });
        let deps = stored(&store, "@angular/core", "17.0.0").await;
        assert_eq!(names(&deps), vec!["rxjs", "tslib"]);
        assert_eq!(dependency_row_ids(&store).await[0], rxjs_id_before, "rxjs untouched");
    }

    #[tokio::test]
    async fn changed_score_replaces_row() {
        let store = test_store().await;
        store
            .reconcile(&record("react", "18.3.1", 100, &[("loose-envify", 4.0)]))
            .await
            .unwrap();
        let outcome = store
            .reconcile(&record("react", "18.3.1", 200, &[("loose-envify", 4.5)]))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Updated { added: 1, removed: 1 });
        let deps = stored(&store, "react", "18.3.1").await;
        assert_eq!(deps.len(), 1);
        assert!((deps[0].score - 4.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn score_within_tolerance_is_not_rewritten() {
        let store = test_store().await;
        store
            .reconcile(&record("react", "18.3.1", 100, &[("loose-envify", 1.000_000_000_5)]))
            .await
            .unwrap();
        let outcome = store
            .reconcile(&record("react", "18.3.1", 200, &[("loose-envify", 1.000_000_000_4)]))
            .await
            .unwrap();
        assert_eq!(outcome.rows_written(), 0);
    }

    #[tokio::test]
    async fn failed_insert_rolls_back_project_row() {
        let store = test_store().await;
        // Duplicate names violate UNIQUE(project_id, dependency_name) mid-transaction.
        let bad = record("dup", "1.0.0", 100, &[("tslib", 5.0), ("tslib", 5.0)]);
        let err = store.reconcile(&bad).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Query { .. }), "got {err:?}");

        assert!(store.list_projects().await.unwrap().is_empty());
        assert!(dependency_row_ids(&store).await.is_empty());
    }

    #[tokio::test]
    async fn failed_update_keeps_previous_state() {
        let store = test_store().await;
        store
            .reconcile(&record("dup", "1.0.0", 100, &[("rxjs", 7.1)]))
            .await
            .unwrap();

        // rxjs is deleted and the first tslib inserted before the second one
        // collides; all of it has to be undone.
        let bad = record("dup", "1.0.0", 200, &[("tslib", 5.0), ("tslib", 5.0)]);
        let err = store.reconcile(&bad).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Query { .. }), "got {err:?}");

        let projects = store.list_projects().await.unwrap();
        assert_eq!(projects, vec![Project::new("dup", "1.0.0", 100)]);
        assert_eq!(names(&stored(&store, "dup", "1.0.0").await), vec!["rxjs"]);
    }

    #[tokio::test]
    async fn delete_project_cascades_and_isolates_versions() {
        let store = test_store().await;
        store
            .reconcile(&record("svelte", "5.0.0", 100, &[("acorn", 7.0), ("esrap", 3.0)]))
            .await
            .unwrap();
        store
            .reconcile(&record("svelte", "5.1.0", 100, &[("acorn", 7.0), ("zimmerframe", 4.0)]))
            .await
            .unwrap();

        store.delete_project("svelte", "5.0.0").await.unwrap();

        let projects = store.list_projects().await.unwrap();
        assert_eq!(projects, vec![Project::new("svelte", "5.1.0", 100)]);
        let remaining = stored(&store, "svelte", "5.1.0").await;
        assert_eq!(names(&remaining), vec!["acorn", "zimmerframe"]);
        assert_eq!(dependency_row_ids(&store).await.len(), 2, "cascade removed 5.0.0 rows");
    }

    #[tokio::test]
    async fn delete_missing_project_is_not_found() {
        let store = test_store().await;
        let err = store.delete_project("svelte", "0.0.1").await.unwrap_err();
        assert!(matches!(err, DatabaseError::ProjectNotFound { .. }));
    }

    #[tokio::test]
    async fn list_projects_sorted() {
        let store = test_store().await;
        for (name, version) in [("vue", "3.4.0"), ("react", "18.3.1"), ("react", "18.2.0")] {
            store.reconcile(&record(name, version, 1, &[])).await.unwrap();
        }
        let listed: Vec<(String, String)> = store
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| (p.name, p.version))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("react".to_string(), "18.2.0".to_string()),
                ("react".to_string(), "18.3.1".to_string()),
                ("vue".to_string(), "3.4.0".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn find_projects_by_dependency_matches_across_projects() {
        let store = test_store().await;
        store
            .reconcile(&record("@angular/core", "17.0.0", 1, &[("tslib", 5.0), ("rxjs", 7.1)]))
            .await
            .unwrap();
        store
            .reconcile(&record("@angular/common", "17.0.0", 2, &[("tslib", 5.0)]))
            .await
            .unwrap();
        store
            .reconcile(&record("react", "18.3.1", 3, &[("loose-envify", 4.0)]))
            .await
            .unwrap();

        let found = store.find_projects_by_dependency("tslib").await.unwrap();
        let found: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(found, vec!["@angular/common", "@angular/core"]);
    }

    #[tokio::test]
    async fn find_projects_by_unknown_dependency_is_not_found() {
        let store = test_store().await;
        store.reconcile(&record("react", "18.3.1", 1, &[])).await.unwrap();
        let err = store.find_projects_by_dependency("tslib").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NoProjectsForDependency { .. }));
    }
}
