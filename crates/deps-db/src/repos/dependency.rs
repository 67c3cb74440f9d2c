//! Dependency repository: per-project listing, score lookup, manual edits.

use deps_core::entities::{Dependency, SCORE_TOLERANCE};

use crate::error::{DatabaseError, is_unique_violation};
use crate::repos::project::project_id;
use crate::service::{DepsStore, finish};

fn row_to_dependency(row: &libsql::Row) -> Result<Dependency, DatabaseError> {
    Ok(Dependency {
        name: row.get::<String>(0)?,
        score: row.get::<f64>(1)?,
        updated_at: row.get::<i64>(2)?,
    })
}

pub(crate) async fn insert_dependency(
    conn: &libsql::Connection,
    project_id: i64,
    dep: &Dependency,
) -> Result<u64, libsql::Error> {
    conn.execute(
        "INSERT INTO dependency (project_id, dependency_name, score, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
        libsql::params![project_id, dep.name.as_str(), dep.score, dep.updated_at],
    )
    .await
}

pub(crate) async fn load_dependencies(
    conn: &libsql::Connection,
    project_id: i64,
) -> Result<Vec<Dependency>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT dependency_name, score, updated_at FROM dependency
             WHERE project_id = ?1 ORDER BY dependency_name",
            [project_id],
        )
        .await
        .map_err(DatabaseError::query("select dependencies"))?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_dependency(&row)?);
    }
    Ok(results)
}

impl DepsStore {
    /// # Errors
    ///
    /// Returns `DatabaseError::ProjectNotFound` if `(name, version)` is not stored.
    pub async fn list_dependencies(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Vec<Dependency>, DatabaseError> {
        let _gate = self.lock().await;
        let conn = self.db().conn();
        let id = project_id(conn, name, version).await?;
        load_dependencies(conn, id).await
    }

    /// Distinct names of dependencies, across all projects, whose score lies
    /// within [`SCORE_TOLERANCE`] of `score`. Sorted; empty when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Query` if the select fails.
    pub async fn find_dependency_names_by_score(
        &self,
        score: f64,
    ) -> Result<Vec<String>, DatabaseError> {
        let _gate = self.lock().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT DISTINCT dependency_name FROM dependency
                 WHERE score BETWEEN ?1 AND ?2
                 ORDER BY dependency_name",
                libsql::params![score - SCORE_TOLERANCE, score + SCORE_TOLERANCE],
            )
            .await
            .map_err(DatabaseError::query("select dependencies by score"))?;
        let mut names = Vec::new();
        while let Some(row) = rows.next().await? {
            names.push(row.get::<String>(0)?);
        }
        Ok(names)
    }

    /// # Errors
    ///
    /// `ProjectNotFound` for an unknown project, `DependencyExists` when the
    /// project already has a dependency with that name.
    pub async fn add_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &Dependency,
    ) -> Result<(), DatabaseError> {
        let _gate = self.lock().await;
        let tx = self.begin("begin add dependency").await?;
        let result: Result<(), DatabaseError> = async {
            let id = project_id(&tx, name, version).await?;
            match insert_dependency(&tx, id, dependency).await {
                Ok(_) => Ok(()),
                Err(e) if is_unique_violation(&e) => Err(DatabaseError::DependencyExists {
                    name: name.to_string(),
                    version: version.to_string(),
                    dependency: dependency.name.clone(),
                }),
                Err(e) => Err(DatabaseError::query("insert dependency")(e)),
            }
        }
        .await;
        finish(tx, result).await
    }

    /// # Errors
    ///
    /// `ProjectNotFound` for an unknown project, `DependencyNotFound` when the
    /// project has no dependency called `dependency.name`.
    pub async fn update_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &Dependency,
    ) -> Result<(), DatabaseError> {
        let _gate = self.lock().await;
        let tx = self.begin("begin update dependency").await?;
        let result: Result<(), DatabaseError> = async {
            let id = project_id(&tx, name, version).await?;
            let changed = tx
                .execute(
                    "UPDATE dependency SET score = ?1, updated_at = ?2
                     WHERE project_id = ?3 AND dependency_name = ?4",
                    libsql::params![
                        dependency.score,
                        dependency.updated_at,
                        id,
                        dependency.name.as_str()
                    ],
                )
                .await
                .map_err(DatabaseError::query("update dependency"))?;
            if changed == 0 {
                return Err(DatabaseError::DependencyNotFound {
                    name: name.to_string(),
                    version: version.to_string(),
                    dependency: dependency.name.clone(),
                });
            }
            Ok(())
        }
        .await;
        finish(tx, result).await
    }

    /// # Errors
    ///
    /// `ProjectNotFound` for an unknown project, `DependencyNotFound` when the
    /// project has no dependency called `dependency`.
    pub async fn remove_dependency(
        &self,
        name: &str,
        version: &str,
        dependency: &str,
    ) -> Result<(), DatabaseError> {
        let _gate = self.lock().await;
        let tx = self.begin("begin remove dependency").await?;
        let result: Result<(), DatabaseError> = async {
            let id = project_id(&tx, name, version).await?;
            let removed = tx
                .execute(
                    "DELETE FROM dependency WHERE project_id = ?1 AND dependency_name = ?2",
                    libsql::params![id, dependency],
                )
                .await
                .map_err(DatabaseError::query("delete dependency"))?;
            if removed == 0 {
                return Err(DatabaseError::DependencyNotFound {
                    name: name.to_string(),
                    version: version.to_string(),
                    dependency: dependency.to_string(),
                });
            }
            Ok(())
        }
        .await;
        finish(tx, result).await
    }
}
