//! Project change log commands
//!
//! Stores committed change batches and lists them back, most recent first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::Result;
use crate::domain::audit::{ChangeLogSink, ChangeRecord};
use crate::storage::Database;

/// Default number of entries returned by `list`
pub const DEFAULT_LOG_LIMIT: i64 = 1000;

/// Actor recorded when none is given
pub const DEFAULT_ACTOR: &str = "System";

/// A stored change log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLog {
    pub id: i64,
    pub project_id: String,
    /// "N/A", a stage name, or "{stage} - {milestone}"
    pub stage_name: String,
    pub field_changed: String,
    pub old_value: String,
    pub new_value: String,
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
}

/// Change log repository for database operations
pub struct ProjectLogRepository<'a> {
    db: &'a Database,
}

impl<'a> ProjectLogRepository<'a> {
    /// Create a new change log repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Entries for a project, most recent first
    pub async fn list(&self, project_id: &str, limit: i64) -> Result<Vec<ProjectLog>> {
        let rows = sqlx::query(
            r#"
            SELECT id, project_id, stage_name, field_changed, old_value, new_value, changed_at, changed_by
            FROM project_logs
            WHERE project_id = ?
            ORDER BY changed_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(project_id)
        .bind(limit.max(0))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(|r| self.row_to_log(r)).collect())
    }

    /// Number of entries stored for a project
    pub async fn count(&self, project_id: &str) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project_logs WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.0)
    }

    /// Convert a database row to a ProjectLog
    fn row_to_log(&self, row: sqlx::sqlite::SqliteRow) -> ProjectLog {
        ProjectLog {
            id: row.get("id"),
            project_id: row.get("project_id"),
            stage_name: row.get("stage_name"),
            field_changed: row.get("field_changed"),
            old_value: row.get("old_value"),
            new_value: row.get("new_value"),
            changed_at: row.get("changed_at"),
            changed_by: row.get("changed_by"),
        }
    }
}

#[async_trait]
impl ChangeLogSink for ProjectLogRepository<'_> {
    async fn append(
        &self,
        project_id: &str,
        actor: &str,
        changes: &[ChangeRecord],
    ) -> Result<usize> {
        if changes.is_empty() {
            return Ok(0);
        }

        let changed_at = Utc::now();
        let mut tx = self.db.pool().begin().await?;

        for change in changes {
            sqlx::query(
                r#"
                INSERT INTO project_logs (project_id, stage_name, field_changed, old_value, new_value, changed_at, changed_by)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(project_id)
            .bind(&change.stage_name)
            .bind(&change.field_name)
            .bind(&change.previous_value)
            .bind(&change.new_value)
            .bind(changed_at)
            .bind(actor)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            project_id = %project_id,
            actor = %actor,
            count = changes.len(),
            "Appended change log entries"
        );

        Ok(changes.len())
    }
}

/// List the change log for a project
pub async fn list_logs(db: &Database, project_id: &str, limit: i64) -> Result<Vec<ProjectLog>> {
    ProjectLogRepository::new(db).list(project_id, limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::{ChangeLocation, StageField, TrackedField};

    async fn db_with_project() -> Database {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");
        sqlx::query(
            "INSERT INTO projects (id, code, name, department, tech_department, project_owner, business_owner) VALUES ('p1', 'PRJ001', 'Portal', 'Ops', 'IT', 'Ann', 'Bo')",
        )
        .execute(db.pool())
        .await
        .expect("Failed to insert project");
        db
    }

    fn owner_change(stage: &str, from: &str, to: &str) -> ChangeRecord {
        ChangeRecord::new(
            TrackedField::Stage(StageField::StageOwner),
            &ChangeLocation::Stage(stage.to_string()),
            from,
            to,
        )
    }

    #[tokio::test]
    async fn test_append_and_list() {
        let db = db_with_project().await;
        let repo = ProjectLogRepository::new(&db);

        let stored = repo
            .append(
                "p1",
                "alice",
                &[owner_change("Concept", "", "Bob"), ChangeRecord::milestone_deleted("UAT", "Sign-off")],
            )
            .await
            .unwrap();
        assert_eq!(stored, 2);

        let logs = repo.list("p1", DEFAULT_LOG_LIMIT).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|l| l.changed_by == "alice"));

        let owner = logs
            .iter()
            .find(|l| l.field_changed == "Stage Owner")
            .expect("owner change stored");
        assert_eq!(owner.stage_name, "Concept");
        assert_eq!(owner.old_value, "(empty)");
        assert_eq!(owner.new_value, "Bob");
    }

    #[tokio::test]
    async fn test_list_most_recent_first_with_limit() {
        let db = db_with_project().await;
        let repo = ProjectLogRepository::new(&db);

        repo.append("p1", "System", &[owner_change("Concept", "A", "B")])
            .await
            .unwrap();
        repo.append("p1", "System", &[owner_change("Concept", "B", "C")])
            .await
            .unwrap();

        let logs = repo.list("p1", 1).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].new_value, "C");
        assert_eq!(repo.count("p1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch_stores_nothing() {
        let db = db_with_project().await;
        let repo = ProjectLogRepository::new(&db);

        assert_eq!(repo.append("p1", "System", &[]).await.unwrap(), 0);
        assert_eq!(repo.count("p1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_append_for_unknown_project_is_rolled_back() {
        let db = db_with_project().await;
        let repo = ProjectLogRepository::new(&db);

        let result = repo
            .append("missing", "System", &[owner_change("Concept", "A", "B")])
            .await;
        assert!(result.is_err());
        assert_eq!(repo.count("missing").await.unwrap(), 0);
    }
}
