//! Project management commands
//!
//! Provides CRUD operations for tracked projects and persists edit sessions
//! together with their change log.

use crate::application::validators::ProjectValidator;
use crate::commands::log::{DEFAULT_ACTOR, ProjectLogRepository};
use crate::domain::audit::ChangeLogSink;
use crate::domain::dates::{date_value, parse_date};
use crate::domain::project::{
    DepartmentSummary, Priority, ProjectSnapshot, ProjectStatus, StageStatus, StatusCounts,
    default_stages, group_by_department,
};
use crate::domain::schedule::calculate_phase_dates;
use crate::domain::session::{EditSession, Role, SaveBatch};
use crate::storage::Database;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

const PROJECT_COLUMNS: &str = "id, code, name, objectives, department, tech_department, status, project_owner, project_owner_email, business_owner, business_owner_email, start_date, end_date, priority, overall_project_summary, stages, created_at, updated_at";

/// A tracked project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier
    pub id: String,
    /// Sequential code such as `PRJ001`
    pub code: String,
    pub name: String,
    pub objectives: String,
    pub department: String,
    pub tech_department: String,
    pub status: ProjectStatus,
    pub project_owner: String,
    pub project_owner_email: String,
    pub business_owner: String,
    pub business_owner_email: String,
    /// Dates, priority, summary, and stages
    #[serde(flatten)]
    pub snapshot: ProjectSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Percentage of stage weight completed
    pub fn progress(&self) -> u32 {
        self.snapshot.progress()
    }

    /// "{completed}/{total} Completed"
    pub fn status_summary(&self) -> String {
        self.snapshot.status_summary()
    }

    /// Status derived from the stages
    pub fn overall_status(&self) -> StageStatus {
        self.snapshot.overall_status()
    }

    /// Whether the code or name contains `term`, ignoring case
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        self.code.to_lowercase().contains(&term) || self.name.to_lowercase().contains(&term)
    }
}

/// Criteria for listing projects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    /// Exact department, ignoring case
    pub department: Option<String>,
    /// Overall status derived from the stages
    pub status: Option<StageStatus>,
    /// Substring of the code or name
    pub search: Option<String>,
}

impl ProjectFilter {
    pub fn department(department: impl Into<String>) -> Self {
        Self {
            department: Some(department.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: StageStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    fn matches(&self, project: &Project) -> bool {
        let status_ok = self.status.is_none_or(|s| project.overall_status() == s);
        let search_ok = self
            .search
            .as_deref()
            .is_none_or(|term| project.matches_search(term));
        status_ok && search_ok
    }
}

/// Input for creating a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub objectives: String,
    pub department: String,
    pub tech_department: String,
    pub status: ProjectStatus,
    pub project_owner: String,
    pub project_owner_email: String,
    pub business_owner: String,
    pub business_owner_email: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub priority: Priority,
    pub overall_project_summary: String,
}

impl NewProject {
    /// Create input with the required fields
    pub fn new(
        name: impl Into<String>,
        department: impl Into<String>,
        tech_department: impl Into<String>,
        project_owner: impl Into<String>,
        business_owner: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
            tech_department: tech_department.into(),
            project_owner: project_owner.into(),
            business_owner: business_owner.into(),
            ..Default::default()
        }
    }

    /// Set the planned date range
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    fn validate(&self) -> Result<()> {
        ProjectValidator::validate_required("name", &self.name)?;
        ProjectValidator::validate_required("department", &self.department)?;
        ProjectValidator::validate_required("tech_department", &self.tech_department)?;
        ProjectValidator::validate_required("project_owner", &self.project_owner)?;
        ProjectValidator::validate_required("business_owner", &self.business_owner)?;
        ProjectValidator::validate_email("project_owner_email", &self.project_owner_email)?;
        ProjectValidator::validate_email("business_owner_email", &self.business_owner_email)?;
        ProjectValidator::validate_dates(self.start_date, self.end_date)?;
        Ok(())
    }

    fn into_project(self, code: String) -> Project {
        let stages = calculate_phase_dates(self.start_date, self.end_date, &default_stages());
        let now = Utc::now();

        Project {
            id: Uuid::new_v4().to_string(),
            code,
            name: self.name.trim().to_string(),
            objectives: self.objectives,
            department: self.department.trim().to_string(),
            tech_department: self.tech_department.trim().to_string(),
            status: self.status,
            project_owner: self.project_owner.trim().to_string(),
            project_owner_email: self.project_owner_email.trim().to_string(),
            business_owner: self.business_owner.trim().to_string(),
            business_owner_email: self.business_owner_email.trim().to_string(),
            snapshot: ProjectSnapshot {
                start_date: self.start_date,
                end_date: self.end_date,
                priority: self.priority,
                overall_project_summary: self.overall_project_summary,
                stages,
            },
            created_at: now,
            updated_at: now,
        }
    }
}

/// Project repository for database operations
pub struct ProjectRepository<'a> {
    db: &'a Database,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new project in the database
    pub async fn create(&self, project: &Project) -> Result<()> {
        let stages = serde_json::to_string(&project.snapshot.stages)?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, code, name, objectives, department, tech_department, status,
                project_owner, project_owner_email, business_owner, business_owner_email,
                start_date, end_date, priority, overall_project_summary, stages, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.code)
        .bind(&project.name)
        .bind(&project.objectives)
        .bind(&project.department)
        .bind(&project.tech_department)
        .bind(project.status.as_str())
        .bind(&project.project_owner)
        .bind(&project.project_owner_email)
        .bind(&project.business_owner)
        .bind(&project.business_owner_email)
        .bind(date_value(project.snapshot.start_date))
        .bind(date_value(project.snapshot.end_date))
        .bind(project.snapshot.priority.as_str())
        .bind(&project.snapshot.overall_project_summary)
        .bind(stages)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Get a project by ID
    pub async fn get(&self, id: &str) -> Result<Option<Project>> {
        let row = sqlx::query(&format!("SELECT {} FROM projects WHERE id = ?", PROJECT_COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(|r| self.row_to_project(r)).transpose()
    }

    /// Get a project by code, ignoring case
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE code = ? COLLATE NOCASE",
            PROJECT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(|r| self.row_to_project(r)).transpose()
    }

    /// List projects, newest first, with optional department filter
    pub async fn list(&self, department: Option<&str>) -> Result<Vec<Project>> {
        let rows = if let Some(department) = department {
            sqlx::query(&format!(
                "SELECT {} FROM projects WHERE department = ? COLLATE NOCASE ORDER BY created_at DESC, code DESC",
                PROJECT_COLUMNS
            ))
            .bind(department)
            .fetch_all(self.db.pool())
            .await?
        } else {
            sqlx::query(&format!(
                "SELECT {} FROM projects ORDER BY created_at DESC, code DESC",
                PROJECT_COLUMNS
            ))
            .fetch_all(self.db.pool())
            .await?
        };

        rows.into_iter().map(|r| self.row_to_project(r)).collect()
    }

    /// Highest code in use, by numeric order
    pub async fn highest_code(&self) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT code FROM projects ORDER BY LENGTH(code) DESC, code DESC LIMIT 1",
        )
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|(code,)| code))
    }

    /// Persist the editable fields of a project
    pub async fn update_snapshot(&self, id: &str, snapshot: &ProjectSnapshot) -> Result<()> {
        let stages = serde_json::to_string(&snapshot.stages)?;

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET start_date = ?, end_date = ?, priority = ?, overall_project_summary = ?, stages = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(date_value(snapshot.start_date))
        .bind(date_value(snapshot.end_date))
        .bind(snapshot.priority.as_str())
        .bind(&snapshot.overall_project_summary)
        .bind(stages)
        .bind(Utc::now())
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ProjectNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Permanently delete a project and its change log
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check if a project exists
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    /// Convert a database row to a Project
    fn row_to_project(&self, row: sqlx::sqlite::SqliteRow) -> Result<Project> {
        let stages: String = row.get("stages");
        let start_date: String = row.get("start_date");
        let end_date: String = row.get("end_date");
        let status: String = row.get("status");
        let priority: String = row.get("priority");

        Ok(Project {
            id: row.get("id"),
            code: row.get("code"),
            name: row.get("name"),
            objectives: row.get("objectives"),
            department: row.get("department"),
            tech_department: row.get("tech_department"),
            status: ProjectStatus::parse(&status).unwrap_or_default(),
            project_owner: row.get("project_owner"),
            project_owner_email: row.get("project_owner_email"),
            business_owner: row.get("business_owner"),
            business_owner_email: row.get("business_owner_email"),
            snapshot: ProjectSnapshot {
                start_date: parse_date(&start_date),
                end_date: parse_date(&end_date),
                priority: Priority::parse(&priority).unwrap_or_default(),
                overall_project_summary: row.get("overall_project_summary"),
                stages: serde_json::from_str(&stages)?,
            },
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

/// Create a project with the default stage template
pub async fn create_project(db: &Database, role: Role, input: NewProject) -> Result<Project> {
    ProjectValidator::ensure_can_modify(role, "project", "create")?;
    input.validate()?;

    let repo = ProjectRepository::new(db);
    let highest = repo.highest_code().await?;
    let project = input.into_project(ProjectValidator::next_code(highest.as_deref()));
    repo.create(&project).await?;

    tracing::info!(project_id = %project.id, code = %project.code, "Created project");
    Ok(project)
}

/// List projects matching `filter`, newest first
pub async fn list_projects(db: &Database, filter: &ProjectFilter) -> Result<Vec<Project>> {
    let projects = ProjectRepository::new(db)
        .list(filter.department.as_deref())
        .await?;

    Ok(projects.into_iter().filter(|p| filter.matches(p)).collect())
}

/// Project totals by overall status
pub async fn project_stats(db: &Database) -> Result<StatusCounts> {
    let projects = ProjectRepository::new(db).list(None).await?;
    Ok(StatusCounts::tally(projects.iter().map(|p| &p.snapshot)))
}

/// Project counts per department and owner
pub async fn department_summary(db: &Database) -> Result<Vec<DepartmentSummary>> {
    let projects = ProjectRepository::new(db).list(None).await?;
    Ok(group_by_department(
        projects
            .iter()
            .map(|p| (p.department.as_str(), p.project_owner.as_str())),
    ))
}

/// Get a project by ID or code
pub async fn get_project(db: &Database, key: &str) -> Result<Project> {
    let repo = ProjectRepository::new(db);

    if let Some(project) = repo.get(key).await? {
        return Ok(project);
    }
    repo.get_by_code(key)
        .await?
        .ok_or_else(|| Error::ProjectNotFound(key.to_string()))
}

/// Delete a project and its change log
pub async fn delete_project(db: &Database, role: Role, key: &str) -> Result<Project> {
    ProjectValidator::ensure_can_modify(role, "project", "delete")?;

    let project = get_project(db, key).await?;
    ProjectRepository::new(db).delete(&project.id).await?;

    tracing::info!(project_id = %project.id, code = %project.code, "Deleted project");
    Ok(project)
}

/// Load a project and open an edit session on it
pub async fn open_session(
    db: &Database,
    key: &str,
    role: Role,
    max_total_weight: f64,
) -> Result<(Project, EditSession)> {
    let project = get_project(db, key).await?;
    let session =
        EditSession::open(project.snapshot.clone(), role).with_max_total_weight(max_total_weight);
    Ok((project, session))
}

/// Commit a session, persist its snapshot, and append its change log
pub async fn save_session(
    db: &Database,
    project_id: &str,
    session: &mut EditSession,
    actor: &str,
) -> Result<SaveBatch> {
    let sink = ProjectLogRepository::new(db);
    save_session_with(db, &sink, project_id, session, actor).await
}

/// Same as `save_session` with an explicit log sink.
///
/// The session is only re-baselined once the snapshot and the log batch
/// are both stored.
pub async fn save_session_with(
    db: &Database,
    sink: &dyn ChangeLogSink,
    project_id: &str,
    session: &mut EditSession,
    actor: &str,
) -> Result<SaveBatch> {
    let repo = ProjectRepository::new(db);
    if !repo.exists(project_id).await? {
        return Err(Error::ProjectNotFound(project_id.to_string()));
    }

    let actor = match actor.trim() {
        "" => DEFAULT_ACTOR,
        actor => actor,
    };

    let mut staged = session.clone();
    let batch = staged.commit()?;

    repo.update_snapshot(project_id, &batch.snapshot).await?;
    sink.append(project_id, actor, &batch.changes).await?;
    *session = staged;

    tracing::info!(
        project_id = %project_id,
        actor = %actor,
        change_count = batch.changes.len(),
        "Saved project"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::log::list_logs;
    use crate::domain::project::StageStatus;
    use crate::domain::session::StageEdit;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn portal() -> NewProject {
        NewProject::new("Customer Portal", "Operations", "IT", "Ann", "Bo")
    }

    #[tokio::test]
    async fn test_create_project_assigns_sequential_codes() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");

        let first = create_project(&db, Role::Admin, portal()).await.unwrap();
        let second = create_project(&db, Role::Admin, portal()).await.unwrap();

        assert_eq!(first.code, "PRJ001");
        assert_eq!(second.code, "PRJ002");
        assert_eq!(first.status, ProjectStatus::WorkInProgress);
        assert_eq!(first.snapshot.stages.len(), 7);
        assert_eq!(first.progress(), 0);
        assert_eq!(first.status_summary(), "0/7 Completed");
    }

    #[tokio::test]
    async fn test_create_project_schedules_default_stages() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");

        let input = portal().with_dates(date(2025, 1, 1), date(2025, 4, 10));
        let project = create_project(&db, Role::Admin, input).await.unwrap();

        let stages = &project.snapshot.stages;
        assert_eq!(stages[0].start_date, date(2025, 1, 1));
        assert_eq!(stages.last().unwrap().end_date, date(2025, 4, 10));
    }

    #[tokio::test]
    async fn test_create_project_validation() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");

        let mut input = portal();
        input.department = " ".to_string();
        assert!(matches!(
            create_project(&db, Role::Admin, input).await,
            Err(Error::InvalidInput(_))
        ));

        let input = portal().with_dates(date(2025, 2, 1), date(2025, 1, 1));
        assert!(create_project(&db, Role::Admin, input).await.is_err());

        assert!(create_project(&db, Role::Hod, portal()).await.is_err());
        assert!(
            list_projects(&db, &ProjectFilter::default())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_get_project_by_id_or_code() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");
        let created = create_project(&db, Role::Admin, portal()).await.unwrap();

        let by_id = get_project(&db, &created.id).await.unwrap();
        let by_code = get_project(&db, "prj001").await.unwrap();
        assert_eq!(by_id, by_code);
        assert_eq!(by_id.snapshot, created.snapshot);

        assert!(matches!(
            get_project(&db, "PRJ404").await,
            Err(Error::ProjectNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_projects_department_filter() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");

        create_project(&db, Role::Admin, portal()).await.unwrap();
        let mut finance = portal();
        finance.department = "Finance".to_string();
        create_project(&db, Role::Admin, finance).await.unwrap();

        let all = list_projects(&db, &ProjectFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        let filtered = list_projects(&db, &ProjectFilter::department("finance"))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].department, "Finance");
    }

    #[tokio::test]
    async fn test_save_session_persists_snapshot_and_logs() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");
        let project = create_project(&db, Role::Admin, portal()).await.unwrap();

        let (_, mut session) = open_session(&db, &project.code, Role::Admin, 100.0)
            .await
            .unwrap();
        session
            .edit_stage(0, StageEdit::Status(StageStatus::Completed))
            .unwrap();
        session
            .edit_stage(0, StageEdit::Owner("Priya".to_string()))
            .unwrap();

        let batch = save_session(&db, &project.id, &mut session, "alice")
            .await
            .unwrap();
        assert_eq!(batch.changes.len(), 2);
        assert!(!session.is_dirty());
        assert!(session.pending().is_empty());

        let stored = get_project(&db, &project.id).await.unwrap();
        assert_eq!(stored.snapshot.stages[0].stage_owner, "Priya");
        assert_eq!(stored.progress(), 10);

        let logs = list_logs(&db, &project.id, 1000).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|l| l.changed_by == "alice" && l.stage_name == "Concept"));
    }

    #[tokio::test]
    async fn test_save_session_defaults_actor() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");
        let project = create_project(&db, Role::Admin, portal()).await.unwrap();

        let (_, mut session) = open_session(&db, &project.id, Role::Admin, 100.0)
            .await
            .unwrap();
        session
            .edit_stage(1, StageEdit::Remarks("Waiting on board".to_string()))
            .unwrap();
        save_session(&db, &project.id, &mut session, "  ").await.unwrap();

        let logs = list_logs(&db, &project.id, 10).await.unwrap();
        assert_eq!(logs[0].changed_by, "System");
        assert_eq!(logs[0].old_value, "(empty)");
    }

    #[tokio::test]
    async fn test_save_session_read_only_keeps_session() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");
        let project = create_project(&db, Role::Admin, portal()).await.unwrap();

        let (_, mut session) = open_session(&db, &project.id, Role::Hod, 100.0)
            .await
            .unwrap();
        let result = save_session(&db, &project.id, &mut session, "hod-user").await;
        assert!(matches!(result, Err(Error::ReadOnlyRole(_))));
        assert!(list_logs(&db, &project.id, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_session_unknown_project() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");
        let mut session = EditSession::open(ProjectSnapshot::default(), Role::Admin);

        let result = save_session(&db, "missing", &mut session, "alice").await;
        assert!(matches!(result, Err(Error::ProjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_project_cascades_logs() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");
        let project = create_project(&db, Role::Admin, portal()).await.unwrap();

        let (_, mut session) = open_session(&db, &project.id, Role::Admin, 100.0)
            .await
            .unwrap();
        session
            .edit_stage(0, StageEdit::Owner("Priya".to_string()))
            .unwrap();
        save_session(&db, &project.id, &mut session, "alice").await.unwrap();

        assert!(delete_project(&db, Role::Hod, &project.code).await.is_err());

        let deleted = delete_project(&db, Role::Admin, &project.code).await.unwrap();
        assert_eq!(deleted.id, project.id);
        assert!(list_logs(&db, &project.id, 10).await.unwrap().is_empty());
        assert!(get_project(&db, &project.id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_projects_status_and_search_filters() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");

        let portal = create_project(&db, Role::Admin, portal()).await.unwrap();
        let mut billing = NewProject::new("Billing Revamp", "Finance", "IT", "Cy", "Bo");
        billing.objectives = "Faster invoicing".to_string();
        create_project(&db, Role::Admin, billing).await.unwrap();

        let (_, mut session) = open_session(&db, &portal.id, Role::Admin, 100.0)
            .await
            .unwrap();
        session
            .edit_stage(2, StageEdit::Status(StageStatus::Delayed))
            .unwrap();
        save_session(&db, &portal.id, &mut session, "alice").await.unwrap();

        let delayed = ProjectFilter::default().with_status(StageStatus::Delayed);
        let found = list_projects(&db, &delayed).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "PRJ001");

        let search = ProjectFilter::default().with_search("REVAMP");
        let found = list_projects(&db, &search).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Billing Revamp");

        let by_code = ProjectFilter::default().with_search("prj00");
        assert_eq!(list_projects(&db, &by_code).await.unwrap().len(), 2);

        let none = ProjectFilter::department("Finance").with_status(StageStatus::Delayed);
        assert!(list_projects(&db, &none).await.unwrap().is_empty());

        let stats = project_stats(&db).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.delayed, 1);
        assert_eq!(stats.completed, 0);
    }

    #[tokio::test]
    async fn test_department_summary_counts_owners() {
        let db = Database::in_memory()
            .await
            .expect("Failed to create database");

        create_project(&db, Role::Admin, portal()).await.unwrap();
        create_project(&db, Role::Admin, portal()).await.unwrap();
        create_project(&db, Role::Admin, NewProject::new("Ledger", "Finance", "IT", "Zed", "Bo"))
            .await
            .unwrap();

        let summary = department_summary(&db).await.unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].department, "Finance");
        assert_eq!(summary[0].total(), 1);
        assert_eq!(summary[1].department, "Operations");
        assert_eq!(summary[1].owners[0].owner, "Ann");
        assert_eq!(summary[1].owners[0].count, 2);
    }
}
