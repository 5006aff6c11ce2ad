//! Stagetrack Core Integration Tests

use chrono::NaiveDate;
use stagetrack_core::{
    Error,
    commands::{self, NewProject},
    domain::{
        MilestoneEdit, ProjectEdit, Role, StageEdit, StageStatus,
        audit::{ChangeLogSink, ChangeRecord},
    },
    storage::{Database, DatabaseConfig},
};
use std::sync::Mutex;

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

async fn file_database(dir: &tempfile::TempDir) -> Database {
    Database::new(DatabaseConfig::with_path(dir.path().join("stagetrack.db")))
        .await
        .expect("Failed to open database")
}

#[tokio::test]
async fn test_plan_edit_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_database(&dir).await;

    let project = commands::create_project(
        &db,
        Role::Admin,
        NewProject::new("Data Platform", "Finance", "IT", "Ann", "Bo"),
    )
    .await
    .unwrap();

    let (_, mut session) = commands::open_session(&db, &project.code, Role::Admin, 100.0)
        .await
        .unwrap();
    session
        .edit_project(ProjectEdit::StartDate(date(2025, 1, 1)))
        .unwrap();
    session
        .edit_project(ProjectEdit::EndDate(date(2025, 4, 10)))
        .unwrap();
    assert!(session.auto_calculate_dates().unwrap());

    let batch = commands::save_session(&db, &project.id, &mut session, "pmo")
        .await
        .unwrap();
    let fields: Vec<_> = batch.changes.iter().map(|c| c.field_name.as_str()).collect();
    assert!(fields.contains(&"Planned Start Date"));
    assert!(fields.contains(&"Planned End Date"));
    assert!(
        batch
            .changes
            .iter()
            .any(|c| c.stage_name == "Concept" && c.previous_value == "(empty)")
    );
    db.close().await;

    // Everything survives a reopen
    let db = file_database(&dir).await;
    let stored = commands::get_project(&db, &project.id).await.unwrap();
    assert_eq!(stored.snapshot.start_date, date(2025, 1, 1));
    assert_eq!(stored.snapshot.stages[0].start_date, date(2025, 1, 1));
    assert_eq!(
        stored.snapshot.stages.last().unwrap().end_date,
        date(2025, 4, 10)
    );

    let logs = commands::list_logs(&db, &project.id, 1000).await.unwrap();
    assert_eq!(logs.len(), batch.changes.len());
    assert!(logs.iter().all(|l| l.changed_by == "pmo"));
}

#[tokio::test]
async fn test_reverted_edit_is_not_logged() {
    let db = Database::in_memory().await.unwrap();
    let project = commands::create_project(
        &db,
        Role::Admin,
        NewProject::new("Portal", "Ops", "IT", "Ann", "Bo"),
    )
    .await
    .unwrap();

    let (_, mut session) = commands::open_session(&db, &project.id, Role::Admin, 100.0)
        .await
        .unwrap();
    session
        .edit_stage(2, StageEdit::Owner("Bob".to_string()))
        .unwrap();
    session
        .edit_stage(2, StageEdit::Owner(String::new()))
        .unwrap();
    session
        .edit_stage(3, StageEdit::Status(StageStatus::Delayed))
        .unwrap();

    let batch = commands::save_session(&db, &project.id, &mut session, "alice")
        .await
        .unwrap();
    assert_eq!(batch.changes.len(), 1);
    assert_eq!(batch.changes[0].field_name, "Status");
    assert_eq!(batch.changes[0].stage_name, "Vendor onboarding");
    assert_eq!(batch.changes[0].previous_value, "Yet to Start");
    assert_eq!(batch.changes[0].new_value, "Delayed");
}

#[tokio::test]
async fn test_milestone_lifecycle_across_saves() {
    let db = Database::in_memory().await.unwrap();
    let project = commands::create_project(
        &db,
        Role::Admin,
        NewProject::new("Portal", "Ops", "IT", "Ann", "Bo"),
    )
    .await
    .unwrap();

    // First save: adding a milestone logs nothing by itself
    let (_, mut session) = commands::open_session(&db, &project.id, Role::Admin, 100.0)
        .await
        .unwrap();
    let id = session.add_milestone(4, "Milestone 2").unwrap();
    let batch = commands::save_session(&db, &project.id, &mut session, "alice")
        .await
        .unwrap();
    assert!(batch.changes.is_empty());

    // Second save: edit, then delete in a fresh session
    let (_, mut session) = commands::open_session(&db, &project.id, Role::Admin, 100.0)
        .await
        .unwrap();
    session
        .edit_milestone(4, id, MilestoneEdit::Owner("Dana".to_string()))
        .unwrap();
    session.delete_milestone(4, id).unwrap();

    let batch = commands::save_session(&db, &project.id, &mut session, "alice")
        .await
        .unwrap();
    assert_eq!(
        batch.changes,
        vec![ChangeRecord::milestone_deleted("Execution & Delivery", "Milestone 2")]
    );

    let logs = commands::list_logs(&db, &project.id, 10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].field_changed, "Milestone Deleted");
    assert_eq!(logs[0].stage_name, "Execution & Delivery - Milestone 2");
    assert_eq!(logs[0].new_value, "(deleted)");
}

#[tokio::test]
async fn test_weight_limit_uses_configured_maximum() {
    let db = Database::in_memory().await.unwrap();
    let project = commands::create_project(
        &db,
        Role::Admin,
        NewProject::new("Portal", "Ops", "IT", "Ann", "Bo"),
    )
    .await
    .unwrap();

    let (_, mut session) = commands::open_session(&db, &project.id, Role::Admin, 100.0)
        .await
        .unwrap();
    assert!(matches!(
        session.set_stage_weight(0, 20.0),
        Err(Error::WeightLimitExceeded(..))
    ));

    let (_, mut session) = commands::open_session(&db, &project.id, Role::Admin, 120.0)
        .await
        .unwrap();
    session.set_stage_weight(0, 20.0).unwrap();
    let batch = commands::save_session(&db, &project.id, &mut session, "alice")
        .await
        .unwrap();
    assert_eq!(batch.changes.len(), 1);
    assert_eq!(batch.changes[0].field_name, "Weight");
    assert_eq!(batch.changes[0].previous_value, "10%");
    assert_eq!(batch.changes[0].new_value, "20%");
}

/// Sink that keeps batches in memory
#[derive(Default)]
struct RecordingSink {
    batches: Mutex<Vec<(String, String, Vec<ChangeRecord>)>>,
}

#[async_trait::async_trait]
impl ChangeLogSink for RecordingSink {
    async fn append(
        &self,
        project_id: &str,
        actor: &str,
        changes: &[ChangeRecord],
    ) -> stagetrack_core::Result<usize> {
        self.batches.lock().unwrap().push((
            project_id.to_string(),
            actor.to_string(),
            changes.to_vec(),
        ));
        Ok(changes.len())
    }
}

#[tokio::test]
async fn test_save_session_with_custom_sink() {
    let db = Database::in_memory().await.unwrap();
    let project = commands::create_project(
        &db,
        Role::Admin,
        NewProject::new("Portal", "Ops", "IT", "Ann", "Bo"),
    )
    .await
    .unwrap();

    let (_, mut session) = commands::open_session(&db, &project.id, Role::Admin, 100.0)
        .await
        .unwrap();
    session
        .edit_project(ProjectEdit::Summary("On track".to_string()))
        .unwrap();

    let sink = RecordingSink::default();
    commands::save_session_with(&db, &sink, &project.id, &mut session, "ops")
        .await
        .unwrap();

    let batches = sink.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].1, "ops");
    assert_eq!(batches[0].2[0].field_name, "Overall Project Summary");
    assert_eq!(batches[0].2[0].stage_name, "N/A");

    // Nothing reached the SQLite log
    drop(batches);
    assert!(
        commands::list_logs(&db, &project.id, 10)
            .await
            .unwrap()
            .is_empty()
    );
}
