//! Commands module - all operations as library functions
//!
//! These commands are used by the CLI and by integration tests.

pub mod log;
pub mod project;

pub use log::{DEFAULT_ACTOR, DEFAULT_LOG_LIMIT, ProjectLog, ProjectLogRepository, list_logs};
pub use project::{
    NewProject, Project, ProjectFilter, ProjectRepository, create_project, delete_project,
    department_summary, get_project, list_projects, open_session, project_stats, save_session,
    save_session_with,
};
