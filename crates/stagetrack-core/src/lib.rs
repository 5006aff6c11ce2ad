//! Stagetrack Core Library
//!
//! This crate provides the core functionality for Stagetrack, including:
//! - Phase date allocation across weighted project stages
//! - Field-level change tracking and audit log building
//! - Edit sessions with role checks and weight limits
//! - Storage (SQLite) for projects and their change log
//! - Commands shared by the CLI and tests

pub mod application;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commands::{NewProject, Project, ProjectLog};
    pub use crate::config::Config;
    pub use crate::domain::audit::{ChangeLogSink, ChangeRecord};
    pub use crate::domain::{
        EditSession, Milestone, MilestoneEdit, Priority, ProjectEdit, ProjectSnapshot,
        ProjectStatus, Role, SaveBatch, Stage, StageEdit, StageStatus,
    };
    pub use crate::error::{Error, Result};
    pub use crate::storage::Database;
}
