//! Domain layer
//!
//! Pure data and algorithms: the project model, phase date allocation, the
//! audit trail builder, and edit sessions. Nothing here touches storage.

pub mod audit;
pub mod dates;
pub mod project;
pub mod schedule;
pub mod session;

pub use project::{
    DepartmentSummary, Milestone, OwnerCount, Priority, ProjectSnapshot, ProjectStatus, Stage,
    StageStatus, StatusCounts, group_by_department,
};
pub use session::{EditSession, MilestoneEdit, ProjectEdit, Role, SaveBatch, StageEdit};
