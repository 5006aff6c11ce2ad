//! Audit trail: tracked fields, change records, and snapshot reconciliation
//!
//! # Architecture
//!
//! - `field`: the enumerated field kinds and where a change happened
//! - `record`: the `ChangeRecord` handed to the log store
//! - `builder`: merges pending records with a snapshot diff
//! - `sink`: where committed batches are sent

pub mod builder;
pub mod field;
pub mod record;
pub mod sink;

pub use builder::{diff, diff_snapshots};
pub use field::{
    ChangeLocation, MilestoneField, ProjectField, StageField, TrackedField, PROJECT_LOCATION,
    format_weight,
};
pub use record::{ChangeRecord, DELETED_VALUE, EMPTY_VALUE};
pub use sink::ChangeLogSink;
