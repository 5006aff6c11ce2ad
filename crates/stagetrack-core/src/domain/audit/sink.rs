//! Destination for finished change batches
//!
//! The session produces `ChangeRecord`s; a sink stamps them with the actor
//! and time and stores them. The core hands each batch over once and does
//! not retry.

use async_trait::async_trait;

use crate::domain::audit::record::ChangeRecord;
use crate::error::Result;

/// Append-only store for change records
#[async_trait]
pub trait ChangeLogSink: Send + Sync {
    /// Append a batch for a project, returning how many entries were stored.
    ///
    /// An empty batch stores nothing.
    async fn append(&self, project_id: &str, actor: &str, changes: &[ChangeRecord])
    -> Result<usize>;
}
