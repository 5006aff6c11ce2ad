//! Field-level change records

use serde::{Deserialize, Serialize};

use crate::domain::audit::field::{ChangeLocation, TrackedField};

/// Placeholder shown for empty values
pub const EMPTY_VALUE: &str = "(empty)";

/// New value recorded for a deleted milestone
pub const DELETED_VALUE: &str = "(deleted)";

/// Display form of a raw value
pub fn display_value(raw: &str) -> String {
    if raw.is_empty() {
        EMPTY_VALUE.to_string()
    } else {
        raw.to_string()
    }
}

/// A single field change, ready to be stamped and stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Human-readable field label
    pub field_name: String,
    pub previous_value: String,
    pub new_value: String,
    /// "N/A", a stage name, or "{stage} - {milestone}"
    pub stage_name: String,
}

impl ChangeRecord {
    /// Build a record from raw values, normalizing empties for display
    pub fn new(
        field: TrackedField,
        location: &ChangeLocation,
        previous: &str,
        new: &str,
    ) -> Self {
        Self {
            field_name: field.label().to_string(),
            previous_value: display_value(previous),
            new_value: display_value(new),
            stage_name: location.to_string(),
        }
    }

    /// Record for a milestone removed from its stage
    pub fn milestone_deleted(stage: &str, title: &str) -> Self {
        Self {
            field_name: TrackedField::MilestoneDeleted.label().to_string(),
            previous_value: display_value(title),
            new_value: DELETED_VALUE.to_string(),
            stage_name: ChangeLocation::milestone(stage, title).to_string(),
        }
    }

    /// Whether this record targets the given field and location
    pub fn targets(&self, field: TrackedField, location: &ChangeLocation) -> bool {
        self.field_name == field.label() && self.stage_name == location.to_string()
    }

    /// Deduplication key
    pub fn key(&self) -> (&str, &str, &str, &str) {
        (
            self.field_name.as_str(),
            self.stage_name.as_str(),
            self.previous_value.as_str(),
            self.new_value.as_str(),
        )
    }
}
