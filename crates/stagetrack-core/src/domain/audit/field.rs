//! Tracked field kinds and change locations

use std::fmt;

use crate::domain::dates::date_value;
use crate::domain::project::{Milestone, ProjectSnapshot, Stage};

/// Location tag for project-level changes
pub const PROJECT_LOCATION: &str = "N/A";

/// Project-level editable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectField {
    StartDate,
    EndDate,
    OverallProjectSummary,
    Priority,
}

impl ProjectField {
    /// Fields compared when diffing snapshots, in emission order
    pub const DIFFED: [ProjectField; 4] = [
        ProjectField::StartDate,
        ProjectField::EndDate,
        ProjectField::OverallProjectSummary,
        ProjectField::Priority,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectField::StartDate => "Planned Start Date",
            ProjectField::EndDate => "Planned End Date",
            ProjectField::OverallProjectSummary => "Overall Project Summary",
            ProjectField::Priority => "Priority",
        }
    }

    /// Raw value from a snapshot
    pub fn value(&self, snapshot: &ProjectSnapshot) -> String {
        match self {
            ProjectField::StartDate => date_value(snapshot.start_date),
            ProjectField::EndDate => date_value(snapshot.end_date),
            ProjectField::OverallProjectSummary => snapshot.overall_project_summary.clone(),
            ProjectField::Priority => snapshot.priority.as_str().to_string(),
        }
    }
}

/// Per-stage editable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageField {
    Status,
    StageOwner,
    ActualStartDate,
    ActualEndDate,
    Remarks,
    PlannedStartDate,
    PlannedEndDate,
    Weight,
}

impl StageField {
    /// Fields compared when diffing snapshots. Weight and planned dates are
    /// only tracked incrementally.
    pub const DIFFED: [StageField; 5] = [
        StageField::Status,
        StageField::StageOwner,
        StageField::ActualStartDate,
        StageField::ActualEndDate,
        StageField::Remarks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StageField::Status => "Status",
            StageField::StageOwner => "Stage Owner",
            StageField::ActualStartDate => "Actual Start Date",
            StageField::ActualEndDate => "Actual End Date",
            StageField::Remarks => "Remarks",
            StageField::PlannedStartDate => "Planned Start Date",
            StageField::PlannedEndDate => "Planned End Date",
            StageField::Weight => "Weight",
        }
    }

    /// Raw value from a stage
    pub fn value(&self, stage: &Stage) -> String {
        match self {
            StageField::Status => stage.status.as_str().to_string(),
            StageField::StageOwner => stage.stage_owner.clone(),
            StageField::ActualStartDate => date_value(stage.actual_start_date),
            StageField::ActualEndDate => date_value(stage.actual_end_date),
            StageField::Remarks => stage.remarks.clone(),
            StageField::PlannedStartDate => date_value(stage.start_date),
            StageField::PlannedEndDate => date_value(stage.end_date),
            StageField::Weight => format_weight(stage.weight),
        }
    }
}

/// Per-milestone editable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MilestoneField {
    StageName,
    Owner,
    Remarks,
}

impl MilestoneField {
    pub const DIFFED: [MilestoneField; 3] = [
        MilestoneField::StageName,
        MilestoneField::Owner,
        MilestoneField::Remarks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MilestoneField::StageName => "Milestone Stage Name",
            MilestoneField::Owner => "Milestone Owner",
            MilestoneField::Remarks => "Milestone Remarks",
        }
    }

    pub fn value(&self, milestone: &Milestone) -> String {
        match self {
            MilestoneField::StageName => milestone.stage_name.clone(),
            MilestoneField::Owner => milestone.owner.clone(),
            MilestoneField::Remarks => milestone.remarks.clone(),
        }
    }
}

/// Every kind of change the audit trail records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    Project(ProjectField),
    Stage(StageField),
    Milestone(MilestoneField),
    MilestoneDeleted,
}

impl TrackedField {
    pub fn label(&self) -> &'static str {
        match self {
            TrackedField::Project(field) => field.label(),
            TrackedField::Stage(field) => field.label(),
            TrackedField::Milestone(field) => field.label(),
            TrackedField::MilestoneDeleted => "Milestone Deleted",
        }
    }

    /// Recover a field from its label and location.
    ///
    /// "Planned Start Date" and "Planned End Date" are shared between project
    /// and stage level; the location decides which one is meant.
    pub fn from_label(label: &str, location: &str) -> Option<Self> {
        if location == PROJECT_LOCATION {
            return ProjectField::DIFFED
                .into_iter()
                .find(|f| f.label() == label)
                .map(TrackedField::Project);
        }

        if label == TrackedField::MilestoneDeleted.label() {
            return Some(TrackedField::MilestoneDeleted);
        }

        const STAGE_FIELDS: [StageField; 8] = [
            StageField::Status,
            StageField::StageOwner,
            StageField::ActualStartDate,
            StageField::ActualEndDate,
            StageField::Remarks,
            StageField::PlannedStartDate,
            StageField::PlannedEndDate,
            StageField::Weight,
        ];

        STAGE_FIELDS
            .into_iter()
            .find(|f| f.label() == label)
            .map(TrackedField::Stage)
            .or_else(|| {
                MilestoneField::DIFFED
                    .into_iter()
                    .find(|f| f.label() == label)
                    .map(TrackedField::Milestone)
            })
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a change happened
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeLocation {
    Project,
    Stage(String),
    Milestone { stage: String, title: String },
}

impl ChangeLocation {
    pub fn milestone(stage: impl Into<String>, title: impl Into<String>) -> Self {
        Self::Milestone {
            stage: stage.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for ChangeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeLocation::Project => f.write_str(PROJECT_LOCATION),
            ChangeLocation::Stage(name) => f.write_str(name),
            ChangeLocation::Milestone { stage, title } => write!(f, "{} - {}", stage, title),
        }
    }
}

/// Format a weight as a percentage ("50%", "12.5%")
pub fn format_weight(weight: f64) -> String {
    format!("{}%", weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(ChangeLocation::Project.to_string(), "N/A");
        assert_eq!(ChangeLocation::Stage("UAT".into()).to_string(), "UAT");
        assert_eq!(
            ChangeLocation::milestone("Build", "Milestone 2").to_string(),
            "Build - Milestone 2"
        );
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(50.0), "50%");
        assert_eq!(format_weight(12.5), "12.5%");
        assert_eq!(format_weight(0.0), "0%");
    }

    #[test]
    fn test_from_label_uses_location_for_shared_labels() {
        assert_eq!(
            TrackedField::from_label("Planned Start Date", "N/A"),
            Some(TrackedField::Project(ProjectField::StartDate))
        );
        assert_eq!(
            TrackedField::from_label("Planned Start Date", "Concept"),
            Some(TrackedField::Stage(StageField::PlannedStartDate))
        );
        assert_eq!(
            TrackedField::from_label("Milestone Owner", "Build - Alpha"),
            Some(TrackedField::Milestone(MilestoneField::Owner))
        );
        assert_eq!(
            TrackedField::from_label("Milestone Deleted", "Build - Alpha"),
            Some(TrackedField::MilestoneDeleted)
        );
        assert_eq!(TrackedField::from_label("Status", "N/A"), None);
        assert_eq!(TrackedField::from_label("Colour", "Build"), None);
    }

    #[test]
    fn test_labels_round_trip() {
        for field in StageField::DIFFED {
            let tracked = TrackedField::Stage(field);
            assert_eq!(TrackedField::from_label(tracked.label(), "Stage"), Some(tracked));
        }
        for field in ProjectField::DIFFED {
            let tracked = TrackedField::Project(field);
            assert_eq!(TrackedField::from_label(tracked.label(), "N/A"), Some(tracked));
        }
    }
}
