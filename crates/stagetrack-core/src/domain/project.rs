//! Project snapshot, stage, and milestone entities
//!
//! These are the plain data values the scheduler and the audit builder work
//! on. Field names serialize in camelCase to match the stored documents.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::dates::optional_date;

/// Serialize a label enum through `as_str` and deserialize leniently through
/// `parse`, falling back to the default variant for unknown labels.
macro_rules! label_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = Option::<String>::deserialize(deserializer)?;
                Ok(raw
                    .as_deref()
                    .and_then(<$ty>::parse)
                    .unwrap_or_default())
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Stage status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StageStatus {
    #[default]
    YetToStart,
    InProgress,
    Completed,
    Delayed,
}

impl StageStatus {
    /// All statuses in display order
    pub const ALL: [StageStatus; 4] = [
        StageStatus::YetToStart,
        StageStatus::InProgress,
        StageStatus::Completed,
        StageStatus::Delayed,
    ];

    /// Display label, also used for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::YetToStart => "Yet to Start",
            StageStatus::InProgress => "In Progress",
            StageStatus::Completed => "Completed",
            StageStatus::Delayed => "Delayed",
        }
    }

    /// Parse from a display label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
    }
}

label_serde!(StageStatus);

/// Project priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    P1,
    P2,
    #[default]
    P3,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P1" => Some(Priority::P1),
            "P2" => Some(Priority::P2),
            "P3" => Some(Priority::P3),
            _ => None,
        }
    }
}

label_serde!(Priority);

/// Overall project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProjectStatus {
    #[default]
    WorkInProgress,
    Completed,
    OnHold,
    Delay,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::WorkInProgress => "Work in Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
            ProjectStatus::Delay => "Delay",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [
            ProjectStatus::WorkInProgress,
            ProjectStatus::Completed,
            ProjectStatus::OnHold,
            ProjectStatus::Delay,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

label_serde!(ProjectStatus);

/// A milestone inside a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Identifier, unique within the parent stage
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// Free-text sub-label. Not the parent stage's name.
    #[serde(default)]
    pub stage_name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub remarks: String,
}

impl Milestone {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            stage_name: String::new(),
            owner: String::new(),
            remarks: String::new(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_stage_name(mut self, stage_name: impl Into<String>) -> Self {
        self.stage_name = stage_name.into();
        self
    }
}

/// A weighted project stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Stage name, also its identity when diffing
    pub name: String,
    #[serde(default)]
    pub stage_owner: String,
    /// Share of the project, in percent
    #[serde(default)]
    pub weight: f64,
    #[serde(default, with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub actual_start_date: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub actual_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub status: StageStatus,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Stage {
    /// Create a stage with no dates, owner, or milestones
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            stage_owner: String::new(),
            weight,
            start_date: None,
            end_date: None,
            actual_start_date: None,
            actual_end_date: None,
            remarks: String::new(),
            status: StageStatus::YetToStart,
            milestones: Vec::new(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.stage_owner = owner.into();
        self
    }

    pub fn with_status(mut self, status: StageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.milestones.push(milestone);
        self
    }

    /// Weight usable in arithmetic; non-finite or negative weights count as zero
    pub fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            0.0
        }
    }

    /// Look up a milestone by id
    pub fn milestone(&self, id: i64) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// Next free milestone id in this stage
    pub fn next_milestone_id(&self) -> i64 {
        self.milestones.iter().map(|m| m.id).max().unwrap_or(0) + 1
    }
}

/// Default stage template for new projects: (name, weight)
pub const DEFAULT_STAGES: &[(&str, f64)] = &[
    ("Concept", 10.0),
    ("Business case approval", 5.0),
    ("IT Infra and security", 15.0),
    ("Vendor onboarding", 5.0),
    ("Execution & Delivery", 55.0),
    ("UAT", 5.0),
    ("Go-Live and support", 5.0),
];

/// Build the default stage list
pub fn default_stages() -> Vec<Stage> {
    DEFAULT_STAGES
        .iter()
        .map(|(name, weight)| Stage::new(*name, *weight))
        .collect()
}

/// The editable fields of a project
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default, with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub overall_project_summary: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl ProjectSnapshot {
    /// Snapshot with the given stages and no dates
    pub fn with_stages(stages: Vec<Stage>) -> Self {
        Self {
            stages,
            ..Default::default()
        }
    }

    /// Set the overall date range
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// First stage with the given name.
    ///
    /// Stage names are not guaranteed unique; later duplicates are never
    /// matched.
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Index of the first stage with the given name, ignoring ASCII case
    pub fn stage_position(&self, name: &str) -> Option<usize> {
        self.stages
            .iter()
            .position(|s| s.name == name)
            .or_else(|| self.stages.iter().position(|s| s.name.eq_ignore_ascii_case(name)))
    }

    /// Sum of effective stage weights
    pub fn total_weight(&self) -> f64 {
        self.stages.iter().map(Stage::effective_weight).sum()
    }

    /// Percentage of weight carried by completed stages, rounded
    pub fn progress(&self) -> u32 {
        let total = self.total_weight();
        if total <= 0.0 {
            return 0;
        }

        let completed: f64 = self
            .stages
            .iter()
            .filter(|s| s.status == StageStatus::Completed)
            .map(Stage::effective_weight)
            .sum();

        (completed / total * 100.0).round() as u32
    }

    /// "{completed}/{total} Completed"
    pub fn status_summary(&self) -> String {
        let completed = self
            .stages
            .iter()
            .filter(|s| s.status == StageStatus::Completed)
            .count();
        format!("{}/{} Completed", completed, self.stages.len())
    }

    /// Status of the project as a whole, derived from its stages.
    ///
    /// Any delayed stage wins, then any stage in progress. A project whose
    /// stages are all completed (including one with no stages) is completed.
    pub fn overall_status(&self) -> StageStatus {
        let has = |status: StageStatus| self.stages.iter().any(|s| s.status == status);

        if has(StageStatus::Delayed) {
            StageStatus::Delayed
        } else if has(StageStatus::InProgress) {
            StageStatus::InProgress
        } else if self.stages.iter().all(|s| s.status == StageStatus::Completed) {
            StageStatus::Completed
        } else {
            StageStatus::YetToStart
        }
    }
}

/// Project totals by overall status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub delayed: usize,
}

impl StatusCounts {
    /// Tally the overall status of each snapshot
    pub fn tally<'a>(snapshots: impl IntoIterator<Item = &'a ProjectSnapshot>) -> Self {
        snapshots
            .into_iter()
            .fold(Self::default(), |mut counts, snapshot| {
                counts.total += 1;
                match snapshot.overall_status() {
                    StageStatus::Completed => counts.completed += 1,
                    StageStatus::InProgress => counts.in_progress += 1,
                    StageStatus::Delayed => counts.delayed += 1,
                    StageStatus::YetToStart => {}
                }
                counts
            })
    }
}

/// Number of projects one owner has in a department
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerCount {
    pub owner: String,
    pub count: usize,
}

/// Projects in one department, per owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSummary {
    pub department: String,
    pub owners: Vec<OwnerCount>,
}

impl DepartmentSummary {
    pub fn total(&self) -> usize {
        self.owners.iter().map(|o| o.count).sum()
    }
}

/// Group `(department, owner)` pairs into per-department owner counts.
///
/// Names are trimmed; pairs missing either name are skipped. Departments
/// and owners come out sorted by name.
pub fn group_by_department<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<DepartmentSummary> {
    let mut departments: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();

    for (department, owner) in pairs {
        let (department, owner) = (department.trim(), owner.trim());
        if department.is_empty() || owner.is_empty() {
            continue;
        }
        *departments
            .entry(department)
            .or_default()
            .entry(owner)
            .or_default() += 1;
    }

    departments
        .into_iter()
        .map(|(department, owners)| DepartmentSummary {
            department: department.to_string(),
            owners: owners
                .into_iter()
                .map(|(owner, count)| OwnerCount {
                    owner: owner.to_string(),
                    count,
                })
                .collect(),
        })
        .collect()
}
