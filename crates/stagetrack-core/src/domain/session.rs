//! Edit sessions
//!
//! An `EditSession` owns the initial snapshot captured when a project is
//! opened for editing and the working copy the user mutates. Every edit is
//! tracked as a pending change record immediately; `commit` reconciles the
//! pending records with a full snapshot diff and re-baselines the session.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::audit::{
    self, ChangeLocation, ChangeRecord, MilestoneField, ProjectField, StageField, TrackedField,
};
use crate::domain::project::{Milestone, Priority, ProjectSnapshot, Stage, StageStatus};
use crate::domain::schedule::{calculate_phase_dates, validate_date_range};
use crate::error::{Error, Result};

/// Default ceiling for the sum of stage weights
pub const MAX_TOTAL_WEIGHT: f64 = 100.0;

/// Slack for float sums such as 33.3 + 33.3 + 33.4
const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Caller-supplied role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access
    #[default]
    Admin,
    /// Head of department, view only
    Hod,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Hod => "hod",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "hod" => Some(Role::Hod),
            _ => None,
        }
    }

    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A project-level edit
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectEdit {
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
    Summary(String),
    Priority(Priority),
}

impl ProjectEdit {
    fn field(&self) -> ProjectField {
        match self {
            ProjectEdit::StartDate(_) => ProjectField::StartDate,
            ProjectEdit::EndDate(_) => ProjectField::EndDate,
            ProjectEdit::Summary(_) => ProjectField::OverallProjectSummary,
            ProjectEdit::Priority(_) => ProjectField::Priority,
        }
    }

    fn apply(self, snapshot: &mut ProjectSnapshot) {
        match self {
            ProjectEdit::StartDate(date) => snapshot.start_date = date,
            ProjectEdit::EndDate(date) => snapshot.end_date = date,
            ProjectEdit::Summary(summary) => snapshot.overall_project_summary = summary,
            ProjectEdit::Priority(priority) => snapshot.priority = priority,
        }
    }
}

/// A stage-level edit
#[derive(Debug, Clone, PartialEq)]
pub enum StageEdit {
    Status(StageStatus),
    Owner(String),
    ActualStartDate(Option<NaiveDate>),
    ActualEndDate(Option<NaiveDate>),
    Remarks(String),
}

impl StageEdit {
    fn field(&self) -> StageField {
        match self {
            StageEdit::Status(_) => StageField::Status,
            StageEdit::Owner(_) => StageField::StageOwner,
            StageEdit::ActualStartDate(_) => StageField::ActualStartDate,
            StageEdit::ActualEndDate(_) => StageField::ActualEndDate,
            StageEdit::Remarks(_) => StageField::Remarks,
        }
    }

    fn apply(self, stage: &mut Stage) {
        match self {
            StageEdit::Status(status) => stage.status = status,
            StageEdit::Owner(owner) => stage.stage_owner = owner,
            StageEdit::ActualStartDate(date) => stage.actual_start_date = date,
            StageEdit::ActualEndDate(date) => stage.actual_end_date = date,
            StageEdit::Remarks(remarks) => stage.remarks = remarks,
        }
    }
}

/// A milestone-level edit
#[derive(Debug, Clone, PartialEq)]
pub enum MilestoneEdit {
    StageName(String),
    Owner(String),
    Remarks(String),
}

impl MilestoneEdit {
    fn field(&self) -> MilestoneField {
        match self {
            MilestoneEdit::StageName(_) => MilestoneField::StageName,
            MilestoneEdit::Owner(_) => MilestoneField::Owner,
            MilestoneEdit::Remarks(_) => MilestoneField::Remarks,
        }
    }

    fn apply(self, milestone: &mut Milestone) {
        match self {
            MilestoneEdit::StageName(name) => milestone.stage_name = name,
            MilestoneEdit::Owner(owner) => milestone.owner = owner,
            MilestoneEdit::Remarks(remarks) => milestone.remarks = remarks,
        }
    }
}

/// A field highlighted after a save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightedField {
    /// `None` for project-level fields
    pub stage_index: Option<usize>,
    pub field: TrackedField,
}

/// A pending record and the milestone it was tracked for.
///
/// Milestone titles are not unique, so milestone records are keyed by
/// stage name and milestone id rather than by their rendered location.
#[derive(Debug, Clone, PartialEq)]
struct PendingChange {
    record: ChangeRecord,
    milestone: Option<(String, i64)>,
}

/// What a commit hands to persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBatch {
    pub snapshot: ProjectSnapshot,
    pub changes: Vec<ChangeRecord>,
}

/// Editing state for one project
#[derive(Debug, Clone)]
pub struct EditSession {
    role: Role,
    max_total_weight: f64,
    initial: ProjectSnapshot,
    working: ProjectSnapshot,
    pending: Vec<PendingChange>,
    highlighted: HashSet<HighlightedField>,
    expanded_stages: BTreeSet<usize>,
}

impl EditSession {
    /// Open a session on a loaded snapshot
    pub fn open(snapshot: ProjectSnapshot, role: Role) -> Self {
        Self {
            role,
            max_total_weight: MAX_TOTAL_WEIGHT,
            working: snapshot.clone(),
            initial: snapshot,
            pending: Vec::new(),
            highlighted: HashSet::new(),
            expanded_stages: BTreeSet::new(),
        }
    }

    /// Override the weight ceiling
    pub fn with_max_total_weight(mut self, max: f64) -> Self {
        self.max_total_weight = max;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn initial(&self) -> &ProjectSnapshot {
        &self.initial
    }

    pub fn working(&self) -> &ProjectSnapshot {
        &self.working
    }

    /// Records tracked so far, in edit order
    pub fn pending(&self) -> Vec<&ChangeRecord> {
        self.pending.iter().map(|p| &p.record).collect()
    }

    /// Whether the working copy differs from the initial snapshot
    pub fn is_dirty(&self) -> bool {
        self.initial != self.working
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.role.can_edit() {
            Ok(())
        } else {
            Err(Error::ReadOnlyRole(self.role.as_str().to_string()))
        }
    }

    /// Add, update, or drop the pending record for one field.
    ///
    /// A field back at its initial value has no pending record.
    fn track(
        &mut self,
        field: TrackedField,
        location: ChangeLocation,
        milestone: Option<(String, i64)>,
        initial: &str,
        current: &str,
    ) {
        let existing = self
            .pending
            .iter()
            .position(|p| p.milestone == milestone && p.record.targets(field, &location));

        if initial == current {
            if let Some(index) = existing {
                self.pending.remove(index);
            }
            return;
        }

        let record = ChangeRecord::new(field, &location, initial, current);
        match existing {
            Some(index) => self.pending[index].record.new_value = record.new_value,
            None => self.pending.push(PendingChange { record, milestone }),
        }
    }

    /// Apply a project-level edit
    pub fn edit_project(&mut self, edit: ProjectEdit) -> Result<()> {
        self.ensure_editable()?;

        let field = edit.field();
        edit.apply(&mut self.working);

        let initial = field.value(&self.initial);
        let current = field.value(&self.working);
        self.track(
            TrackedField::Project(field),
            ChangeLocation::Project,
            None,
            &initial,
            &current,
        );
        Ok(())
    }

    fn stage_at(&self, index: usize) -> Result<&Stage> {
        self.working
            .stages
            .get(index)
            .ok_or_else(|| Error::StageNotFound(format!("#{}", index + 1)))
    }

    /// Apply an edit to the stage at `index`
    pub fn edit_stage(&mut self, index: usize, edit: StageEdit) -> Result<()> {
        self.ensure_editable()?;
        self.stage_at(index)?;

        let field = edit.field();
        edit.apply(&mut self.working.stages[index]);
        self.track_stage_field(index, field);
        Ok(())
    }

    fn track_stage_field(&mut self, index: usize, field: StageField) {
        let stage = &self.working.stages[index];
        let Some(initial_stage) = self.initial.stage(&stage.name) else {
            debug!(stage = %stage.name, "Stage not in initial snapshot; change not tracked");
            return;
        };

        let initial = field.value(initial_stage);
        let current = field.value(stage);
        let location = ChangeLocation::Stage(stage.name.clone());
        self.track(TrackedField::Stage(field), location, None, &initial, &current);
    }

    /// Change a stage's weight, recalculating planned dates when the project
    /// range is valid.
    pub fn set_stage_weight(&mut self, index: usize, weight: f64) -> Result<()> {
        self.ensure_editable()?;
        self.stage_at(index)?;

        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight(weight.to_string()));
        }

        let others: f64 = self
            .working
            .stages
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, s)| s.effective_weight())
            .sum();
        if others + weight > self.max_total_weight + WEIGHT_TOLERANCE {
            return Err(Error::WeightLimitExceeded(others + weight, self.max_total_weight));
        }

        self.working.stages[index].weight = weight;
        self.track_stage_field(index, StageField::Weight);

        if validate_date_range(self.working.start_date, self.working.end_date) {
            self.apply_schedule();
        }
        Ok(())
    }

    /// Recalculate every stage's planned dates from the project range.
    ///
    /// Returns whether any stage date changed. Missing or inverted project
    /// dates and an empty stage list are reported as warnings.
    pub fn auto_calculate_dates(&mut self) -> Result<bool> {
        self.ensure_editable()?;

        let (Some(start), Some(end)) = (self.working.start_date, self.working.end_date) else {
            return Err(Error::MissingProjectDates);
        };
        if start > end {
            return Err(Error::InvalidDateRange(start.to_string(), end.to_string()));
        }
        if self.working.stages.is_empty() {
            return Err(Error::NoStages);
        }

        let before = self.working.stages.clone();
        self.apply_schedule();
        Ok(before != self.working.stages)
    }

    fn apply_schedule(&mut self) {
        self.working.stages = calculate_phase_dates(
            self.working.start_date,
            self.working.end_date,
            &self.working.stages,
        );

        for index in 0..self.working.stages.len() {
            self.track_stage_field(index, StageField::PlannedStartDate);
            self.track_stage_field(index, StageField::PlannedEndDate);
        }
    }

    /// Apply an edit to a milestone of the stage at `stage_index`
    pub fn edit_milestone(
        &mut self,
        stage_index: usize,
        milestone_id: i64,
        edit: MilestoneEdit,
    ) -> Result<()> {
        self.ensure_editable()?;
        let stage = self.stage_at(stage_index)?;
        let stage_name = stage.name.clone();

        let milestone = self.working.stages[stage_index]
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
            .ok_or_else(|| Error::MilestoneNotFound(stage_name.clone(), milestone_id))?;

        let field = edit.field();
        edit.apply(milestone);
        let current = field.value(milestone);
        let location = ChangeLocation::milestone(&stage_name, &milestone.title);

        let initial = self
            .initial
            .stage(&stage_name)
            .and_then(|s| s.milestone(milestone_id))
            .map(|m| field.value(m));
        if let Some(initial) = initial {
            let key = Some((stage_name, milestone_id));
            self.track(TrackedField::Milestone(field), location, key, &initial, &current);
        }
        Ok(())
    }

    /// Append a milestone to a stage, returning its id.
    ///
    /// Ids of milestones deleted earlier in this session are never reused.
    pub fn add_milestone(&mut self, stage_index: usize, title: impl Into<String>) -> Result<i64> {
        self.ensure_editable()?;
        let stage_name = self.stage_at(stage_index)?.name.clone();
        let retired = self
            .initial
            .stage(&stage_name)
            .map_or(1, Stage::next_milestone_id);

        let stage = &mut self.working.stages[stage_index];
        let id = stage.next_milestone_id().max(retired);
        stage.milestones.push(Milestone::new(id, title));
        Ok(id)
    }

    /// Remove a milestone from a stage
    pub fn delete_milestone(&mut self, stage_index: usize, milestone_id: i64) -> Result<Milestone> {
        self.ensure_editable()?;
        let stage_name = self.stage_at(stage_index)?.name.clone();

        let stage = &mut self.working.stages[stage_index];
        let position = stage
            .milestones
            .iter()
            .position(|m| m.id == milestone_id)
            .ok_or_else(|| Error::MilestoneNotFound(stage_name.clone(), milestone_id))?;
        let removed = stage.milestones.remove(position);

        let key = Some((stage_name.clone(), milestone_id));
        self.pending.retain(|p| p.milestone != key);

        let initial = self
            .initial
            .stage(&stage_name)
            .and_then(|s| s.milestone(milestone_id));
        if let Some(initial) = initial {
            let record = ChangeRecord::milestone_deleted(&stage_name, &initial.title);
            self.pending.push(PendingChange {
                record,
                milestone: key,
            });
        }

        Ok(removed)
    }

    /// Toggle a stage's expanded state, returning the new state
    pub fn toggle_stage_expansion(&mut self, index: usize) -> bool {
        if self.expanded_stages.remove(&index) {
            false
        } else {
            self.expanded_stages.insert(index);
            true
        }
    }

    pub fn is_stage_expanded(&self, index: usize) -> bool {
        self.expanded_stages.contains(&index)
    }

    /// Fields changed by the last commit
    pub fn highlighted_fields(&self) -> &HashSet<HighlightedField> {
        &self.highlighted
    }

    pub fn clear_highlights(&mut self) {
        self.highlighted.clear();
    }

    /// The change batch a save would produce right now
    pub fn collect_changes(&self) -> Vec<ChangeRecord> {
        let pending: Vec<ChangeRecord> = self.pending.iter().map(|p| p.record.clone()).collect();
        audit::diff(&self.initial, &self.working, &pending)
    }

    /// Produce the save batch and make the working copy the new baseline
    pub fn commit(&mut self) -> Result<SaveBatch> {
        self.ensure_editable()?;

        let changes = self.collect_changes();
        self.highlighted = changes
            .iter()
            .filter_map(|change| self.highlight_for(change))
            .collect();

        info!(change_count = changes.len(), "Edit session committed");

        self.initial = self.working.clone();
        self.pending.clear();

        Ok(SaveBatch {
            snapshot: self.working.clone(),
            changes,
        })
    }

    /// Throw away all edits since the last commit
    pub fn reset(&mut self) {
        self.working = self.initial.clone();
        self.pending.clear();
    }

    fn highlight_for(&self, change: &ChangeRecord) -> Option<HighlightedField> {
        let field = TrackedField::from_label(&change.field_name, &change.stage_name)?;
        if matches!(field, TrackedField::Project(_)) {
            return Some(HighlightedField {
                stage_index: None,
                field,
            });
        }

        let index = match field {
            TrackedField::Milestone(_) | TrackedField::MilestoneDeleted => {
                self.working.stages.iter().position(|s| {
                    change
                        .stage_name
                        .strip_prefix(s.name.as_str())
                        .is_some_and(|rest| rest.starts_with(" - "))
                })?
            }
            _ => self
                .working
                .stages
                .iter()
                .position(|s| s.name == change.stage_name)?,
        };
        Some(HighlightedField {
            stage_index: Some(index),
            field,
        })
    }
}
