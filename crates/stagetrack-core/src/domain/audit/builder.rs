//! Change-log reconciliation
//!
//! Merges the records tracked while a user edits with the records derived by
//! comparing the initial and working snapshots, then removes duplicates.
//! Nothing here fails: stages or milestones that cannot be matched are
//! skipped.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::audit::field::{
    ChangeLocation, MilestoneField, ProjectField, StageField, TrackedField,
};
use crate::domain::audit::record::{ChangeRecord, display_value};
use crate::domain::project::{Milestone, ProjectSnapshot, Stage};

/// Build the deduplicated change batch for a save.
///
/// Incremental records keep their order and come first; any of them whose
/// field now holds its initial value again is dropped. Snapshot-derived
/// records follow.
pub fn diff(
    initial: &ProjectSnapshot,
    working: &ProjectSnapshot,
    incremental: &[ChangeRecord],
) -> Vec<ChangeRecord> {
    let mut seen = HashSet::new();
    let mut changes = Vec::new();

    for record in incremental {
        if is_reverted(initial, working, record) {
            debug!(
                field = %record.field_name,
                location = %record.stage_name,
                "Dropping reverted pending change"
            );
            continue;
        }
        if seen.insert(record.clone()) {
            changes.push(record.clone());
        }
    }

    for record in diff_snapshots(initial, working) {
        if seen.insert(record.clone()) {
            changes.push(record);
        }
    }

    changes
}

/// Compare two snapshots field by field.
///
/// Stages are matched by name (first match in `initial`), milestones by id
/// within the matched stage.
pub fn diff_snapshots(initial: &ProjectSnapshot, working: &ProjectSnapshot) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    for field in ProjectField::DIFFED {
        let before = field.value(initial);
        let after = field.value(working);
        if before != after {
            changes.push(ChangeRecord::new(
                TrackedField::Project(field),
                &ChangeLocation::Project,
                &before,
                &after,
            ));
        }
    }

    for stage in &working.stages {
        let Some(before_stage) = initial.stage(&stage.name) else {
            continue;
        };
        diff_stage(before_stage, stage, &mut changes);
    }

    changes
}

fn diff_stage(before: &Stage, after: &Stage, changes: &mut Vec<ChangeRecord>) {
    let location = ChangeLocation::Stage(after.name.clone());
    for field in StageField::DIFFED {
        let old = field.value(before);
        let new = field.value(after);
        if old != new {
            changes.push(ChangeRecord::new(TrackedField::Stage(field), &location, &old, &new));
        }
    }

    for before_milestone in &before.milestones {
        match after.milestone(before_milestone.id) {
            None => changes.push(ChangeRecord::milestone_deleted(
                &after.name,
                &before_milestone.title,
            )),
            Some(after_milestone) => {
                diff_milestone(&after.name, before_milestone, after_milestone, changes)
            }
        }
    }
}

fn diff_milestone(
    stage_name: &str,
    before: &Milestone,
    after: &Milestone,
    changes: &mut Vec<ChangeRecord>,
) {
    let location = ChangeLocation::milestone(stage_name, &after.title);
    for field in MilestoneField::DIFFED {
        let old = field.value(before);
        let new = field.value(after);
        if old != new {
            changes.push(ChangeRecord::new(
                TrackedField::Milestone(field),
                &location,
                &old,
                &new,
            ));
        }
    }
}

/// Whether a pending record's field is back at its initial value.
///
/// Records that cannot be resolved against the snapshots are kept.
fn is_reverted(initial: &ProjectSnapshot, working: &ProjectSnapshot, record: &ChangeRecord) -> bool {
    let Some(field) = TrackedField::from_label(&record.field_name, &record.stage_name) else {
        return false;
    };
    let location = record.stage_name.as_str();

    match field {
        TrackedField::Project(field) => field.value(initial) == field.value(working),
        TrackedField::Stage(field) => match (initial.stage(location), working.stage(location)) {
            (Some(before), Some(after)) => field.value(before) == field.value(after),
            _ => false,
        },
        TrackedField::Milestone(field) => {
            let pairs: Vec<(&Milestone, &Milestone)> = milestones_at(working, location)
                .filter_map(|(stage, after)| {
                    let before = initial.stage(&stage.name)?.milestone(after.id)?;
                    Some((before, after))
                })
                .collect();

            // Same-titled milestones share a location; the previous value
            // tells them apart.
            pairs
                .iter()
                .find(|(before, _)| display_value(&field.value(before)) == record.previous_value)
                .or_else(|| pairs.first())
                .is_some_and(|(before, after)| field.value(before) == field.value(after))
        }
        TrackedField::MilestoneDeleted => {
            let deleted: Vec<(&Stage, &Milestone)> = milestones_at(initial, location).collect();
            !deleted.is_empty()
                && deleted.iter().all(|(stage, milestone)| {
                    working
                        .stage(&stage.name)
                        .is_some_and(|s| s.milestone(milestone.id).is_some())
                })
        }
    }
}

/// Milestones whose "{stage} - {title}" location matches
fn milestones_at<'a>(
    snapshot: &'a ProjectSnapshot,
    location: &'a str,
) -> impl Iterator<Item = (&'a Stage, &'a Milestone)> + 'a {
    snapshot.stages.iter().flat_map(move |stage| {
        stage
            .milestones
            .iter()
            .filter(move |m| ChangeLocation::milestone(&stage.name, &m.title).to_string() == location)
            .map(move |m| (stage, m))
    })
}
