//! Phase date allocation
//!
//! Splits a project's overall date range across its stages in proportion to
//! stage weight. Days are whole; rounding is always floor, followed by an
//! explicit remainder pass so the total span is never over-allocated.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::domain::dates::days_between;
use crate::domain::project::Stage;

/// The window assigned to one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Days allocated before clamping and the last-stage override
    pub days: i64,
}

/// Whether both dates are present and ordered
pub fn validate_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    matches!((start, end), (Some(start), Some(end)) if start <= end)
}

/// Distribute `total_days` across `weights`.
///
/// Every entry gets at least one day. Returns `None` when there is nothing
/// to distribute over (no weights, non-positive span, zero total weight).
pub fn allocate_days(total_days: i64, weights: &[f64]) -> Option<Vec<i64>> {
    if weights.is_empty() || total_days <= 0 {
        return None;
    }

    let weights: Vec<f64> = weights
        .iter()
        .map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 })
        .collect();
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return None;
    }

    let mut days: Vec<i64> = weights
        .iter()
        .map(|w| ((w / total_weight * total_days as f64).floor() as i64).max(1))
        .collect();

    let remaining = total_days - days.iter().sum::<i64>();
    if remaining > 0 {
        let mut by_weight: Vec<usize> = (0..weights.len()).collect();
        // stable sort keeps original order among equal weights
        by_weight.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));

        for &index in by_weight.iter().take(remaining as usize) {
            days[index] += 1;
        }
    }

    Some(days)
}

/// Compute the contiguous stage windows for an overall range.
///
/// The last window always ends exactly on `overall_end`.
pub fn plan_windows(
    overall_start: NaiveDate,
    overall_end: NaiveDate,
    weights: &[f64],
) -> Option<Vec<PhaseWindow>> {
    if overall_start > overall_end {
        return None;
    }

    let total_days = days_between(overall_start, overall_end) + 1;
    let days = allocate_days(total_days, weights)?;

    let mut windows = Vec::with_capacity(days.len());
    let mut current = overall_start;
    for days_for_phase in days {
        let start = current;
        let end = start
            .checked_add_days(Days::new((days_for_phase - 1) as u64))
            .map_or(overall_end, |end| end.min(overall_end));

        windows.push(PhaseWindow {
            start,
            end,
            days: days_for_phase,
        });
        current = end.succ_opt().unwrap_or(end);
    }

    if let Some(last) = windows.last_mut() {
        last.end = overall_end;
    }

    Some(windows)
}

/// Assign planned start/end dates to `stages` from the overall range.
///
/// Returns the stages unchanged when the dates are missing or inverted, the
/// list is empty, or the total weight is zero.
pub fn calculate_phase_dates(
    overall_start: Option<NaiveDate>,
    overall_end: Option<NaiveDate>,
    stages: &[Stage],
) -> Vec<Stage> {
    let (Some(start), Some(end)) = (overall_start, overall_end) else {
        debug!("Skipping phase date allocation: project dates not set");
        return stages.to_vec();
    };

    let weights: Vec<f64> = stages.iter().map(|s| s.weight).collect();
    let Some(windows) = plan_windows(start, end, &weights) else {
        debug!(
            start = %start,
            end = %end,
            stage_count = stages.len(),
            "Skipping phase date allocation: invalid range or zero total weight"
        );
        return stages.to_vec();
    };

    stages
        .iter()
        .zip(windows)
        .map(|(stage, window)| Stage {
            start_date: Some(window.start),
            end_date: Some(window.end),
            ..stage.clone()
        })
        .collect()
}

/// Shares of a stage's range given to its development milestones
pub const DEVELOPMENT_MILESTONE_SHARES: [f64; 5] = [20.0; 5];

/// The window suggested for one milestone inside a stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MilestoneWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
    /// Share of the stage range, in percent
    pub share: f64,
}

/// Split a stage's planned range into consecutive milestone windows.
///
/// Each window gets its share of the range rounded to whole days. Every
/// window but the last gets at least one day while days remain for the
/// ones after it; the last window absorbs the remainder and always ends on
/// `end`. Windows left without days are zero-length on `end`. Returns
/// `None` when the dates are missing or inverted.
pub fn milestone_windows(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    shares: &[f64],
) -> Option<Vec<MilestoneWindow>> {
    let (Some(start), Some(end)) = (start, end) else {
        return None;
    };
    if start > end || shares.is_empty() {
        return None;
    }

    let total_days = days_between(start, end) + 1;
    let last = shares.len() - 1;
    let mut used = 0;
    let mut windows = Vec::with_capacity(shares.len());

    for (index, &share) in shares.iter().enumerate() {
        let remaining_days = total_days - used;
        let windows_after = (last - index) as i64;

        let mut days = if index == last {
            remaining_days.max(0)
        } else {
            let mut days = ((total_days as f64 * share / 100.0).round() as i64).max(0);
            if days > remaining_days {
                days = (remaining_days - windows_after).max(0);
            }
            if days == 0 && remaining_days > windows_after {
                days = 1;
            }
            days
        };

        let window_start = offset(start, used);
        let mut window_end = offset(window_start, days - 1);
        if window_end > end {
            window_end = end;
            days = days_between(window_start, window_end) + 1;
        }
        used += days.max(0);

        if index == last {
            window_end = end;
            days = days.max(days_between(window_start, end) + 1);
        }

        // empty windows collapse onto the last day of the stage
        let (window_start, window_end) = if days > 0 {
            (window_start, window_end)
        } else {
            let day = window_start.min(end);
            (day, day)
        };
        windows.push(MilestoneWindow {
            start: window_start,
            end: window_end,
            days: days.max(0),
            share,
        });
    }

    Some(windows)
}

fn offset(date: NaiveDate, days: i64) -> NaiveDate {
    if days <= 0 {
        return date;
    }
    date.checked_add_days(Days::new(days as u64)).unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn stages(weights: &[f64]) -> Vec<Stage> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| Stage::new(format!("Stage {}", i + 1), *w))
            .collect()
    }

    fn ranges(stages: &[Stage]) -> Vec<(String, String)> {
        stages
            .iter()
            .map(|s| {
                (
                    s.start_date.unwrap().to_string(),
                    s.end_date.unwrap().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_proportional_split() {
        let result = calculate_phase_dates(
            Some(date("2025-01-01")),
            Some(date("2025-01-10")),
            &stages(&[50.0, 30.0, 20.0]),
        );

        assert_eq!(
            ranges(&result),
            vec![
                ("2025-01-01".into(), "2025-01-05".into()),
                ("2025-01-06".into(), "2025-01-08".into()),
                ("2025-01-09".into(), "2025-01-10".into()),
            ]
        );
    }

    #[test]
    fn test_remainder_goes_to_heaviest_first_in_order() {
        assert_eq!(allocate_days(10, &[34.0, 33.0, 33.0]), Some(vec![4, 3, 3]));
        assert_eq!(allocate_days(10, &[33.0, 34.0, 33.0]), Some(vec![3, 4, 3]));
        // equal weights: earlier stages win the extra days
        assert_eq!(allocate_days(11, &[1.0, 1.0, 1.0]), Some(vec![4, 4, 3]));
    }

    #[test]
    fn test_every_stage_gets_a_day() {
        let days = allocate_days(10, &[95.0, 0.0, 5.0]).unwrap();
        assert!(days.iter().all(|d| *d >= 1));
        assert_eq!(days, vec![9, 1, 1]);
    }

    #[test]
    fn test_noop_inputs_return_stages_unchanged() {
        let input = stages(&[50.0, 50.0]);

        assert_eq!(calculate_phase_dates(None, Some(date("2025-01-10")), &input), input);
        assert_eq!(calculate_phase_dates(Some(date("2025-01-10")), None, &input), input);
        assert_eq!(
            calculate_phase_dates(Some(date("2025-01-10")), Some(date("2025-01-01")), &input),
            input
        );
        assert_eq!(
            calculate_phase_dates(
                Some(date("2025-01-01")),
                Some(date("2025-01-10")),
                &stages(&[0.0, 0.0])
            ),
            stages(&[0.0, 0.0])
        );
        assert!(calculate_phase_dates(Some(date("2025-01-01")), Some(date("2025-01-10")), &[]).is_empty());
    }

    #[test]
    fn test_windows_cover_range_without_gaps() {
        let start = date("2025-03-01");
        let end = date("2025-06-17");
        let windows = plan_windows(start, end, &[10.0, 5.0, 15.0, 5.0, 55.0, 5.0, 5.0]).unwrap();

        assert_eq!(windows.first().unwrap().start, start);
        assert_eq!(windows.last().unwrap().end, end);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end.succ_opt().unwrap(), pair[1].start);
        }
        let covered: i64 = windows
            .iter()
            .map(|w| days_between(w.start, w.end) + 1)
            .sum();
        assert_eq!(covered, days_between(start, end) + 1);
    }

    #[test]
    fn test_single_day_range() {
        let day = date("2025-01-01");
        let windows = plan_windows(day, day, &[100.0]).unwrap();
        assert_eq!(windows, vec![PhaseWindow { start: day, end: day, days: 1 }]);
    }

    #[test]
    fn test_more_stages_than_days_forces_last_end() {
        let start = date("2025-01-01");
        let end = date("2025-01-02");
        let windows = plan_windows(start, end, &[40.0, 30.0, 30.0]).unwrap();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].start, start);
        assert_eq!(windows[1].end, end);
        // clamped stages start past the range; the override pins the final end
        assert_eq!(windows[2].start, date("2025-01-03"));
        assert_eq!(windows[2].end, end);
    }

    #[test]
    fn test_allocation_is_deterministic() {
        let input = stages(&[12.5, 37.5, 50.0]);
        let first = calculate_phase_dates(Some(date("2025-02-01")), Some(date("2025-04-30")), &input);
        let second = calculate_phase_dates(Some(date("2025-02-01")), Some(date("2025-04-30")), &input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_preserves_other_stage_fields() {
        let input = vec![Stage::new("Concept", 100.0).with_owner("Alice")];
        let result = calculate_phase_dates(Some(date("2025-01-01")), Some(date("2025-01-31")), &input);
        assert_eq!(result[0].stage_owner, "Alice");
        assert_eq!(result[0].start_date, Some(date("2025-01-01")));
        assert_eq!(result[0].end_date, Some(date("2025-01-31")));
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(Some(date("2025-01-01")), Some(date("2025-01-01"))));
        assert!(!validate_date_range(Some(date("2025-01-02")), Some(date("2025-01-01"))));
        assert!(!validate_date_range(None, Some(date("2025-01-01"))));
    }

    #[test]
    fn test_milestone_windows_even_split() {
        let windows = milestone_windows(
            Some(date("2025-01-01")),
            Some(date("2025-01-10")),
            &DEVELOPMENT_MILESTONE_SHARES,
        )
        .unwrap();

        let spans: Vec<_> = windows
            .iter()
            .map(|w| (w.start.to_string(), w.end.to_string(), w.days))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("2025-01-01".into(), "2025-01-02".into(), 2),
                ("2025-01-03".into(), "2025-01-04".into(), 2),
                ("2025-01-05".into(), "2025-01-06".into(), 2),
                ("2025-01-07".into(), "2025-01-08".into(), 2),
                ("2025-01-09".into(), "2025-01-10".into(), 2),
            ]
        );
        assert!(windows.iter().all(|w| w.share == 20.0));
    }

    #[test]
    fn test_last_milestone_absorbs_remainder() {
        let windows = milestone_windows(
            Some(date("2025-01-01")),
            Some(date("2025-01-11")),
            &DEVELOPMENT_MILESTONE_SHARES,
        )
        .unwrap();

        let days: Vec<i64> = windows.iter().map(|w| w.days).collect();
        assert_eq!(days, vec![2, 2, 2, 2, 3]);
        assert_eq!(windows[4].start, date("2025-01-09"));
        assert_eq!(windows[4].end, date("2025-01-11"));
    }

    #[test]
    fn test_short_stage_gives_early_milestones_one_day() {
        let windows = milestone_windows(
            Some(date("2025-01-01")),
            Some(date("2025-01-03")),
            &DEVELOPMENT_MILESTONE_SHARES,
        )
        .unwrap();

        let days: Vec<i64> = windows.iter().map(|w| w.days).collect();
        assert_eq!(days, vec![1, 1, 1, 0, 0]);
        assert_eq!(windows[2].end, date("2025-01-03"));
        assert_eq!(windows[4].start, date("2025-01-03"));
        assert_eq!(windows[4].end, date("2025-01-03"));
    }

    #[test]
    fn test_milestone_windows_need_valid_range() {
        assert!(milestone_windows(None, Some(date("2025-01-03")), &DEVELOPMENT_MILESTONE_SHARES).is_none());
        assert!(
            milestone_windows(
                Some(date("2025-01-05")),
                Some(date("2025-01-03")),
                &DEVELOPMENT_MILESTONE_SHARES
            )
            .is_none()
        );
        assert!(milestone_windows(Some(date("2025-01-01")), Some(date("2025-01-03")), &[]).is_none());
    }
}
