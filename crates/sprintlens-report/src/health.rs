//! Task health classifiers
//!
//! Subsets of the Issues table relative to an explicit evaluation date
//! (`as_of`, the pass's "today" normalized to a date), plus the per-assignee
//! Green/Amber/Red signal. Records whose relevant date failed to parse are
//! excluded from date-filtered sets, never treated as due today.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use sprintlens_core::{HealthStatus, Issue, IssueStatus};

/// Days an In Progress issue may sit past its start before counting as stuck
const STUCK_AFTER_DAYS: i64 = 7;

/// Width of the due-soon window, inclusive of both ends
const DUE_SOON_DAYS: i64 = 7;

/// Issues without an assignee
pub fn unassigned(issues: &[Issue]) -> Vec<&Issue> {
    issues.iter().filter(|i| i.assignee.is_none()).collect()
}

/// Issues due strictly before `as_of`. An issue due exactly on `as_of` is
/// not overdue yet.
pub fn overdue(issues: &[Issue], as_of: NaiveDate) -> Vec<&Issue> {
    issues
        .iter()
        .filter(|i| i.due.is_some_and(|due| due < as_of))
        .collect()
}

/// Issues due within [as_of, as_of + 7 days], both ends inclusive
pub fn due_soon(issues: &[Issue], as_of: NaiveDate) -> Vec<&Issue> {
    let horizon = as_of + Duration::days(DUE_SOON_DAYS);
    issues
        .iter()
        .filter(|i| i.due.is_some_and(|due| due >= as_of && due <= horizon))
        .collect()
}

/// In Progress issues started more than 7 days before `as_of`. Unknown
/// start dates are excluded.
pub fn stuck(issues: &[Issue], as_of: NaiveDate) -> Vec<&Issue> {
    issues
        .iter()
        .filter(|i| {
            i.status == IssueStatus::InProgress
                && i.start
                    .is_some_and(|start| (as_of - start).num_days() > STUCK_AFTER_DAYS)
        })
        .collect()
}

/// Issues missing the day estimate OR the story points (either absence
/// triggers the flag)
pub fn missing_estimate(issues: &[Issue]) -> Vec<&Issue> {
    issues
        .iter()
        .filter(|i| i.estimate_days.is_none() || i.story_points.is_none())
        .collect()
}

/// Per-assignee task totals, overdue counts and the derived health tier.
/// Unassigned issues belong to no assignee and are not counted here.
pub fn health_by_assignee(issues: &[Issue], as_of: NaiveDate) -> Vec<HealthStatus> {
    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for issue in issues {
        let Some(assignee) = issue.assignee.as_deref() else {
            continue;
        };
        let entry = counts.entry(assignee.to_string()).or_insert((0, 0));
        entry.0 += 1;
        if issue.due.is_some_and(|due| due < as_of) {
            entry.1 += 1;
        }
    }
    counts
        .into_iter()
        .map(|(assignee, (total, overdue))| HealthStatus::new(assignee, total, overdue))
        .collect()
}
