//! Time-series builders
//!
//! Burnup series over the project date range and resource x period worklog
//! pivots. Issues with no parseable dates cannot anchor a range; when the
//! whole table is date-less the result is an insufficient-data marker, not
//! an empty chart.

use std::collections::{BTreeMap, BTreeSet};

use sprintlens_core::{
    BurnupPoint, BurnupSeries, Derived, Issue, PeriodBucket, WorklogEntry, WorklogPivot,
};

/// Cumulative burnup over [min start date, max due date], inclusive.
///
/// Completed(d) sums the story points of Done issues due on or before `d`
/// and is non-decreasing by construction; the total scope is the constant
/// sum of story points over all issues in scope (unestimated issues
/// contribute zero).
pub fn burnup(issues: &[Issue]) -> Derived<BurnupSeries> {
    // Range anchors on min start / max due; if one side is entirely
    // unknown the other side bounds both ends
    let first = issues
        .iter()
        .filter_map(|i| i.start)
        .min()
        .or_else(|| issues.iter().filter_map(|i| i.due).min());
    let last = issues
        .iter()
        .filter_map(|i| i.due)
        .max()
        .or_else(|| issues.iter().filter_map(|i| i.start).max());
    let (Some(first), Some(last)) = (first, last) else {
        return Derived::insufficient("no parseable start or due dates to span a range");
    };
    if first > last {
        return Derived::insufficient("start dates all lie after the last due date");
    }

    let total_scope: f64 = issues.iter().filter_map(|i| i.story_points).sum();

    // Done issues sorted by due date, walked once while the range advances
    let mut done: Vec<(chrono::NaiveDate, f64)> = issues
        .iter()
        .filter(|i| i.status.is_done())
        .filter_map(|i| i.due.map(|due| (due, i.story_points.unwrap_or(0.0))))
        .collect();
    done.sort_by_key(|(due, _)| *due);

    let mut points = Vec::new();
    let mut completed = 0.0;
    let mut next = 0;
    let mut date = first;
    while date <= last {
        while next < done.len() && done[next].0 <= date {
            completed += done[next].1;
            next += 1;
        }
        points.push(BurnupPoint { date, completed });
        let Some(following) = date.succ_opt() else {
            break;
        };
        date = following;
    }

    Derived::Table(BurnupSeries { points, total_scope })
}

/// Burnup scoped to one assignee's issues; same algorithm, same markers.
pub fn burnup_for_assignee(issues: &[Issue], assignee: &str) -> Derived<BurnupSeries> {
    let subset: Vec<Issue> = issues
        .iter()
        .filter(|i| i.assignee.as_deref() == Some(assignee))
        .cloned()
        .collect();
    if subset.is_empty() {
        return Derived::insufficient(format!("no issues assigned to {assignee}"));
    }
    burnup(&subset)
}

/// Worklog hours grouped into a resource x period matrix; missing cells
/// are 0. Period keys sort chronologically in their lexical order for both
/// bucket kinds.
pub fn worklog_pivot(worklogs: &[WorklogEntry], bucket: PeriodBucket) -> Derived<WorklogPivot> {
    if worklogs.is_empty() {
        return Derived::insufficient("no worklogs to pivot");
    }

    let mut sums: BTreeMap<(String, String), f64> = BTreeMap::new();
    let mut resources: BTreeSet<String> = BTreeSet::new();
    let mut periods: BTreeSet<String> = BTreeSet::new();
    for entry in worklogs {
        let period = bucket.key(entry.date);
        resources.insert(entry.resource.clone());
        periods.insert(period.clone());
        *sums.entry((entry.resource.clone(), period)).or_insert(0.0) += entry.hours;
    }

    let resources: Vec<String> = resources.into_iter().collect();
    let periods: Vec<String> = periods.into_iter().collect();
    let hours = resources
        .iter()
        .map(|resource| {
            periods
                .iter()
                .map(|period| {
                    sums.get(&(resource.clone(), period.clone())).copied().unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    Derived::Table(WorklogPivot { resources, periods, hours })
}
