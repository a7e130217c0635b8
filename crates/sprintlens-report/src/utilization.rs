//! Utilization aggregator
//!
//! Per-assignee effort totals and utilization ratio, from either effort
//! layout:
//!
//! - legacy layout: per-issue estimate/spent columns in seconds, divided by
//!   3600 at the source
//! - workbook layout: estimates from the Issues sheet (days at
//!   `workday_hours` each) joined against hours from the Worklogs sheet
//!
//! A zero estimate sum yields `utilization_pct = None` (rendered "N/A"),
//! never a division by zero.

use std::collections::BTreeMap;

use sprintlens_core::{CapacityConfig, Derived, Issue, UtilizationRow, WorklogEntry};

/// True if any issue carries the legacy seconds columns
pub fn has_legacy_effort(issues: &[Issue]) -> bool {
    issues
        .iter()
        .any(|i| i.estimate_secs.is_some() || i.spent_secs.is_some())
}

/// Utilization from the legacy per-issue seconds columns, grouped by
/// assignee. Unassigned issues have no row to attribute effort to and are
/// excluded.
pub fn utilization_from_issue_columns(issues: &[Issue]) -> Derived<Vec<UtilizationRow>> {
    let mut sums: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for issue in issues {
        let Some(assignee) = issue.assignee.as_deref() else {
            continue;
        };
        let entry = sums.entry(assignee.to_string()).or_insert((0.0, 0.0));
        entry.0 += issue.estimate_hours_legacy().unwrap_or(0.0);
        entry.1 += issue.spent_hours_legacy().unwrap_or(0.0);
    }

    if sums.is_empty() {
        return Derived::insufficient("no assigned issues to aggregate");
    }
    Derived::Table(
        sums.into_iter()
            .map(|(assignee, (estimated, spent))| {
                UtilizationRow::compute(assignee, estimated, spent)
            })
            .collect(),
    )
}

/// Utilization for the workbook layout: estimate hours per assignee from the
/// Issues sheet, spent hours per resource from the Worklogs sheet. The row
/// set is the union of both sides, so a resource logging work without
/// estimated issues still appears (with an N/A ratio).
pub fn utilization_from_worklogs(
    issues: &[Issue],
    worklogs: &[WorklogEntry],
    config: &CapacityConfig,
) -> Derived<Vec<UtilizationRow>> {
    let mut sums: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for issue in issues {
        let Some(assignee) = issue.assignee.as_deref() else {
            continue;
        };
        let estimated = issue.estimate_hours(config.workday_hours).unwrap_or(0.0);
        sums.entry(assignee.to_string()).or_insert((0.0, 0.0)).0 += estimated;
    }
    for entry in worklogs {
        sums.entry(entry.resource.clone()).or_insert((0.0, 0.0)).1 += entry.hours;
    }

    if sums.is_empty() {
        return Derived::insufficient("no assigned issues or worklogs to aggregate");
    }
    Derived::Table(
        sums.into_iter()
            .map(|(assignee, (estimated, spent))| {
                UtilizationRow::compute(assignee, estimated, spent)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn legacy_layout_sums_and_ratio() {
        let issues = vec![
            Issue::new("A-1").assignee("alice").estimate_secs(36_000).spent_secs(18_000),
            Issue::new("A-2").assignee("alice").estimate_secs(36_000).spent_secs(27_000),
            Issue::new("A-3").assignee("bob").estimate_secs(7_200).spent_secs(7_200),
        ];
        let rows = utilization_from_issue_columns(&issues).into_table().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].assignee, "alice");
        assert_eq!(rows[0].estimated_hours, 20.0);
        assert_eq!(rows[0].spent_hours, 12.5);
        assert_eq!(rows[0].utilization_pct, Some(62.5));
        assert_eq!(rows[1].assignee, "bob");
        assert_eq!(rows[1].utilization_pct, Some(100.0));
    }

    #[test]
    fn legacy_layout_one_second_is_exact() {
        let issues = vec![Issue::new("A-1").assignee("alice").spent_secs(3600)];
        let rows = utilization_from_issue_columns(&issues).into_table().unwrap();
        assert_eq!(rows[0].spent_hours, 1.0);
    }

    #[test]
    fn zero_estimate_reports_na_not_a_crash() {
        let issues = vec![Issue::new("A-1").assignee("alice").spent_secs(3600)];
        let rows = utilization_from_issue_columns(&issues).into_table().unwrap();
        assert_eq!(rows[0].utilization_pct, None);
        assert_eq!(rows[0].pct_display(), "N/A");
    }

    #[test]
    fn unassigned_issues_are_excluded() {
        let issues = vec![Issue::new("A-1").estimate_secs(3600)];
        assert!(utilization_from_issue_columns(&issues).is_insufficient());
    }

    #[test]
    fn workbook_layout_joins_estimates_and_worklogs() {
        let config = CapacityConfig::default();
        let issues = vec![
            Issue::new("A-1").assignee("alice").estimate_days(2.0),
            Issue::new("A-2").assignee("alice").estimate_days(0.5),
        ];
        let worklogs = vec![
            WorklogEntry::new("alice", date(2026, 2, 2), 6.0),
            WorklogEntry::new("alice", date(2026, 2, 3), 4.0),
        ];
        let rows = utilization_from_worklogs(&issues, &worklogs, &config)
            .into_table()
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].estimated_hours, 20.0);
        assert_eq!(rows[0].spent_hours, 10.0);
        assert_eq!(rows[0].utilization_pct, Some(50.0));
    }

    #[test]
    fn workbook_layout_keeps_resources_without_estimates() {
        let config = CapacityConfig::default();
        let worklogs = vec![WorklogEntry::new("carol", date(2026, 2, 2), 3.0)];
        let rows = utilization_from_worklogs(&[], &worklogs, &config)
            .into_table()
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].assignee, "carol");
        assert_eq!(rows[0].utilization_pct, None);
    }

    #[test]
    fn spent_totals_round_trip_to_worklog_sum() {
        let config = CapacityConfig::default();
        let issues = vec![
            Issue::new("A-1").assignee("alice").estimate_days(1.0),
            Issue::new("A-2").assignee("bob").estimate_days(1.0),
        ];
        let worklogs = vec![
            WorklogEntry::new("alice", date(2026, 2, 2), 6.0),
            WorklogEntry::new("bob", date(2026, 2, 2), 2.5),
            WorklogEntry::new("alice", date(2026, 2, 3), 1.5),
        ];
        let rows = utilization_from_worklogs(&issues, &worklogs, &config)
            .into_table()
            .unwrap();

        let spent_total: f64 = rows.iter().map(|r| r.spent_hours).sum();
        let worklog_total: f64 = worklogs.iter().map(|w| w.hours).sum();
        assert_eq!(spent_total, worklog_total);
    }

    #[test]
    fn empty_input_is_insufficient() {
        let config = CapacityConfig::default();
        assert!(utilization_from_worklogs(&[], &[], &config).is_insufficient());
        assert!(utilization_from_issue_columns(&[]).is_insufficient());
    }

    #[test]
    fn rounding_is_one_decimal() {
        let issues = vec![
            Issue::new("A-1").assignee("alice").estimate_secs(10_800).spent_secs(3_600),
        ];
        let rows = utilization_from_issue_columns(&issues).into_table().unwrap();
        // 1/3 -> 33.333... -> 33.3
        assert_eq!(rows[0].utilization_pct, Some(33.3));
    }
}
