//! End-to-end properties of the aggregation pass over a realistic dataset

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sprintlens_core::{
    Absence, AbsenceReason, CapacityConfig, HealthTier, Issue, IssueStatus, PeriodBucket,
    ProjectDataset, SkillEntry, WorklogEntry,
};
use sprintlens_report::{burnup, worklog_pivot, Dashboard};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn as_of() -> NaiveDate {
    date(2026, 2, 9)
}

/// A small sprint: two resources, one of them behind, one on leave.
fn sprint_dataset() -> ProjectDataset {
    let mut dataset = ProjectDataset::default();

    dataset.issues = vec![
        Issue::new("CRM-1")
            .summary("Schema migration")
            .status(IssueStatus::Done)
            .assignee("alice")
            .project("CRM")
            .story_points(5.0)
            .estimate_days(2.0)
            .start(date(2026, 2, 2))
            .due(date(2026, 2, 5)),
        Issue::new("CRM-2")
            .summary("Import pipeline")
            .status(IssueStatus::InProgress)
            .assignee("alice")
            .project("CRM")
            .story_points(8.0)
            .estimate_days(3.0)
            .start(date(2026, 2, 4))
            .due(date(2026, 2, 12)),
        Issue::new("CRM-3")
            .summary("Legacy export")
            .status(IssueStatus::ToDo)
            .assignee("bob")
            .project("CRM")
            .story_points(3.0)
            .estimate_days(2.0)
            .start(date(2026, 2, 3))
            .due(date(2026, 2, 6)),
        Issue::new("CRM-4")
            .summary("Ops handover")
            .status(IssueStatus::ToDo)
            .project("CRM"),
    ];
    dataset.skills = vec![
        SkillEntry::new("alice", "Rust"),
        SkillEntry::new("bob", "SQL"),
    ];
    dataset.worklogs = vec![
        WorklogEntry::new("alice", date(2026, 2, 3), 7.5).for_issue("CRM-1"),
        WorklogEntry::new("alice", date(2026, 2, 5), 6.0).for_issue("CRM-2"),
        WorklogEntry::new("bob", date(2026, 2, 5), 4.0).for_issue("CRM-3"),
    ];
    dataset.absences = vec![Absence::new(
        "bob",
        date(2026, 2, 10).and_hms_opt(9, 0, 0).unwrap(),
        date(2026, 2, 10).and_hms_opt(17, 0, 0).unwrap(),
        AbsenceReason::Leave,
    )];
    dataset
}

#[test]
fn spent_hours_round_trip_to_the_worklog_sum() {
    let dataset = sprint_dataset();
    let dashboard = Dashboard::compute(&dataset, &CapacityConfig::default(), as_of());

    let rows = dashboard.utilization.table().unwrap();
    let spent_total: f64 = rows.iter().map(|r| r.spent_hours).sum();
    let worklog_total: f64 = dataset.worklogs.iter().map(|w| w.hours).sum();
    assert_eq!(spent_total, worklog_total);
}

#[test]
fn burnup_is_monotone_and_lands_on_done_scope() {
    let dataset = sprint_dataset();
    let series = burnup(&dataset.issues).into_table().unwrap();

    for pair in series.points.windows(2) {
        assert!(pair[1].completed >= pair[0].completed);
    }
    // CRM-1 is the only Done issue
    assert_eq!(series.final_completed(), 5.0);
    assert_eq!(series.total_scope, 16.0);
    // Range spans min start to max due
    assert_eq!(series.points.first().unwrap().date, date(2026, 2, 2));
    assert_eq!(series.points.last().unwrap().date, date(2026, 2, 12));
}

#[test]
fn dashboard_classifies_the_sprint() {
    let dataset = sprint_dataset();
    let dashboard = Dashboard::compute(&dataset, &CapacityConfig::default(), as_of());

    // CRM-1 and CRM-3 are due before Feb 9
    assert_eq!(dashboard.overdue, vec!["CRM-1", "CRM-3"]);
    // CRM-2 due Feb 12 falls inside the 7-day window
    assert_eq!(dashboard.due_soon, vec!["CRM-2"]);
    assert_eq!(dashboard.unassigned, vec!["CRM-4"]);
    assert_eq!(dashboard.missing_estimate, vec!["CRM-4"]);
    // CRM-2 started Feb 4, only 5 days before the pass
    assert_eq!(dashboard.stuck, Vec::<String>::new());

    // alice: 1 of 2 overdue -> red; bob: 1 of 1 -> red
    let health = &dashboard.health;
    assert_eq!(health.len(), 2);
    assert_eq!(health[0].assignee, "alice");
    assert_eq!(health[0].tier, HealthTier::Red);
    assert_eq!(health[1].assignee, "bob");
    assert_eq!(health[1].tier, HealthTier::Red);
}

#[test]
fn availability_nets_the_leave_and_flags_nobody() {
    let dataset = sprint_dataset();
    let dashboard = Dashboard::compute(&dataset, &CapacityConfig::default(), as_of());

    let bob = dashboard
        .availability
        .iter()
        .find(|r| r.resource == "bob")
        .unwrap();
    assert_eq!(bob.absence_hours, 8.0);
    assert_eq!(bob.available_hours, 72.0);

    // alice estimates 40h against 80h, bob 16h against 72h
    assert!(dashboard.overallocation.iter().all(|r| !r.overallocated));
}

#[test]
fn weekly_pivot_covers_every_logged_hour() {
    let dataset = sprint_dataset();
    let pivot = worklog_pivot(&dataset.worklogs, PeriodBucket::Weekly)
        .into_table()
        .unwrap();

    assert_eq!(pivot.resources, vec!["alice", "bob"]);
    assert_eq!(pivot.periods, vec!["2026-W06"]);
    assert_eq!(pivot.total(), 17.5);
}
