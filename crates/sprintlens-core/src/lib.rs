//! # sprintlens-core
//!
//! Core domain model for the sprintlens reporting engine.
//!
//! This crate provides:
//! - Input entities: `Issue`, `SkillEntry`, `WorklogEntry`, `Absence`
//! - The immutable `ProjectDataset` value object passed into every aggregation
//! - Derived-table types and the `Derived` ready/insufficient outcome (`report` module)
//! - Capacity configuration (`CapacityConfig`)
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sprintlens_core::{Issue, IssueStatus, ProjectDataset};
//!
//! let mut dataset = ProjectDataset::default();
//! dataset.issues.push(
//!     Issue::new("PROJ-1")
//!         .summary("Design review")
//!         .status(IssueStatus::InProgress)
//!         .assignee("alice")
//!         .story_points(5.0)
//!         .due(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
//! );
//! assert_eq!(dataset.assignees(), vec!["alice".to_string()]);
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub mod report;

pub use report::{
    AvailabilityRow, BurnupPoint, BurnupSeries, Derived, FlowLink, FlowTable, HealthStatus,
    HealthTier, OverallocationRow, PeriodBucket, SkillRow, UtilizationRow, WorklogPivot,
};

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for an issue (e.g. "PROJ-42")
pub type IssueKey = String;

/// Name of a resource / assignee
pub type ResourceName = String;

/// Seconds-to-hours conversion factor for the legacy effort columns
pub const SECONDS_PER_HOUR: f64 = 3600.0;

// ============================================================================
// Issue
// ============================================================================

/// Workflow status of an issue.
///
/// Free-form statuses from the source data are preserved in `Other` rather
/// than rejected; only `Done` participates in burnup completion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
    Blocked,
    Other(String),
}

impl IssueStatus {
    /// Parse a status cell. Unknown labels are kept verbatim as `Other`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("to do") || trimmed.eq_ignore_ascii_case("todo") {
            IssueStatus::ToDo
        } else if trimmed.eq_ignore_ascii_case("in progress") {
            IssueStatus::InProgress
        } else if trimmed.eq_ignore_ascii_case("done") {
            IssueStatus::Done
        } else if trimmed.eq_ignore_ascii_case("blocked") {
            IssueStatus::Blocked
        } else {
            IssueStatus::Other(trimmed.to_string())
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, IssueStatus::Done)
    }

    pub fn as_str(&self) -> &str {
        match self {
            IssueStatus::ToDo => "To Do",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Done => "Done",
            IssueStatus::Blocked => "Blocked",
            IssueStatus::Other(label) => label,
        }
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single row of the Issues table.
///
/// `key` is unique within a dataset. Dates, when present, are assumed to
/// satisfy `start <= due`; this is not enforced at load time. The two
/// `*_secs` fields carry the legacy per-issue effort columns (source unit is
/// seconds) and are absent in the workbook layout, where effort comes from
/// the Worklogs sheet instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier
    pub key: IssueKey,
    /// One-line description
    pub summary: String,
    /// Workflow status
    pub status: IssueStatus,
    /// Assigned resource, if any
    pub assignee: Option<ResourceName>,
    /// Role the work belongs to (e.g. "Backend")
    pub role: Option<String>,
    /// Story points, if estimated
    pub story_points: Option<f64>,
    /// Original estimate in working days, if estimated
    pub estimate_days: Option<f64>,
    /// Project the issue belongs to
    pub project: String,
    /// Planned start date
    pub start: Option<NaiveDate>,
    /// Due date
    pub due: Option<NaiveDate>,
    /// Legacy layout: original estimate in seconds
    pub estimate_secs: Option<i64>,
    /// Legacy layout: time spent in seconds
    pub spent_secs: Option<i64>,
}

impl Issue {
    /// Create a new issue with the given key
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            summary: key.clone(),
            key,
            status: IssueStatus::ToDo,
            assignee: None,
            role: None,
            story_points: None,
            estimate_days: None,
            project: String::new(),
            start: None,
            due: None,
            estimate_secs: None,
            spent_secs: None,
        }
    }

    /// Set the summary
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the status
    pub fn status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    /// Assign a resource
    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Set the role
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the story points
    pub fn story_points(mut self, points: f64) -> Self {
        self.story_points = Some(points);
        self
    }

    /// Set the original estimate in working days
    pub fn estimate_days(mut self, days: f64) -> Self {
        self.estimate_days = Some(days);
        self
    }

    /// Set the project
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// Set the planned start date
    pub fn start(mut self, date: NaiveDate) -> Self {
        self.start = Some(date);
        self
    }

    /// Set the due date
    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due = Some(date);
        self
    }

    /// Set the legacy estimate column (seconds)
    pub fn estimate_secs(mut self, secs: i64) -> Self {
        self.estimate_secs = Some(secs);
        self
    }

    /// Set the legacy time-spent column (seconds)
    pub fn spent_secs(mut self, secs: i64) -> Self {
        self.spent_secs = Some(secs);
        self
    }

    /// Legacy estimate column converted to hours
    pub fn estimate_hours_legacy(&self) -> Option<f64> {
        self.estimate_secs.map(|s| s as f64 / SECONDS_PER_HOUR)
    }

    /// Legacy time-spent column converted to hours
    pub fn spent_hours_legacy(&self) -> Option<f64> {
        self.spent_secs.map(|s| s as f64 / SECONDS_PER_HOUR)
    }

    /// Estimate in hours for the workbook layout (days at `workday_hours` each)
    pub fn estimate_hours(&self, workday_hours: f64) -> Option<f64> {
        self.estimate_days.map(|d| d * workday_hours)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// One row of the Skills table. A resource may appear multiple times with
/// different skills.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub resource: ResourceName,
    pub skill: String,
}

impl SkillEntry {
    pub fn new(resource: impl Into<String>, skill: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            skill: skill.into(),
        }
    }
}

// ============================================================================
// Worklogs
// ============================================================================

/// One row of the Worklogs table: hours a resource spent on a date,
/// optionally linked to an issue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorklogEntry {
    /// Issue the work was logged against, if linked
    pub issue: Option<IssueKey>,
    pub resource: ResourceName,
    pub date: NaiveDate,
    /// Hours spent, non-negative
    pub hours: f64,
}

impl WorklogEntry {
    pub fn new(resource: impl Into<String>, date: NaiveDate, hours: f64) -> Self {
        Self {
            issue: None,
            resource: resource.into(),
            date,
            hours,
        }
    }

    /// Construct from a seconds-based source column
    pub fn from_seconds(resource: impl Into<String>, date: NaiveDate, seconds: i64) -> Self {
        Self::new(resource, date, seconds as f64 / SECONDS_PER_HOUR)
    }

    /// Link the entry to an issue
    pub fn for_issue(mut self, key: impl Into<String>) -> Self {
        self.issue = Some(key.into());
        self
    }
}

// ============================================================================
// Non-Availability
// ============================================================================

/// Reason attached to a non-availability interval
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceReason {
    Meeting,
    Leave,
    Sick,
    UnplannedLeave,
    OutOfOffice,
}

impl AbsenceReason {
    /// Parse a reason cell. Returns `None` for labels outside the known set;
    /// callers skip such rows with a warning rather than failing the pass.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("meeting") {
            Some(AbsenceReason::Meeting)
        } else if trimmed.eq_ignore_ascii_case("leave") {
            Some(AbsenceReason::Leave)
        } else if trimmed.eq_ignore_ascii_case("sick") {
            Some(AbsenceReason::Sick)
        } else if trimmed.eq_ignore_ascii_case("unplanned leave") {
            Some(AbsenceReason::UnplannedLeave)
        } else if trimmed.eq_ignore_ascii_case("out of office") {
            Some(AbsenceReason::OutOfOffice)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AbsenceReason::Meeting => "Meeting",
            AbsenceReason::Leave => "Leave",
            AbsenceReason::Sick => "Sick",
            AbsenceReason::UnplannedLeave => "Unplanned Leave",
            AbsenceReason::OutOfOffice => "Out of Office",
        }
    }
}

impl std::fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A logged interval during which a resource cannot be assigned work.
///
/// Invariant: `end >= start`. The interval is not required to fall inside a
/// single day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Absence {
    pub resource: ResourceName,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub reason: AbsenceReason,
}

impl Absence {
    pub fn new(
        resource: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        reason: AbsenceReason,
    ) -> Self {
        Self {
            resource: resource.into(),
            start,
            end,
            reason,
        }
    }

    /// Duration in hours. Intervals violating the `end >= start` invariant
    /// contribute zero rather than negative hours.
    pub fn hours(&self) -> f64 {
        let secs = (self.end - self.start).num_seconds();
        if secs <= 0 {
            0.0
        } else {
            secs as f64 / SECONDS_PER_HOUR
        }
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// All four input tables of one computation pass.
///
/// Recreated from scratch on every pass and passed by reference into the
/// aggregation functions; no function reads ambient state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDataset {
    pub issues: Vec<Issue>,
    pub skills: Vec<SkillEntry>,
    pub worklogs: Vec<WorklogEntry>,
    pub absences: Vec<Absence>,
}

impl ProjectDataset {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
            && self.skills.is_empty()
            && self.worklogs.is_empty()
            && self.absences.is_empty()
    }

    /// Distinct assignees of the Issues table, sorted
    pub fn assignees(&self) -> Vec<ResourceName> {
        let mut names: Vec<ResourceName> = self
            .issues
            .iter()
            .filter_map(|i| i.assignee.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Every resource known to the dataset: assignees, worklog resources,
    /// skill-matrix resources and absence resources, sorted
    pub fn roster(&self) -> Vec<ResourceName> {
        let mut names: Vec<ResourceName> = self
            .issues
            .iter()
            .filter_map(|i| i.assignee.clone())
            .chain(self.worklogs.iter().map(|w| w.resource.clone()))
            .chain(self.skills.iter().map(|s| s.resource.clone()))
            .chain(self.absences.iter().map(|a| a.resource.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Issues assigned to one resource
    pub fn issues_for(&self, assignee: &str) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.assignee.as_deref() == Some(assignee))
            .collect()
    }

    /// Absences logged for one resource
    pub fn absences_for(&self, resource: &str) -> Vec<&Absence> {
        self.absences
            .iter()
            .filter(|a| a.resource == resource)
            .collect()
    }
}

// ============================================================================
// Capacity Configuration
// ============================================================================

/// Unit-conversion and capacity contract for one computation pass.
///
/// The contract is explicit per data source: legacy effort columns are
/// seconds (divided by 3600), the Worklogs sheet carries hours as-is, and
/// estimate-days convert at `workday_hours` per day. The sprint baseline is
/// always the configured value, never inferred from the data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Baseline capacity per resource per sprint, in hours
    pub sprint_hours: f64,
    /// Working hours per day, used to convert estimate-days
    pub workday_hours: f64,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            sprint_hours: 80.0, // 2-week sprint
            workday_hours: 8.0,
        }
    }
}

impl CapacityConfig {
    /// Override the sprint baseline
    pub fn sprint_hours(mut self, hours: f64) -> Self {
        self.sprint_hours = hours;
        self
    }

    /// Override the workday length
    pub fn workday_hours(mut self, hours: f64) -> Self {
        self.workday_hours = hours;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn datetime(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
        date(year, month, day).and_hms_opt(hour, min, 0).unwrap()
    }

    #[test]
    fn status_parse_known_labels() {
        assert_eq!(IssueStatus::parse("To Do"), IssueStatus::ToDo);
        assert_eq!(IssueStatus::parse("to do"), IssueStatus::ToDo);
        assert_eq!(IssueStatus::parse(" In Progress "), IssueStatus::InProgress);
        assert_eq!(IssueStatus::parse("DONE"), IssueStatus::Done);
        assert_eq!(IssueStatus::parse("Blocked"), IssueStatus::Blocked);
    }

    #[test]
    fn status_parse_keeps_unknown_labels() {
        assert_eq!(
            IssueStatus::parse("In Review"),
            IssueStatus::Other("In Review".to_string())
        );
        assert_eq!(IssueStatus::parse("In Review").to_string(), "In Review");
    }

    #[test]
    fn status_display_round_trip() {
        for status in [
            IssueStatus::ToDo,
            IssueStatus::InProgress,
            IssueStatus::Done,
            IssueStatus::Blocked,
        ] {
            assert_eq!(IssueStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn issue_builder() {
        let issue = Issue::new("PROJ-7")
            .summary("Implement login")
            .status(IssueStatus::InProgress)
            .assignee("alice")
            .role("Backend")
            .story_points(3.0)
            .estimate_days(2.0)
            .project("PROJ")
            .start(date(2026, 2, 2))
            .due(date(2026, 2, 6));

        assert_eq!(issue.key, "PROJ-7");
        assert_eq!(issue.summary, "Implement login");
        assert_eq!(issue.assignee.as_deref(), Some("alice"));
        assert_eq!(issue.story_points, Some(3.0));
        assert_eq!(issue.start, Some(date(2026, 2, 2)));
        assert_eq!(issue.due, Some(date(2026, 2, 6)));
    }

    #[test]
    fn issue_summary_defaults_to_key() {
        let issue = Issue::new("PROJ-9");
        assert_eq!(issue.summary, "PROJ-9");
    }

    #[test]
    fn legacy_seconds_convert_to_hours() {
        let issue = Issue::new("PROJ-1").estimate_secs(7200).spent_secs(3600);
        assert_eq!(issue.estimate_hours_legacy(), Some(2.0));
        assert_eq!(issue.spent_hours_legacy(), Some(1.0));

        let bare = Issue::new("PROJ-2");
        assert_eq!(bare.estimate_hours_legacy(), None);
        assert_eq!(bare.spent_hours_legacy(), None);
    }

    #[test]
    fn estimate_days_convert_at_workday_hours() {
        let issue = Issue::new("PROJ-1").estimate_days(2.5);
        assert_eq!(issue.estimate_hours(8.0), Some(20.0));
    }

    #[test]
    fn worklog_from_seconds() {
        let entry = WorklogEntry::from_seconds("alice", date(2026, 2, 2), 3600);
        assert_eq!(entry.hours, 1.0);
    }

    #[test]
    fn absence_reason_parse() {
        assert_eq!(AbsenceReason::parse("Leave"), Some(AbsenceReason::Leave));
        assert_eq!(
            AbsenceReason::parse("unplanned leave"),
            Some(AbsenceReason::UnplannedLeave)
        );
        assert_eq!(
            AbsenceReason::parse("Out of Office"),
            Some(AbsenceReason::OutOfOffice)
        );
        assert_eq!(AbsenceReason::parse("Vacation"), None);
    }

    #[test]
    fn absence_working_day_is_eight_hours() {
        let absence = Absence::new(
            "alice",
            datetime(2026, 2, 2, 9, 0),
            datetime(2026, 2, 2, 17, 0),
            AbsenceReason::Leave,
        );
        assert_eq!(absence.hours(), 8.0);
    }

    #[test]
    fn absence_inverted_interval_contributes_zero() {
        let absence = Absence::new(
            "alice",
            datetime(2026, 2, 2, 17, 0),
            datetime(2026, 2, 2, 9, 0),
            AbsenceReason::Meeting,
        );
        assert_eq!(absence.hours(), 0.0);
    }

    #[test]
    fn dataset_assignees_sorted_dedup() {
        let mut dataset = ProjectDataset::default();
        dataset.issues.push(Issue::new("A-1").assignee("carol"));
        dataset.issues.push(Issue::new("A-2").assignee("alice"));
        dataset.issues.push(Issue::new("A-3").assignee("carol"));
        dataset.issues.push(Issue::new("A-4")); // unassigned

        assert_eq!(
            dataset.assignees(),
            vec!["alice".to_string(), "carol".to_string()]
        );
    }

    #[test]
    fn dataset_roster_spans_all_tables() {
        let mut dataset = ProjectDataset::default();
        dataset.issues.push(Issue::new("A-1").assignee("alice"));
        dataset
            .worklogs
            .push(WorklogEntry::new("bob", date(2026, 2, 2), 4.0));
        dataset.skills.push(SkillEntry::new("carol", "Rust"));
        dataset.absences.push(Absence::new(
            "dave",
            datetime(2026, 2, 2, 9, 0),
            datetime(2026, 2, 2, 17, 0),
            AbsenceReason::Sick,
        ));

        assert_eq!(dataset.roster(), vec!["alice", "bob", "carol", "dave"]);
    }

    #[test]
    fn dataset_issues_for_assignee() {
        let mut dataset = ProjectDataset::default();
        dataset.issues.push(Issue::new("A-1").assignee("alice"));
        dataset.issues.push(Issue::new("A-2").assignee("bob"));
        dataset.issues.push(Issue::new("A-3").assignee("alice"));

        let alice = dataset.issues_for("alice");
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|i| i.assignee.as_deref() == Some("alice")));
    }

    #[test]
    fn capacity_defaults() {
        let config = CapacityConfig::default();
        assert_eq!(config.sprint_hours, 80.0);
        assert_eq!(config.workday_hours, 8.0);

        let custom = CapacityConfig::default().sprint_hours(60.0).workday_hours(6.0);
        assert_eq!(custom.sprint_hours, 60.0);
        assert_eq!(custom.workday_hours, 6.0);
    }
}
