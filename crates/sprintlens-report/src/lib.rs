//! # sprintlens-report
//!
//! Pure aggregation functions over a `ProjectDataset`.
//!
//! This crate provides:
//! - Utilization per assignee (both effort layouts)
//! - Availability and overallocation against a sprint baseline
//! - Task health classifiers and per-assignee health tiers
//! - Burnup series and worklog pivots
//! - Flow counts between categorical dimensions
//! - The skill matrix
//!
//! Every function takes the dataset (or a slice of it) and an explicit
//! evaluation date where one is needed; none reads ambient state. Degenerate
//! inputs come back as `Derived::Insufficient`, never as a panic.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sprintlens_core::{CapacityConfig, ProjectDataset};
//! use sprintlens_report::Dashboard;
//!
//! let dataset = ProjectDataset::default();
//! let as_of = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
//! let dashboard = Dashboard::compute(&dataset, &CapacityConfig::default(), as_of);
//! assert!(dashboard.utilization.is_insufficient());
//! ```

pub mod availability;
pub mod flow;
pub mod health;
pub mod skills;
pub mod timeseries;
pub mod utilization;

pub use availability::{availability, overallocation};
pub use flow::{flow, FlowDimension};
pub use health::{
    due_soon, health_by_assignee, missing_estimate, overdue, stuck, unassigned,
};
pub use skills::skill_matrix;
pub use timeseries::{burnup, burnup_for_assignee, worklog_pivot};
pub use utilization::{
    has_legacy_effort, utilization_from_issue_columns, utilization_from_worklogs,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sprintlens_core::{
    AvailabilityRow, BurnupSeries, CapacityConfig, Derived, HealthStatus, IssueKey,
    OverallocationRow, ProjectDataset, UtilizationRow,
};

/// All derived tables of one computation pass, recomputed from scratch on
/// every call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Evaluation date of the pass
    pub as_of: NaiveDate,
    pub utilization: Derived<Vec<UtilizationRow>>,
    pub availability: Vec<AvailabilityRow>,
    pub overallocation: Vec<OverallocationRow>,
    pub health: Vec<HealthStatus>,
    pub burnup: Derived<BurnupSeries>,
    pub overdue: Vec<IssueKey>,
    pub due_soon: Vec<IssueKey>,
    pub stuck: Vec<IssueKey>,
    pub unassigned: Vec<IssueKey>,
    pub missing_estimate: Vec<IssueKey>,
}

impl Dashboard {
    /// Compute the full dashboard.
    ///
    /// The effort layout is chosen per dataset: if any issue carries the
    /// legacy seconds columns the legacy layout is used, otherwise effort
    /// comes from the Worklogs sheet. The two layouts are never mixed in
    /// one pass.
    pub fn compute(dataset: &ProjectDataset, config: &CapacityConfig, as_of: NaiveDate) -> Self {
        tracing::debug!(%as_of, issues = dataset.issues.len(), "computing dashboard");

        let utilization = if has_legacy_effort(&dataset.issues) {
            utilization_from_issue_columns(&dataset.issues)
        } else {
            utilization_from_worklogs(&dataset.issues, &dataset.worklogs, config)
        };

        let availability = availability::availability(dataset, config);
        let overallocation = utilization
            .table()
            .map(|rows| availability::overallocation(rows, &availability, config))
            .unwrap_or_default();

        let keys = |issues: Vec<&sprintlens_core::Issue>| -> Vec<IssueKey> {
            issues.into_iter().map(|i| i.key.clone()).collect()
        };

        Self {
            as_of,
            availability,
            overallocation,
            health: health_by_assignee(&dataset.issues, as_of),
            burnup: burnup(&dataset.issues),
            overdue: keys(overdue(&dataset.issues, as_of)),
            due_soon: keys(due_soon(&dataset.issues, as_of)),
            stuck: keys(stuck(&dataset.issues, as_of)),
            unassigned: keys(unassigned(&dataset.issues)),
            missing_estimate: keys(missing_estimate(&dataset.issues)),
            utilization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sprintlens_core::{Issue, IssueStatus, WorklogEntry};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn dashboard_prefers_legacy_layout_when_seconds_present() {
        let mut dataset = ProjectDataset::default();
        dataset.issues.push(
            Issue::new("A-1")
                .assignee("alice")
                .estimate_secs(72_000)
                .spent_secs(36_000),
        );
        // A worklog that must NOT be mixed into the legacy pass
        dataset
            .worklogs
            .push(WorklogEntry::new("alice", date(2026, 2, 2), 100.0));

        let dashboard =
            Dashboard::compute(&dataset, &CapacityConfig::default(), date(2026, 2, 9));
        let rows = dashboard.utilization.table().unwrap();
        assert_eq!(rows[0].estimated_hours, 20.0);
        assert_eq!(rows[0].spent_hours, 10.0);
        assert_eq!(rows[0].utilization_pct, Some(50.0));
    }

    #[test]
    fn dashboard_empty_dataset_degrades_everywhere() {
        let dashboard = Dashboard::compute(
            &ProjectDataset::default(),
            &CapacityConfig::default(),
            date(2026, 2, 9),
        );
        assert!(dashboard.utilization.is_insufficient());
        assert!(dashboard.burnup.is_insufficient());
        assert_eq!(dashboard.health, Vec::new());
        assert_eq!(dashboard.overallocation, Vec::new());
    }

    #[test]
    fn dashboard_risk_lists_are_issue_keys() {
        let mut dataset = ProjectDataset::default();
        dataset.issues.push(
            Issue::new("A-1")
                .assignee("alice")
                .status(IssueStatus::ToDo)
                .estimate_days(1.0)
                .story_points(5.0)
                .due(date(2026, 2, 8)),
        );
        dataset.issues.push(Issue::new("A-2").project("PROJ"));

        let dashboard =
            Dashboard::compute(&dataset, &CapacityConfig::default(), date(2026, 2, 9));
        assert_eq!(dashboard.overdue, vec!["A-1".to_string()]);
        assert_eq!(dashboard.unassigned, vec!["A-2".to_string()]);
        assert_eq!(dashboard.missing_estimate, vec!["A-2".to_string()]);
    }
}
