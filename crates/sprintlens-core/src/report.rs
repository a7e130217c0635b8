//! Derived report tables
//!
//! This module provides the types produced by the aggregation functions in
//! `sprintlens-report`. Derived tables are ephemeral: they are recomputed
//! from a `ProjectDataset` on every pass and never persisted.
//!
//! # Core Concepts
//!
//! - **Derived**: every aggregator returns either a populated table or an
//!   explicit insufficient-data marker; callers inspect the outcome instead
//!   of catching exceptions
//! - **HealthTier**: Green, Amber or Red classification per assignee
//!
//! # Example
//!
//! ```rust
//! use sprintlens_core::report::{HealthStatus, HealthTier};
//!
//! let status = HealthStatus::new("alice", 4, 1);
//! assert_eq!(status.tier, HealthTier::Amber);
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// Outcome Marker
// ============================================================================

/// Outcome of one aggregation: a populated table, or an explicit reason the
/// table could not be built (empty input, no parseable dates, ...).
///
/// Degenerate inputs are reported here, never as a panic or an `Err` that
/// would abort the rest of the pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Derived<T> {
    /// The table was computed
    Table(T),
    /// The table could not be built from this input; the reason is shown
    /// to the user in place of the view
    Insufficient(String),
}

impl<T> Derived<T> {
    /// Shorthand for the insufficient marker
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Derived::Insufficient(reason.into())
    }

    pub fn table(&self) -> Option<&T> {
        match self {
            Derived::Table(t) => Some(t),
            Derived::Insufficient(_) => None,
        }
    }

    pub fn into_table(self) -> Option<T> {
        match self {
            Derived::Table(t) => Some(t),
            Derived::Insufficient(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Derived::Table(_) => None,
            Derived::Insufficient(reason) => Some(reason),
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Derived::Insufficient(_))
    }
}

// ============================================================================
// Utilization
// ============================================================================

/// Per-assignee effort totals and utilization ratio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UtilizationRow {
    pub assignee: String,
    pub estimated_hours: f64,
    pub spent_hours: f64,
    /// spent / estimated x 100, rounded to 1 decimal; `None` when the
    /// estimate sum is zero (rendered "N/A", never a division by zero)
    pub utilization_pct: Option<f64>,
}

impl UtilizationRow {
    /// Build a row from raw sums, applying the rounding and N/A rules.
    pub fn compute(assignee: impl Into<String>, estimated_hours: f64, spent_hours: f64) -> Self {
        let utilization_pct = if estimated_hours > 0.0 {
            Some(round1(spent_hours / estimated_hours * 100.0))
        } else {
            None
        };
        Self {
            assignee: assignee.into(),
            estimated_hours,
            spent_hours,
            utilization_pct,
        }
    }

    /// Percentage formatted for display, "N/A" for an undefined ratio
    pub fn pct_display(&self) -> String {
        match self.utilization_pct {
            Some(pct) => format!("{:.1}", pct),
            None => "N/A".to_string(),
        }
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// Availability
// ============================================================================

/// Net capacity per resource for one sprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub resource: String,
    /// Sum of logged non-availability, in hours
    pub absence_hours: f64,
    /// Sprint baseline minus absence hours
    pub available_hours: f64,
}

/// Estimated workload against net capacity. `overallocated` is a boolean,
/// not a percentage: estimated hours strictly exceed available hours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverallocationRow {
    pub assignee: String,
    pub estimated_hours: f64,
    pub available_hours: f64,
    pub overallocated: bool,
}

// ============================================================================
// Health
// ============================================================================

/// Per-assignee health signal derived from the overdue-task ratio
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthTier {
    /// No overdue tasks
    Green,
    /// Fewer than half the tasks are overdue
    Amber,
    /// Half or more of the tasks are overdue
    Red,
}

impl HealthTier {
    /// Classify an overdue count against a task total.
    ///
    /// Exactly 50% overdue is Red, not Amber (strict less-than for Amber).
    /// An assignee with no tasks at all is Green.
    pub fn classify(overdue_tasks: usize, total_tasks: usize) -> Self {
        if overdue_tasks == 0 {
            HealthTier::Green
        } else if (overdue_tasks as f64) < 0.5 * total_tasks as f64 {
            HealthTier::Amber
        } else {
            HealthTier::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthTier::Green => "Green",
            HealthTier::Amber => "Amber",
            HealthTier::Red => "Red",
        }
    }
}

impl std::fmt::Display for HealthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task counts and health tier for one assignee
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub assignee: String,
    pub total_tasks: usize,
    pub overdue_tasks: usize,
    pub tier: HealthTier,
}

impl HealthStatus {
    pub fn new(assignee: impl Into<String>, total_tasks: usize, overdue_tasks: usize) -> Self {
        Self {
            assignee: assignee.into(),
            total_tasks,
            overdue_tasks,
            tier: HealthTier::classify(overdue_tasks, total_tasks),
        }
    }
}

// ============================================================================
// Time Series
// ============================================================================

/// One date of a burnup series
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BurnupPoint {
    pub date: NaiveDate,
    /// Story points of Done issues due on or before this date
    pub completed: f64,
}

/// Cumulative completed scope over the project date range, against a
/// constant total scope. `completed` is non-decreasing by construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BurnupSeries {
    pub points: Vec<BurnupPoint>,
    /// Sum of story points across all issues in scope
    pub total_scope: f64,
}

impl BurnupSeries {
    /// Completed value at the end of the range
    pub fn final_completed(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.completed)
    }
}

/// Grouping period for worklog pivots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodBucket {
    /// One column per calendar day
    Daily,
    /// One column per ISO week
    Weekly,
}

impl PeriodBucket {
    /// Bucket key for a date: "2026-02-05" for daily, "2026-W06" for weekly
    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            PeriodBucket::Daily => date.format("%Y-%m-%d").to_string(),
            PeriodBucket::Weekly => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
        }
    }
}

/// Resource x period matrix of summed worklog hours; missing cells are 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorklogPivot {
    /// Row labels, sorted
    pub resources: Vec<String>,
    /// Column labels, sorted chronologically (the keys sort lexically)
    pub periods: Vec<String>,
    /// hours[resource_index][period_index]
    pub hours: Vec<Vec<f64>>,
}

impl WorklogPivot {
    /// Hours for one (resource, period) cell; 0 for unknown labels
    pub fn get(&self, resource: &str, period: &str) -> f64 {
        let row = self.resources.iter().position(|r| r == resource);
        let col = self.periods.iter().position(|p| p == period);
        match (row, col) {
            (Some(r), Some(c)) => self.hours[r][c],
            _ => 0.0,
        }
    }

    /// Sum over all cells
    pub fn total(&self) -> f64 {
        self.hours.iter().flatten().sum()
    }
}

// ============================================================================
// Flow
// ============================================================================

/// One edge of a bipartite flow: `count` issues share this (source, target)
/// label pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowLink {
    pub source: String,
    pub target: String,
    pub count: usize,
}

/// Flow counts between two categorical dimensions.
///
/// `labels` is the deduplicated first-seen list across both columns. Source
/// and target share one label space: a label appearing as both a status and
/// a project name collapses to a single node. Known collision risk, kept
/// as-is so the flow diagram matches the source data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTable {
    pub labels: Vec<String>,
    /// Pairs with count > 0 only, in first-seen order
    pub links: Vec<FlowLink>,
}

// ============================================================================
// Skills
// ============================================================================

/// Deduplicated skills of one resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRow {
    pub resource: String,
    pub skills: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================
