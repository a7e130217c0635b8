//! Status brief
//!
//! The plain-text serialization of one dashboard pass: every derived table
//! in reading order, with explicit "insufficient data" lines where an
//! aggregator degraded.

use sprintlens_core::{Derived, IssueKey};
use sprintlens_report::Dashboard;

use crate::views;

/// Render the full status brief for one pass.
pub fn render_brief(dashboard: &Dashboard) -> String {
    let mut out = format!("SPRINT STATUS BRIEF  (as of {})\n", dashboard.as_of);

    section(&mut out, "Utilization");
    out.push_str(&utilization_block(dashboard));

    section(&mut out, "Availability");
    if dashboard.availability.is_empty() {
        out.push_str("no resources in the dataset\n");
    } else {
        out.push_str(&views::availability_table(&dashboard.availability));
        out.push('\n');
    }

    section(&mut out, "Overallocation");
    if dashboard.overallocation.is_empty() {
        out.push_str("no utilization rows to compare against capacity\n");
    } else {
        out.push_str(&views::overallocation_table(&dashboard.overallocation));
        out.push('\n');
    }

    section(&mut out, "Health");
    if dashboard.health.is_empty() {
        out.push_str("no assigned issues\n");
    } else {
        out.push_str(&views::health_table(&dashboard.health));
        out.push('\n');
    }

    section(&mut out, "Task risks");
    risk_line(&mut out, "overdue", &dashboard.overdue);
    risk_line(&mut out, "due soon", &dashboard.due_soon);
    risk_line(&mut out, "stuck", &dashboard.stuck);
    risk_line(&mut out, "unassigned", &dashboard.unassigned);
    risk_line(&mut out, "missing estimate", &dashboard.missing_estimate);

    section(&mut out, "Burnup");
    match &dashboard.burnup {
        Derived::Table(series) => {
            out.push_str(&views::burnup_summary(series));
            out.push('\n');
        }
        Derived::Insufficient(reason) => {
            out.push_str(&format!("insufficient data: {reason}\n"));
        }
    }

    out
}

/// The utilization table alone; shared with the Q&A context.
pub(crate) fn utilization_block(dashboard: &Dashboard) -> String {
    match &dashboard.utilization {
        Derived::Table(rows) => {
            let mut block = views::utilization_table(rows);
            block.push('\n');
            block
        }
        Derived::Insufficient(reason) => format!("insufficient data: {reason}\n"),
    }
}

fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.len()));
    out.push('\n');
}

fn risk_line(out: &mut String, label: &str, keys: &[IssueKey]) {
    if keys.is_empty() {
        out.push_str(&format!("{label}: none\n"));
    } else {
        out.push_str(&format!("{label} ({}): {}\n", keys.len(), keys.join(", ")));
    }
}
