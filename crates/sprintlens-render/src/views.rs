//! Per-table text renderers
//!
//! One function per derived table, shared by the status brief and the CLI's
//! single-view output.

use sprintlens_core::{
    AvailabilityRow, BurnupSeries, FlowTable, HealthStatus, OverallocationRow, SkillRow,
    UtilizationRow, WorklogPivot,
};

use crate::table::{hours, TextTable};

pub fn utilization_table(rows: &[UtilizationRow]) -> String {
    let mut table = TextTable::new(&["Assignee", "Estimated (h)", "Spent (h)", "Utilization (%)"]);
    for row in rows {
        table.row(vec![
            row.assignee.clone(),
            hours(row.estimated_hours),
            hours(row.spent_hours),
            row.pct_display(),
        ]);
    }
    table.render()
}

pub fn availability_table(rows: &[AvailabilityRow]) -> String {
    let mut table = TextTable::new(&["Resource", "Absence (h)", "Available (h)"]);
    for row in rows {
        table.row(vec![
            row.resource.clone(),
            hours(row.absence_hours),
            hours(row.available_hours),
        ]);
    }
    table.render()
}

pub fn overallocation_table(rows: &[OverallocationRow]) -> String {
    let mut table =
        TextTable::new(&["Assignee", "Estimated (h)", "Available (h)", "Overallocated"]);
    for row in rows {
        table.row(vec![
            row.assignee.clone(),
            hours(row.estimated_hours),
            hours(row.available_hours),
            if row.overallocated { "yes" } else { "no" }.to_string(),
        ]);
    }
    table.render()
}

pub fn health_table(rows: &[HealthStatus]) -> String {
    let mut table = TextTable::new(&["Assignee", "Tasks", "Overdue", "Tier"]);
    for status in rows {
        table.row(vec![
            status.assignee.clone(),
            status.total_tasks.to_string(),
            status.overdue_tasks.to_string(),
            status.tier.to_string(),
        ]);
    }
    table.render()
}

/// Resource x period matrix; one column per period key
pub fn pivot_table(pivot: &WorklogPivot) -> String {
    let mut headers: Vec<&str> = vec!["Resource"];
    headers.extend(pivot.periods.iter().map(String::as_str));
    let mut table = TextTable::new(&headers);
    for (i, resource) in pivot.resources.iter().enumerate() {
        let mut cells = vec![resource.clone()];
        cells.extend(pivot.hours[i].iter().map(|h| hours(*h)));
        table.row(cells);
    }
    table.render()
}

/// Links plus the shared label space, in first-seen order
pub fn flow_table(flow: &FlowTable) -> String {
    let mut table = TextTable::new(&["Source", "Target", "Count"]);
    for link in &flow.links {
        table.row(vec![
            link.source.clone(),
            link.target.clone(),
            link.count.to_string(),
        ]);
    }
    let mut out = table.render();
    out.push_str("\n\nlabels: ");
    out.push_str(&flow.labels.join(", "));
    out
}

pub fn skills_table(rows: &[SkillRow]) -> String {
    let mut table = TextTable::new(&["Resource", "Skills"]);
    for row in rows {
        table.row(vec![row.resource.clone(), row.skills.join(", ")]);
    }
    table.render()
}

/// One-line burnup summary for the brief
pub fn burnup_summary(series: &BurnupSeries) -> String {
    match (series.points.first(), series.points.last()) {
        (Some(first), Some(last)) => format!(
            "completed {} of {} story points between {} and {}",
            series.final_completed(),
            series.total_scope,
            first.date,
            last.date,
        ),
        _ => format!("completed 0 of {} story points", series.total_scope),
    }
}

/// Full burnup series, one row per date
pub fn burnup_table(series: &BurnupSeries) -> String {
    let mut table = TextTable::new(&["Date", "Completed", "Total scope"]);
    for point in &series.points {
        table.row(vec![
            point.date.to_string(),
            point.completed.to_string(),
            series.total_scope.to_string(),
        ]);
    }
    table.render()
}
