//! Question-answering context
//!
//! Flattens the derived tables into one text block for the external
//! completion service: the utilization table, a per-resource
//! non-availability summary, and a bounded excerpt of the raw issues. The
//! caller concatenates the user's question; this crate neither calls the
//! service nor interprets its response.

use std::collections::BTreeMap;

use sprintlens_core::ProjectDataset;
use sprintlens_report::Dashboard;

use crate::brief::utilization_block;
use crate::table::hours;

/// Build the flattened context block. At most `max_issues` issues are
/// excerpted; the heading says how many were held back.
pub fn insight_context(
    dataset: &ProjectDataset,
    dashboard: &Dashboard,
    max_issues: usize,
) -> String {
    let mut out = String::from("UTILIZATION\n");
    out.push_str(&utilization_block(dashboard));

    out.push_str("\nNON-AVAILABILITY\n");
    if dataset.absences.is_empty() {
        out.push_str("none logged\n");
    } else {
        // resource -> (total hours, reasons in first-seen order)
        let mut summary: BTreeMap<String, (f64, Vec<String>)> = BTreeMap::new();
        for absence in &dataset.absences {
            let entry = summary
                .entry(absence.resource.clone())
                .or_insert((0.0, Vec::new()));
            entry.0 += absence.hours();
            let reason = absence.reason.to_string();
            if !entry.1.contains(&reason) {
                entry.1.push(reason);
            }
        }
        for (resource, (total, reasons)) in summary {
            out.push_str(&format!(
                "{resource}: {} h ({})\n",
                hours(total),
                reasons.join(", ")
            ));
        }
    }

    if dataset.issues.is_empty() {
        out.push_str("\nISSUES\nnone loaded\n");
    } else {
        let shown = dataset.issues.len().min(max_issues);
        if shown < dataset.issues.len() {
            out.push_str(&format!(
                "\nISSUES (first {shown} of {})\n",
                dataset.issues.len()
            ));
        } else {
            out.push_str(&format!("\nISSUES ({shown})\n"));
        }
        for issue in dataset.issues.iter().take(max_issues) {
            out.push_str(&format!(
                "{} | {} | {} | {} | due {}\n",
                issue.key,
                issue.summary,
                issue.status,
                issue.assignee.as_deref().unwrap_or("unassigned"),
                issue
                    .due
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            ));
        }
    }

    out
}
