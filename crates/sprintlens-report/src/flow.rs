//! Flow aggregator
//!
//! Bipartite flow counts between two categorical columns of the Issues
//! table, for flow-diagram rendering (status -> project, project -> status,
//! and friends).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sprintlens_core::{Derived, FlowLink, FlowTable, Issue};

/// Categorical columns a flow can run between
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowDimension {
    Status,
    Project,
    Assignee,
    Role,
}

impl FlowDimension {
    /// Label of one issue along this dimension; `None` when the issue has
    /// no value here (blank project, unassigned, no role)
    pub fn label(&self, issue: &Issue) -> Option<String> {
        match self {
            FlowDimension::Status => Some(issue.status.to_string()),
            FlowDimension::Project => {
                (!issue.project.is_empty()).then(|| issue.project.clone())
            }
            FlowDimension::Assignee => issue.assignee.clone(),
            FlowDimension::Role => issue.role.clone(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowDimension::Status => "Status",
            FlowDimension::Project => "Project",
            FlowDimension::Assignee => "Assignee",
            FlowDimension::Role => "Role",
        }
    }
}

impl std::fmt::Display for FlowDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Count issues per (source, target) label pair.
///
/// Links carry count > 0 only and appear in first-seen order, as does the
/// label list. Labels live in one shared space across both columns (see
/// `FlowTable`). Issues lacking a label on either side are skipped.
pub fn flow(issues: &[Issue], source: FlowDimension, target: FlowDimension) -> Derived<FlowTable> {
    let mut labels: Vec<String> = Vec::new();
    let mut pair_order: Vec<(String, String)> = Vec::new();
    let mut counts: HashMap<(String, String), usize> = HashMap::new();

    for issue in issues {
        let (Some(from), Some(to)) = (source.label(issue), target.label(issue)) else {
            continue;
        };
        if !labels.contains(&from) {
            labels.push(from.clone());
        }
        if !labels.contains(&to) {
            labels.push(to.clone());
        }
        let pair = (from, to);
        if !counts.contains_key(&pair) {
            pair_order.push(pair.clone());
        }
        *counts.entry(pair).or_insert(0) += 1;
    }

    if pair_order.is_empty() {
        return Derived::insufficient(format!(
            "no issues carry both a {source} and a {target} label"
        ));
    }

    let links = pair_order
        .into_iter()
        .map(|pair| {
            let count = counts[&pair];
            FlowLink { source: pair.0, target: pair.1, count }
        })
        .collect();
    Derived::Table(FlowTable { labels, links })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sprintlens_core::IssueStatus;

    fn issue(key: &str, status: IssueStatus, project: &str) -> Issue {
        Issue::new(key).status(status).project(project)
    }

    #[test]
    fn counts_by_status_and_project() {
        let issues = vec![
            issue("A-1", IssueStatus::Done, "X"),
            issue("A-2", IssueStatus::Done, "X"),
            issue("A-3", IssueStatus::Done, "X"),
            issue("A-4", IssueStatus::ToDo, "Y"),
            issue("A-5", IssueStatus::ToDo, "Y"),
        ];
        let table = flow(&issues, FlowDimension::Status, FlowDimension::Project)
            .into_table()
            .unwrap();

        assert_eq!(
            table.links,
            vec![
                FlowLink { source: "Done".into(), target: "X".into(), count: 3 },
                FlowLink { source: "To Do".into(), target: "Y".into(), count: 2 },
            ]
        );
        assert_eq!(table.labels, vec!["Done", "X", "To Do", "Y"]);
    }

    #[test]
    fn labels_collapse_across_columns() {
        // A project named like a status shares its node
        let issues = vec![issue("A-1", IssueStatus::Done, "Done")];
        let table = flow(&issues, FlowDimension::Status, FlowDimension::Project)
            .into_table()
            .unwrap();
        assert_eq!(table.labels, vec!["Done"]);
        assert_eq!(table.links.len(), 1);
    }

    #[test]
    fn issues_without_labels_are_skipped() {
        let issues = vec![
            issue("A-1", IssueStatus::Done, ""),
            Issue::new("A-2").status(IssueStatus::ToDo).project("X").assignee("alice"),
        ];
        let table = flow(&issues, FlowDimension::Assignee, FlowDimension::Project)
            .into_table()
            .unwrap();
        assert_eq!(table.links.len(), 1);
        assert_eq!(table.links[0].source, "alice");
    }

    #[test]
    fn reversed_dimensions_swap_sides() {
        let issues = vec![issue("A-1", IssueStatus::Done, "X")];
        let table = flow(&issues, FlowDimension::Project, FlowDimension::Status)
            .into_table()
            .unwrap();
        assert_eq!(table.links[0].source, "X");
        assert_eq!(table.links[0].target, "Done");
        assert_eq!(table.labels, vec!["X", "Done"]);
    }

    #[test]
    fn no_labeled_issues_is_insufficient() {
        let issues = vec![issue("A-1", IssueStatus::Done, "")];
        assert!(flow(&issues, FlowDimension::Status, FlowDimension::Project).is_insufficient());
        assert!(flow(&[], FlowDimension::Status, FlowDimension::Project).is_insufficient());
    }

    #[test]
    fn free_form_status_labels_flow_through() {
        let issues = vec![issue("A-1", IssueStatus::Other("In Review".into()), "X")];
        let table = flow(&issues, FlowDimension::Status, FlowDimension::Project)
            .into_table()
            .unwrap();
        assert_eq!(table.links[0].source, "In Review");
    }
}
