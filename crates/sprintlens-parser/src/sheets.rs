//! Per-sheet readers
//!
//! Each reader validates its required columns once against the header row,
//! then converts records to typed domain rows. Required columns absent →
//! `SchemaError` and the pass halts. Individual bad cells become "unknown"
//! (`None`); rows missing their identity or violating an invariant are
//! skipped with a warning and never abort the pass.

use std::collections::HashSet;
use std::io::Read;

use csv::StringRecord;
use sprintlens_core::{
    Absence, AbsenceReason, Issue, IssueStatus, SkillEntry, WorklogEntry,
};
use tracing::warn;

use crate::dates::{parse_date, parse_datetime, parse_number};
use crate::{LoadError, SchemaError};

const ISSUES_REQUIRED: [&str; 9] = [
    "Key",
    "Summary",
    "Status",
    "Assignee",
    "Project",
    "Story Points",
    "Original Estimate (days)",
    "Start Date",
    "Due Date",
];
const SKILLS_REQUIRED: [&str; 2] = ["Resource", "Skill"];
const WORKLOGS_REQUIRED: [&str; 4] = ["Issue", "Resource", "Date", "Hours"];
const ABSENCES_REQUIRED: [&str; 4] = ["Resource", "Start", "End", "Reason"];

/// Column lookup is trimmed and case-insensitive; the template annotates
/// header cells, so spreadsheets edited by hand drift in casing.
fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn require_columns(
    sheet: &str,
    headers: &StringRecord,
    required: &[&str],
) -> Result<(), SchemaError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| column(headers, name).is_none())
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns {
            sheet: sheet.to_string(),
            columns: missing,
        })
    }
}

fn field<'r>(record: &'r StringRecord, index: Option<usize>) -> &'r str {
    index.and_then(|i| record.get(i)).unwrap_or("")
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input)
}

/// Read the Issues sheet.
///
/// Duplicate keys violate the uniqueness invariant; the first occurrence
/// wins and later ones are skipped with a warning.
pub fn read_issues<R: Read>(input: R) -> Result<Vec<Issue>, LoadError> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    require_columns("Issues", &headers, &ISSUES_REQUIRED)?;

    let key_col = column(&headers, "Key");
    let summary_col = column(&headers, "Summary");
    let status_col = column(&headers, "Status");
    let assignee_col = column(&headers, "Assignee");
    let role_col = column(&headers, "Role");
    let points_col = column(&headers, "Story Points");
    let estimate_col = column(&headers, "Original Estimate (days)");
    let project_col = column(&headers, "Project");
    let start_col = column(&headers, "Start Date");
    let due_col = column(&headers, "Due Date");
    // Legacy layout only; absent in template workbooks
    let estimate_secs_col = column(&headers, "Original Estimate (seconds)");
    let spent_secs_col = column(&headers, "Time Spent (seconds)");

    let mut issues = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for result in rdr.records() {
        let record = result?;
        let key = field(&record, key_col);
        if key.is_empty() {
            warn!("Issues: skipping row without a key");
            continue;
        }
        if !seen.insert(key.to_string()) {
            warn!(key, "Issues: duplicate key, keeping first occurrence");
            continue;
        }

        let mut issue = Issue::new(key)
            .status(IssueStatus::parse(field(&record, status_col)))
            .project(field(&record, project_col));

        let summary = field(&record, summary_col);
        if !summary.is_empty() {
            issue = issue.summary(summary);
        }
        let assignee = field(&record, assignee_col);
        if !assignee.is_empty() {
            issue = issue.assignee(assignee);
        }
        let role = field(&record, role_col);
        if !role.is_empty() {
            issue = issue.role(role);
        }

        issue.story_points = parse_number(field(&record, points_col));
        issue.estimate_days = parse_number(field(&record, estimate_col));
        issue.start = parse_date(field(&record, start_col));
        issue.due = parse_date(field(&record, due_col));
        issue.estimate_secs = parse_number(field(&record, estimate_secs_col)).map(|v| v as i64);
        issue.spent_secs = parse_number(field(&record, spent_secs_col)).map(|v| v as i64);

        issues.push(issue);
    }

    Ok(issues)
}

/// Read the Skills sheet. Rows missing the resource or the skill label
/// carry no information and are skipped.
pub fn read_skills<R: Read>(input: R) -> Result<Vec<SkillEntry>, LoadError> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    require_columns("Skills", &headers, &SKILLS_REQUIRED)?;

    let resource_col = column(&headers, "Resource");
    let skill_col = column(&headers, "Skill");

    let mut skills = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let resource = field(&record, resource_col);
        let skill = field(&record, skill_col);
        if resource.is_empty() || skill.is_empty() {
            warn!("Skills: skipping incomplete row");
            continue;
        }
        skills.push(SkillEntry::new(resource, skill));
    }
    Ok(skills)
}

/// Read the Worklogs sheet. Hours are already hours in this layout (the
/// seconds unit exists only in the legacy per-issue columns). Rows without
/// a resource, a parseable date or non-negative hours are skipped.
pub fn read_worklogs<R: Read>(input: R) -> Result<Vec<WorklogEntry>, LoadError> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    require_columns("Worklogs", &headers, &WORKLOGS_REQUIRED)?;

    let issue_col = column(&headers, "Issue");
    let resource_col = column(&headers, "Resource");
    let date_col = column(&headers, "Date");
    let hours_col = column(&headers, "Hours");

    let mut worklogs = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let resource = field(&record, resource_col);
        if resource.is_empty() {
            warn!("Worklogs: skipping row without a resource");
            continue;
        }
        let Some(date) = parse_date(field(&record, date_col)) else {
            warn!(resource, "Worklogs: skipping row with unparseable date");
            continue;
        };
        let Some(hours) = parse_number(field(&record, hours_col)) else {
            warn!(resource, "Worklogs: skipping row with unparseable hours");
            continue;
        };
        if hours < 0.0 {
            warn!(resource, hours, "Worklogs: skipping row with negative hours");
            continue;
        }

        let mut entry = WorklogEntry::new(resource, date, hours);
        let issue = field(&record, issue_col);
        if !issue.is_empty() {
            entry = entry.for_issue(issue);
        }
        worklogs.push(entry);
    }
    Ok(worklogs)
}

/// Read the Non_Availability sheet. Rows with unparseable timestamps, an
/// unknown reason, or `end < start` are skipped.
pub fn read_absences<R: Read>(input: R) -> Result<Vec<Absence>, LoadError> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    require_columns("Non_Availability", &headers, &ABSENCES_REQUIRED)?;

    let resource_col = column(&headers, "Resource");
    let start_col = column(&headers, "Start");
    let end_col = column(&headers, "End");
    let reason_col = column(&headers, "Reason");

    let mut absences = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let resource = field(&record, resource_col);
        if resource.is_empty() {
            warn!("Non_Availability: skipping row without a resource");
            continue;
        }
        let (Some(start), Some(end)) = (
            parse_datetime(field(&record, start_col)),
            parse_datetime(field(&record, end_col)),
        ) else {
            warn!(resource, "Non_Availability: skipping row with unparseable interval");
            continue;
        };
        if end < start {
            warn!(resource, "Non_Availability: skipping row with end before start");
            continue;
        }
        let Some(reason) = AbsenceReason::parse(field(&record, reason_col)) else {
            warn!(
                resource,
                reason = field(&record, reason_col),
                "Non_Availability: skipping row with unknown reason"
            );
            continue;
        };
        absences.push(Absence::new(resource, start, end, reason));
    }
    Ok(absences)
}
