//! Skill matrix
//!
//! Folds the many-to-many Skills sheet into one row per resource, for the
//! resource-planner view and for roster lookups.

use sprintlens_core::{SkillEntry, SkillRow};

/// One row per resource in first-seen order, each with its deduplicated
/// skills in first-seen order.
pub fn skill_matrix(skills: &[SkillEntry]) -> Vec<SkillRow> {
    let mut rows: Vec<SkillRow> = Vec::new();
    for entry in skills {
        match rows.iter_mut().find(|r| r.resource == entry.resource) {
            Some(row) => {
                if !row.skills.contains(&entry.skill) {
                    row.skills.push(entry.skill.clone());
                }
            }
            None => rows.push(SkillRow {
                resource: entry.resource.clone(),
                skills: vec![entry.skill.clone()],
            }),
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn groups_skills_per_resource() {
        let skills = vec![
            SkillEntry::new("alice", "Rust"),
            SkillEntry::new("bob", "Python"),
            SkillEntry::new("alice", "SQL"),
            SkillEntry::new("alice", "Rust"), // duplicate
        ];
        let rows = skill_matrix(&skills);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].resource, "alice");
        assert_eq!(rows[0].skills, vec!["Rust", "SQL"]);
        assert_eq!(rows[1].resource, "bob");
        assert_eq!(rows[1].skills, vec!["Python"]);
    }

    #[test]
    fn empty_sheet_is_an_empty_matrix() {
        assert_eq!(skill_matrix(&[]), Vec::new());
    }
}
