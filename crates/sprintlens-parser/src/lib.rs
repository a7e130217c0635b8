//! # sprintlens-parser
//!
//! Workbook loading and schema validation for sprintlens.
//!
//! A workbook is a directory holding one CSV file per sheet; the sheet name
//! is the file stem. The four required sheets are `Issues`, `Skills`,
//! `Worklogs` and `Non_Availability`. Loading validates the sheet set and the
//! required columns of each sheet once, then produces typed rows; individual
//! malformed values become "unknown" (or the row is skipped with a warning)
//! and never abort the pass.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sprintlens_parser::load_workbook;
//!
//! let dataset = load_workbook(std::path::Path::new("./workbook"))?;
//! println!("{} issues", dataset.issues.len());
//! # Ok::<(), sprintlens_parser::LoadError>(())
//! ```

pub mod dates;
pub mod sheets;
pub mod store;

pub use dates::{parse_date, parse_datetime, parse_number};
pub use store::AbsenceStore;

use std::path::Path;

use sprintlens_core::ProjectDataset;
use thiserror::Error;

/// Sheets a workbook must provide
pub const REQUIRED_SHEETS: [&str; 4] = ["Issues", "Skills", "Worklogs", "Non_Availability"];

/// Schema error: a required sheet or column is absent. The pass halts with
/// the missing names surfaced; no partial dataset is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("workbook is missing required sheets: {}", missing.join(", "))]
    MissingSheets { missing: Vec<String> },

    #[error("sheet '{sheet}' is missing required columns: {}", columns.join(", "))]
    MissingColumns { sheet: String, columns: Vec<String> },
}

/// Workbook loading error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Subset of the required sheets absent from `present`, in required order.
/// Empty means the workbook passes the sheet check.
pub fn missing_sheets(present: &[String]) -> Vec<&'static str> {
    REQUIRED_SHEETS
        .iter()
        .filter(|required| !present.iter().any(|p| p == *required))
        .copied()
        .collect()
}

/// Sheet names found in a workbook directory (CSV file stems)
pub fn sheet_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Check the sheet set of a workbook directory without loading rows
pub fn validate_workbook(dir: &Path) -> Result<(), LoadError> {
    let present = sheet_names(dir)?;
    let missing = missing_sheets(&present);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingSheets {
            missing: missing.iter().map(|s| s.to_string()).collect(),
        }
        .into())
    }
}

/// Load a workbook directory into a fresh `ProjectDataset`.
///
/// Validates the sheet set first (schema errors carry all missing names at
/// once), then loads each sheet with its own column validation.
pub fn load_workbook(dir: &Path) -> Result<ProjectDataset, LoadError> {
    validate_workbook(dir)?;

    tracing::debug!(dir = %dir.display(), "loading workbook");

    let issues = sheets::read_issues(open_sheet(dir, "Issues")?)?;
    let skills = sheets::read_skills(open_sheet(dir, "Skills")?)?;
    let worklogs = sheets::read_worklogs(open_sheet(dir, "Worklogs")?)?;
    let absences = sheets::read_absences(open_sheet(dir, "Non_Availability")?)?;

    Ok(ProjectDataset {
        issues,
        skills,
        worklogs,
        absences,
    })
}

fn open_sheet(dir: &Path, name: &str) -> Result<std::fs::File, LoadError> {
    Ok(std::fs::File::open(dir.join(format!("{name}.csv")))?)
}
