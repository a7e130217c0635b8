//! Per-resource non-availability store
//!
//! One flat CSV file per resource (`<resource>.csv`, columns
//! Start/End/Reason), appended-to on explicit save and never rewritten or
//! deleted by this crate. Concurrent writers to the same file are not
//! coordinated (last-write-wins); the intended deployment is
//! single-user-at-a-time.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use sprintlens_core::{Absence, AbsenceReason};
use thiserror::Error;
use tracing::warn;

use crate::dates::parse_datetime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const HEADER: &str = "Start,End,Reason";

/// Store error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only store of non-availability intervals, one file per resource.
#[derive(Clone, Debug)]
pub struct AbsenceStore {
    root: PathBuf,
}

impl AbsenceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, resource: &str) -> PathBuf {
        // Resource names are used verbatim as file stems; path separators
        // would escape the store root
        let stem: String = resource
            .chars()
            .map(|c| if std::path::is_separator(c) { '_' } else { c })
            .collect();
        self.root.join(format!("{stem}.csv"))
    }

    /// Append one interval to the resource's file, creating the store
    /// directory and the file (with its header) on first use.
    pub fn append(&self, absence: &Absence) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.file_for(&absence.resource);
        let is_new = !path.exists();

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if is_new {
            writeln!(file, "{HEADER}")?;
        }
        writeln!(
            file,
            "{},{},{}",
            absence.start.format(TIMESTAMP_FORMAT),
            absence.end.format(TIMESTAMP_FORMAT),
            absence.reason
        )?;
        Ok(())
    }

    /// Read one resource's intervals. A resource with no file has no logged
    /// non-availability: empty, not an error.
    pub fn load(&self, resource: &str) -> Result<Vec<Absence>, StoreError> {
        let path = self.file_for(resource);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_resource_file(&path, resource)
    }

    /// Read the whole store wholesale: every `<resource>.csv` under the root.
    pub fn load_all(&self) -> Result<Vec<Absence>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut absences = Vec::new();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("csv"))
            .collect();
        paths.sort();
        for path in paths {
            let Some(resource) = path.file_stem().and_then(|s| s.to_str()).map(String::from)
            else {
                continue;
            };
            absences.extend(read_resource_file(&path, &resource)?);
        }
        Ok(absences)
    }
}

fn read_resource_file(path: &Path, resource: &str) -> Result<Vec<Absence>, StoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut absences = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let (Some(start), Some(end)) = (
            parse_datetime(record.get(0).unwrap_or("")),
            parse_datetime(record.get(1).unwrap_or("")),
        ) else {
            warn!(resource, "absence store: skipping row with unparseable interval");
            continue;
        };
        let Some(reason) = AbsenceReason::parse(record.get(2).unwrap_or("")) else {
            warn!(resource, "absence store: skipping row with unknown reason");
            continue;
        };
        if end < start {
            warn!(resource, "absence store: skipping row with end before start");
            continue;
        }
        absences.push(Absence::new(resource, start, end, reason));
    }
    Ok(absences)
}
