//! Availability adjuster
//!
//! Nets declared non-availability against the sprint baseline and flags
//! assignees whose estimated workload exceeds what is left.

use sprintlens_core::{
    AvailabilityRow, CapacityConfig, OverallocationRow, ProjectDataset, UtilizationRow,
};

/// Available hours per roster resource: baseline minus the sum of logged
/// non-availability. Resources with nothing logged keep the full baseline.
pub fn availability(dataset: &ProjectDataset, config: &CapacityConfig) -> Vec<AvailabilityRow> {
    dataset
        .roster()
        .into_iter()
        .map(|resource| {
            let absence_hours: f64 = dataset
                .absences_for(&resource)
                .iter()
                .map(|a| a.hours())
                .sum();
            AvailabilityRow {
                resource,
                absence_hours,
                available_hours: config.sprint_hours - absence_hours,
            }
        })
        .collect()
}

/// Overallocation flags: one boolean per utilization row, true when the
/// estimated hours strictly exceed the available hours. Assignees absent
/// from the availability table fall back to the full baseline.
pub fn overallocation(
    utilization: &[UtilizationRow],
    availability: &[AvailabilityRow],
    config: &CapacityConfig,
) -> Vec<OverallocationRow> {
    utilization
        .iter()
        .map(|row| {
            let available_hours = availability
                .iter()
                .find(|a| a.resource == row.assignee)
                .map_or(config.sprint_hours, |a| a.available_hours);
            OverallocationRow {
                assignee: row.assignee.clone(),
                estimated_hours: row.estimated_hours,
                available_hours,
                overallocated: row.estimated_hours > available_hours,
            }
        })
        .collect()
}
