/*
Service status derivation and schedule composition logic.
Module was independently written from HTTP / Axum for testing
*/

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ServiceRecord, ServiceStatus, Settings, TemplateTask};

// One (task, interval) cell of the schedule grid after status derivation.
#[derive(Debug, Clone, Serialize)]
pub struct CellStatus {
    pub task_id: Uuid,
    pub interval: i64,
    pub status: ServiceStatus,
    pub last_service: Option<ServiceRecord>,
}

// Classify a single schedule cell.
//
// Precedence (completion always wins):
// 1) A record matching this exact (task, interval) -> Completed; the
//    match is exposed as `last_service` and no hour logic runs. If
//    duplicate records exist the first match wins.
// 2) Otherwise delta = interval - equipment_hours:
//       delta >  B  -> NotDue   (strict: delta == B is NotDue)
//       delta >= -A -> Pending  (inclusive: delta == -A is Pending)
//       delta <  -A -> Overdue
pub fn compute_cell_status(
    task_id: Uuid,
    interval: i64,
    equipment_hours: i64,
    records: &[ServiceRecord],
    settings: &Settings,
) -> CellStatus {
    let last_service = records
        .iter()
        .find(|r| r.task_id == task_id && r.scheduled_interval == interval);

    let status = match last_service {
        Some(_) => ServiceStatus::Completed,
        None => {
            let delta = interval - equipment_hours;
            if delta > settings.pending_before_hours {
                ServiceStatus::NotDue
            } else if delta >= -settings.pending_after_hours {
                ServiceStatus::Pending
            } else {
                ServiceStatus::Overdue
            }
        }
    };

    CellStatus {
        task_id,
        interval,
        status,
        last_service: last_service.cloned(),
    }
}

// Evaluate every (task, interval) cell of a template's schedule.
// Cells are independent; an assignment with no intervals yields none.
pub fn schedule_statuses(
    assignments: &[TemplateTask],
    equipment_hours: i64,
    records: &[ServiceRecord],
    settings: &Settings,
) -> Vec<CellStatus> {
    let mut cells = Vec::new();
    for assignment in assignments {
        for &interval in &assignment.intervals {
            cells.push(compute_cell_status(
                assignment.task_id,
                interval,
                equipment_hours,
                records,
                settings,
            ));
        }
    }
    cells
}

// Why editing a completed service record was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("admin code not configured")]
    NotConfigured,
    #[error("invalid admin code")]
    InvalidCode,
}

// Check the shared admin passphrase guarding edits of completed records.
// Grants a single edit; the code must be re-submitted on every attempt.
// Comparison is exact and case-sensitive.
pub fn authorize(submitted: &str, settings: &Settings) -> Result<(), AuthError> {
    if settings.master_admin_code.is_empty() {
        return Err(AuthError::NotConfigured);
    }
    if submitted != settings.master_admin_code {
        return Err(AuthError::InvalidCode);
    }
    Ok(())
}

// Toggle one interval on an assignment's interval set: remove it when
// present, insert keeping ascending order when absent. An empty result
// means the caller must delete the assignment row.
pub fn toggle_interval(current: &[i64], interval: i64) -> Vec<i64> {
    let mut next: Vec<i64> = current.iter().copied().filter(|&i| i != interval).collect();
    if next.len() == current.len() {
        next.push(interval);
        next.sort_unstable();
    }
    next
}

// Intervals a task starts with when added to a template: auto-apply
// tasks are scheduled at every rung of the preset ladder.
pub fn initial_intervals(auto_apply: bool, ladder: &[i64]) -> Vec<i64> {
    if auto_apply {
        ladder.to_vec()
    } else {
        Vec::new()
    }
}

// Parse a free-text ladder ("50, 100, 250") into sorted distinct
// strictly-positive hours. Malformed or non-positive entries are dropped.
pub fn parse_interval_ladder(input: &str) -> Vec<i64> {
    let values: Vec<i64> = input
        .split(',')
        .filter_map(|v| v.trim().parse().ok())
        .filter(|&v| v > 0)
        .collect();
    normalize_ladder(values)
}

// Sort ascending and drop duplicates. Callers validate positivity when
// values arrive as structured input rather than free text.
pub fn normalize_ladder(mut values: Vec<i64>) -> Vec<i64> {
    values.sort_unstable();
    values.dedup();
    values
}
