use crate::{error::VsmError, metrics};
use serde::Serialize;
use std::collections::HashSet;
use valuestream_schemas::{dataset::Dataset, schedule::WorkSchedule};

const LONG_CYCLE_TIME_SEC: f64 = 3_600.0;
const LOW_UPTIME_PCT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CustomerDemand,
    ProcessName,
    CycleTime,
    ChangeoverTime,
    Uptime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub field: Field,
    pub process_index: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: Field, process_index: Option<usize>, severity: Severity, message: String) -> Self {
        Self {
            field,
            process_index,
            severity,
            message,
        }
    }
}

/// Rejects input the engines cannot interpret at all: non-finite numbers and
/// empty or duplicated process ids. Missing values are fine.
pub fn ensure_well_formed(dataset: &Dataset) -> Result<(), VsmError> {
    if let Some(demand) = dataset.customer_demand_per_day {
        if !demand.is_finite() {
            return Err(VsmError::MalformedDataset(format!(
                "customerDemandPerDay is not a finite number ({})",
                demand
            )));
        }
    }

    let mut seen = HashSet::new();
    for (index, process) in dataset.processes.iter().enumerate() {
        if process.id.trim().is_empty() {
            return Err(VsmError::MalformedDataset(format!(
                "process at position {} has an empty id",
                index + 1
            )));
        }
        if !seen.insert(process.id.as_str()) {
            return Err(VsmError::MalformedDataset(format!(
                "duplicate process id '{}'",
                process.id
            )));
        }
        for (field, value) in process.numeric_fields() {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(VsmError::MalformedDataset(format!(
                    "process '{}' field {} is not a finite number ({})",
                    process.id, field, value
                )));
            }
        }
    }
    Ok(())
}

/// Reports everything a user should fix or review before trusting the map.
///
/// The takt comparison uses `schedule`, so a plant running 10 h shifts is not
/// judged against an 8 h day.
pub fn validate(dataset: &Dataset, schedule: &WorkSchedule) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if dataset.positive_demand().is_none() {
        issues.push(ValidationIssue::new(
            Field::CustomerDemand,
            None,
            Severity::Error,
            "Customer demand is required and must be greater than 0".to_string(),
        ));
    }

    for (index, process) in dataset.processes.iter().enumerate() {
        let label = index + 1;
        let at = Some(index);

        if process.name.trim().is_empty() {
            issues.push(ValidationIssue::new(
                Field::ProcessName,
                at,
                Severity::Error,
                format!("Process {}: Name is required", label),
            ));
        }

        match process.cycle_time_sec {
            None => issues.push(ValidationIssue::new(
                Field::CycleTime,
                at,
                Severity::Error,
                format!("Process {}: Cycle time is required", label),
            )),
            Some(ct) if ct < 0.0 => issues.push(ValidationIssue::new(
                Field::CycleTime,
                at,
                Severity::Error,
                format!("Process {}: Cycle time cannot be negative", label),
            )),
            Some(ct) if ct > LONG_CYCLE_TIME_SEC => issues.push(ValidationIssue::new(
                Field::CycleTime,
                at,
                Severity::Warning,
                format!(
                    "Process {}: Cycle time of {}s is unusually long; check the unit",
                    label, ct
                ),
            )),
            Some(_) => {}
        }

        if process.changeover_sec.map_or(false, |co| co < 0.0) {
            issues.push(ValidationIssue::new(
                Field::ChangeoverTime,
                at,
                Severity::Error,
                format!("Process {}: Changeover time cannot be negative", label),
            ));
        }

        match process.uptime_pct {
            Some(up) if !(0.0..=100.0).contains(&up) => issues.push(ValidationIssue::new(
                Field::Uptime,
                at,
                Severity::Error,
                format!("Process {}: Uptime must be between 0 and 100", label),
            )),
            Some(up) if up < LOW_UPTIME_PCT => issues.push(ValidationIssue::new(
                Field::Uptime,
                at,
                Severity::Warning,
                format!("Process {}: Uptime of {}% is very low", label, up),
            )),
            _ => {}
        }
    }

    let available = metrics::available_time_sec(schedule);
    if let Some(takt) = metrics::takt_time_sec(available, dataset.customer_demand_per_day) {
        for (index, process) in dataset.processes.iter().enumerate() {
            if metrics::exceeds_takt(process, Some(takt)) {
                issues.push(ValidationIssue::new(
                    Field::CycleTime,
                    Some(index),
                    Severity::Warning,
                    format!(
                        "Process {}: Cycle time ({}s) exceeds takt time ({:.1}s) - BOTTLENECK",
                        index + 1,
                        process.cycle_time_or_default(),
                        takt
                    ),
                ));
            }
        }
    }

    issues
}

/// How much of the map has been filled in, 0-100.
///
/// Demand and the four core per-process fields (name, C/T, C/O, uptime) weigh 1;
/// operators and WIP weigh 0.5 each.
/// The optional fields share a single unit in the denominator, so each process adds 5.
pub fn completeness_pct(dataset: &Dataset) -> u32 {
    if dataset.processes.is_empty() {
        return 0;
    }

    let mut total = 1.0;
    let mut filled = if dataset.positive_demand().is_some() { 1.0 } else { 0.0 };

    for process in &dataset.processes {
        total += 4.0;
        let core = [
            !process.name.trim().is_empty(),
            process.cycle_time_sec.map_or(false, |ct| ct > 0.0),
            process.changeover_sec.map_or(false, |co| co >= 0.0),
            process.uptime_pct.map_or(false, |up| up > 0.0),
        ];
        filled += core.iter().filter(|ok| **ok).count() as f64;

        total += 1.0;
        if process.operators.map_or(false, |n| n > 0) {
            filled += 0.5;
        }
        if process.wip_units.map_or(false, |w| w > 0.0) {
            filled += 0.5;
        }
    }

    (filled / total * 100.0).round() as u32
}
