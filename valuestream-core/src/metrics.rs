//! Lean-manufacturing metrics derived from a [`Dataset`] and a [`WorkSchedule`].
//!
//! Every quantity that involves a division is an `Option<f64>`: `None` means
//! "not applicable" (missing demand, zero inventory, no constraining step) and
//! is what callers render as "N/A". No function in this module hands back NaN
//! or an infinity.
//!
//! Out-of-range inputs (negative times, uptime outside 0-100) are clamped and
//! reported through [`MetricWarning`] instead of failing the computation.

use crate::{error::VsmError, validation::ensure_well_formed};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};
use valuestream_schemas::{dataset::Dataset, process::Process, schedule::WorkSchedule};

pub const SECONDS_PER_HOUR: f64 = 3_600.0;
pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricWarning {
    NegativeAvailableTime {
        working_hours: f64,
        break_minutes: f64,
    },
    MissingDemand,
    NonPositiveDemand {
        demand: f64,
    },
    MissingCycleTime {
        process_id: String,
    },
    NegativeValue {
        process_id: String,
        field: &'static str,
        value: f64,
    },
    UptimeOutOfRange {
        process_id: String,
        value: f64,
    },
}

impl fmt::Display for MetricWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricWarning::NegativeAvailableTime {
                working_hours,
                break_minutes,
            } => write!(
                f,
                "Breaks ({} min) exceed working time ({} h); available time clamped to 0",
                break_minutes, working_hours
            ),
            MetricWarning::MissingDemand => {
                write!(f, "Customer demand is not set; takt-based metrics are N/A")
            }
            MetricWarning::NonPositiveDemand { demand } => write!(
                f,
                "Customer demand must be greater than 0 (got {}); takt-based metrics are N/A",
                demand
            ),
            MetricWarning::MissingCycleTime { process_id } => {
                write!(f, "Process '{}' has no cycle time; treated as 0", process_id)
            }
            MetricWarning::NegativeValue {
                process_id,
                field,
                value,
            } => write!(
                f,
                "Process '{}' has negative {} ({}); clamped to 0",
                process_id, field, value
            ),
            MetricWarning::UptimeOutOfRange { process_id, value } => write!(
                f,
                "Process '{}' uptime {}% is outside 0-100; clamped",
                process_id, value
            ),
        }
    }
}

/// The step with the longest cycle time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bottleneck {
    pub index: usize,
    pub process_id: String,
    pub name: String,
    pub cycle_time_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessMetrics {
    pub index: usize,
    pub process_id: String,
    pub name: String,
    pub cycle_time_sec: f64,
    pub changeover_sec: f64,
    pub uptime_pct: f64,
    pub wip_units: f64,
    pub wip_days: Option<f64>,
    pub efficiency_pct: Option<f64>,
    /// `cycle_time_sec > takt` (strict); always false when takt is undefined.
    pub exceeds_takt: bool,
    /// True only for the single step reported as [`Metrics::bottleneck`].
    pub is_bottleneck: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub available_time_sec: f64,
    pub takt_time_sec: Option<f64>,
    pub total_cycle_time_sec: f64,
    pub total_changeover_sec: f64,
    pub total_inventory_units: f64,
    pub inventory_days: Option<f64>,
    pub lead_time_sec: Option<f64>,
    pub value_added_ratio_pct: Option<f64>,
    pub bottleneck: Option<Bottleneck>,
    pub capacity_per_shift: Option<u64>,
    pub capacity_gap: Option<f64>,
    pub processes: Vec<ProcessMetrics>,
    pub warnings: Vec<MetricWarning>,
}

impl Metrics {
    /// Computes every metric for `dataset` under `schedule`.
    ///
    /// # Errors
    ///
    /// Returns `VsmError::MalformedDataset` for structurally broken input
    /// (non-finite numbers, empty or duplicate ids). Incomplete data never errors.
    pub fn compute(dataset: &Dataset, schedule: &WorkSchedule) -> Result<Self, VsmError> {
        ensure_well_formed(dataset)?;

        let warnings = collect_warnings(dataset, schedule);
        for warning in &warnings {
            warn!(%warning, "metric input adjusted");
        }

        let available = available_time_sec(schedule);
        let demand = dataset.positive_demand();
        let takt = takt_time_sec(available, dataset.customer_demand_per_day);
        let total_ct = total_cycle_time_sec(dataset);
        let total_inventory = total_inventory_units(dataset);
        let inv_days = inventory_days(total_inventory, dataset.customer_demand_per_day);
        let bottleneck = bottleneck(dataset);
        let capacity = bottleneck
            .as_ref()
            .and_then(|b| capacity_per_shift(available, b.cycle_time_sec));

        let processes = dataset
            .processes
            .iter()
            .enumerate()
            .map(|(index, p)| ProcessMetrics {
                index,
                process_id: p.id.clone(),
                name: p.name.clone(),
                cycle_time_sec: cycle_time(p),
                changeover_sec: changeover(p),
                uptime_pct: uptime(p),
                wip_units: wip(p),
                wip_days: demand.and_then(|d| finite(wip(p) / d)),
                efficiency_pct: process_efficiency_pct(p, takt),
                exceeds_takt: exceeds_takt(p, takt),
                is_bottleneck: bottleneck.as_ref().map_or(false, |b| b.index == index),
            })
            .collect();

        let metrics = Metrics {
            available_time_sec: available,
            takt_time_sec: takt,
            total_cycle_time_sec: total_ct,
            total_changeover_sec: dataset.processes.iter().map(changeover).sum(),
            total_inventory_units: total_inventory,
            inventory_days: inv_days,
            lead_time_sec: lead_time_sec(inv_days),
            value_added_ratio_pct: value_added_ratio_pct(total_ct, inv_days),
            capacity_gap: capacity_gap(dataset.customer_demand_per_day, capacity),
            capacity_per_shift: capacity,
            bottleneck,
            processes,
            warnings,
        };

        debug!(
            processes = metrics.processes.len(),
            takt = ?metrics.takt_time_sec,
            total_cycle_time = metrics.total_cycle_time_sec,
            bottleneck = ?metrics.bottleneck.as_ref().map(|b| b.name.as_str()),
            "metrics computed"
        );
        Ok(metrics)
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// `working_hours * 3600 - break_minutes * 60`, clamped at 0.
pub fn available_time_sec(schedule: &WorkSchedule) -> f64 {
    unclamped_available_time(schedule).max(0.0)
}

fn unclamped_available_time(schedule: &WorkSchedule) -> f64 {
    schedule.working_hours * SECONDS_PER_HOUR - schedule.break_minutes * SECONDS_PER_MINUTE
}

/// Seconds per unit needed to meet demand. `None` when demand is absent or <= 0.
pub fn takt_time_sec(available_time_sec: f64, demand_per_day: Option<f64>) -> Option<f64> {
    demand_per_day
        .filter(|d| *d > 0.0)
        .and_then(|d| finite(available_time_sec / d))
}

pub fn total_cycle_time_sec(dataset: &Dataset) -> f64 {
    dataset.processes.iter().map(cycle_time).sum()
}

pub fn total_inventory_units(dataset: &Dataset) -> f64 {
    dataset.processes.iter().map(wip).sum()
}

/// Days of demand sitting in inventory. `None` when demand is absent or <= 0.
pub fn inventory_days(total_inventory_units: f64, demand_per_day: Option<f64>) -> Option<f64> {
    demand_per_day
        .filter(|d| *d > 0.0)
        .and_then(|d| finite(total_inventory_units / d))
}

pub fn lead_time_sec(inventory_days: Option<f64>) -> Option<f64> {
    inventory_days.and_then(|d| finite(d * SECONDS_PER_DAY))
}

/// Share of lead time spent processing. `None` when inventory days are 0 or undefined.
pub fn value_added_ratio_pct(total_cycle_time_sec: f64, inventory_days: Option<f64>) -> Option<f64> {
    match inventory_days {
        Some(days) if days > 0.0 => {
            finite(total_cycle_time_sec / (days * SECONDS_PER_DAY) * 100.0)
        }
        _ => None,
    }
}

/// The process with the greatest cycle time; ties go to the earliest in flow order.
///
/// Returns `None` for an empty dataset or when no step has a cycle time above 0.
pub fn bottleneck(dataset: &Dataset) -> Option<Bottleneck> {
    let mut best: Option<(usize, f64)> = None;
    for (index, process) in dataset.processes.iter().enumerate() {
        let ct = cycle_time(process);
        // Strict comparison keeps the first occurrence on ties.
        if ct > best.map_or(0.0, |(_, max)| max) {
            best = Some((index, ct));
        }
    }

    best.map(|(index, cycle_time_sec)| {
        let process = &dataset.processes[index];
        Bottleneck {
            index,
            process_id: process.id.clone(),
            name: process.name.clone(),
            cycle_time_sec,
        }
    })
}

/// `clamp(takt / ct * uptime%, 0, 100)`; `None` without takt or a positive cycle time.
pub fn process_efficiency_pct(process: &Process, takt_time_sec: Option<f64>) -> Option<f64> {
    let ct = cycle_time(process);
    if ct <= 0.0 {
        return None;
    }
    let takt = takt_time_sec?;
    finite(takt / ct * (uptime(process) / 100.0) * 100.0).map(|e| e.clamp(0.0, 100.0))
}

pub fn exceeds_takt(process: &Process, takt_time_sec: Option<f64>) -> bool {
    takt_time_sec.map_or(false, |takt| cycle_time(process) > takt)
}

/// Whole units the constraining step can finish in the available time.
pub fn capacity_per_shift(available_time_sec: f64, bottleneck_cycle_time_sec: f64) -> Option<u64> {
    if bottleneck_cycle_time_sec <= 0.0 {
        return None;
    }
    finite((available_time_sec / bottleneck_cycle_time_sec).floor()).map(|units| units as u64)
}

/// Demand minus capacity; positive means a shortfall.
pub fn capacity_gap(demand_per_day: Option<f64>, capacity_per_shift: Option<u64>) -> Option<f64> {
    let demand = demand_per_day.filter(|d| *d > 0.0)?;
    let capacity = capacity_per_shift?;
    finite(demand - capacity as f64)
}

fn collect_warnings(dataset: &Dataset, schedule: &WorkSchedule) -> Vec<MetricWarning> {
    let mut warnings = Vec::new();

    if unclamped_available_time(schedule) < 0.0 {
        warnings.push(MetricWarning::NegativeAvailableTime {
            working_hours: schedule.working_hours,
            break_minutes: schedule.break_minutes,
        });
    }

    match dataset.customer_demand_per_day {
        None => warnings.push(MetricWarning::MissingDemand),
        Some(demand) if demand <= 0.0 => {
            warnings.push(MetricWarning::NonPositiveDemand { demand })
        }
        Some(_) => {}
    }

    for process in &dataset.processes {
        if process.cycle_time_sec.is_none() {
            warnings.push(MetricWarning::MissingCycleTime {
                process_id: process.id.clone(),
            });
        }
        for (field, value) in [
            ("cycle time", process.cycle_time_sec),
            ("changeover", process.changeover_sec),
            ("WIP", process.wip_units),
        ] {
            if let Some(value) = value.filter(|v| *v < 0.0) {
                warnings.push(MetricWarning::NegativeValue {
                    process_id: process.id.clone(),
                    field,
                    value,
                });
            }
        }
        if let Some(value) = process.uptime_pct.filter(|u| !(0.0..=100.0).contains(u)) {
            warnings.push(MetricWarning::UptimeOutOfRange {
                process_id: process.id.clone(),
                value,
            });
        }
    }
    warnings
}

fn cycle_time(process: &Process) -> f64 {
    process.cycle_time_or_default().max(0.0)
}

fn changeover(process: &Process) -> f64 {
    process.changeover_or_default().max(0.0)
}

fn uptime(process: &Process) -> f64 {
    process.uptime_or_default().clamp(0.0, 100.0)
}

fn wip(process: &Process) -> f64 {
    process.wip_or_default().max(0.0)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
