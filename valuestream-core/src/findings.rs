//! Rule-based risk findings over computed metrics.
//!
//! Each rule looks at one step at a time and yields at most one finding of its
//! kind. Severity and probability come from fixed thresholds; the output is
//! ordered most severe first, then most probable, then by flow position.

use crate::metrics::{Metrics, ProcessMetrics, SECONDS_PER_MINUTE};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

const DOWNTIME_UPTIME_PCT: f64 = 90.0;
const INVENTORY_DAYS: f64 = 2.0;
const LONG_CHANGEOVER_SEC: f64 = 3_600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    Bottleneck,
    Downtime,
    Inventory,
    Changeover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: RiskLevel,
    /// Estimated likelihood the risk materializes, 0-100.
    pub probability_pct: f64,
    pub process_index: usize,
    pub process_id: String,
    pub process_name: String,
    pub description: String,
    pub recommendation: String,
}

fn level(value: f64, high: f64, medium: f64) -> RiskLevel {
    if value > high {
        RiskLevel::High
    } else if value > medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn display_name(process: &ProcessMetrics) -> String {
    if process.name.trim().is_empty() {
        format!("Process {}", process.index + 1)
    } else {
        process.name.clone()
    }
}

fn finding(
    process: &ProcessMetrics,
    kind: FindingKind,
    severity: RiskLevel,
    probability_pct: f64,
    description: String,
    recommendation: &str,
) -> Finding {
    Finding {
        kind,
        severity,
        probability_pct,
        process_index: process.index,
        process_id: process.process_id.clone(),
        process_name: display_name(process),
        description,
        recommendation: recommendation.to_string(),
    }
}

fn bottleneck_finding(process: &ProcessMetrics, takt: Option<f64>) -> Option<Finding> {
    let takt = takt.filter(|t| *t > 0.0)?;
    let ct = process.cycle_time_sec;
    if ct <= takt {
        return None;
    }
    let over_pct = (ct / takt - 1.0) * 100.0;
    Some(finding(
        process,
        FindingKind::Bottleneck,
        level(ct, takt * 1.5, takt * 1.2),
        over_pct.min(95.0),
        format!(
            "Cycle time ({}s) exceeds takt time ({:.1}s) by {:.0}%",
            ct, takt, over_pct
        ),
        "Balance the line: split work elements, add capacity or reduce cycle time at this step",
    ))
}

fn downtime_finding(process: &ProcessMetrics) -> Option<Finding> {
    let uptime = process.uptime_pct;
    if uptime >= DOWNTIME_UPTIME_PCT {
        return None;
    }
    let downtime = 100.0 - uptime;
    let severity = if uptime < 70.0 {
        RiskLevel::High
    } else if uptime < 85.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    Some(finding(
        process,
        FindingKind::Downtime,
        severity,
        (downtime * 1.5).min(95.0),
        format!(
            "Low uptime ({}%) indicates reliability issues; {:.0}% of available time is lost",
            uptime, downtime
        ),
        "Introduce preventive maintenance and track stoppage causes (TPM)",
    ))
}

fn inventory_finding(process: &ProcessMetrics) -> Option<Finding> {
    let days = process.wip_days.filter(|d| *d > INVENTORY_DAYS)?;
    Some(finding(
        process,
        FindingKind::Inventory,
        level(days, 5.0, 3.0),
        (days * 15.0).min(90.0),
        format!(
            "High WIP ahead of this step ({:.1} days of demand) hides quality problems and ties up cash",
            days
        ),
        "Cap the buffer with a kanban or FIFO lane and pull from the downstream step",
    ))
}

fn changeover_finding(process: &ProcessMetrics) -> Option<Finding> {
    let co = process.changeover_sec;
    if co <= LONG_CHANGEOVER_SEC {
        return None;
    }
    let minutes = co / SECONDS_PER_MINUTE;
    Some(finding(
        process,
        FindingKind::Changeover,
        level(co, 7_200.0, 5_400.0),
        (minutes / 60.0 * 20.0).min(85.0),
        format!(
            "Long changeover ({:.0} min) increases defect risk during setup transitions",
            minutes
        ),
        "Apply SMED: move setup work offline and standardize the changeover",
    ))
}

fn by_priority(a: &Finding, b: &Finding) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| b.probability_pct.total_cmp(&a.probability_pct))
        .then_with(|| a.process_index.cmp(&b.process_index))
}

/// Every finding for the steps in `metrics`, most urgent first.
pub fn findings(metrics: &Metrics) -> Vec<Finding> {
    let mut found: Vec<Finding> = metrics
        .processes
        .iter()
        .flat_map(|process| {
            [
                bottleneck_finding(process, metrics.takt_time_sec),
                downtime_finding(process),
                inventory_finding(process),
                changeover_finding(process),
            ]
        })
        .flatten()
        .collect();
    found.sort_by(by_priority);
    debug!(count = found.len(), "findings evaluated");
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries_are_exclusive() {
        assert_eq!(level(1.5, 1.5, 1.2), RiskLevel::Medium);
        assert_eq!(level(1.2, 1.5, 1.2), RiskLevel::Low);
        assert_eq!(level(1.51, 1.5, 1.2), RiskLevel::High);
    }
}
