use serde::{Deserialize, Serialize};

/// One step of the value stream.
///
/// Every time field is in seconds by the time a `Process` reaches the engines;
/// conversion from minutes, hours or percent strings happens at intake.
/// `wip_units` is the inventory buffer sitting *in front of* this step, so the
/// flow edge leading into this process carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cycle_time_sec: Option<f64>,
    #[serde(default)]
    pub changeover_sec: Option<f64>,
    #[serde(default)]
    pub uptime_pct: Option<f64>,
    #[serde(default)]
    pub wip_units: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operators: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_time_sec: Option<f64>,
}

impl Process {
    pub const DEFAULT_TIME_SEC: f64 = 0.0;
    pub const DEFAULT_UPTIME_PCT: f64 = 100.0;
    pub const DEFAULT_WIP_UNITS: f64 = 0.0;

    /// Creates a process with only identity set; every measurement is unset.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cycle_time_sec: None,
            changeover_sec: None,
            uptime_pct: None,
            wip_units: None,
            operators: None,
            shift_count: None,
            available_time_sec: None,
        }
    }

    pub fn with_cycle_time(mut self, seconds: f64) -> Self {
        self.cycle_time_sec = Some(seconds);
        self
    }

    pub fn with_changeover(mut self, seconds: f64) -> Self {
        self.changeover_sec = Some(seconds);
        self
    }

    pub fn with_uptime(mut self, pct: f64) -> Self {
        self.uptime_pct = Some(pct);
        self
    }

    pub fn with_wip(mut self, units: f64) -> Self {
        self.wip_units = Some(units);
        self
    }

    pub fn cycle_time_or_default(&self) -> f64 {
        self.cycle_time_sec.unwrap_or(Self::DEFAULT_TIME_SEC)
    }

    pub fn changeover_or_default(&self) -> f64 {
        self.changeover_sec.unwrap_or(Self::DEFAULT_TIME_SEC)
    }

    pub fn uptime_or_default(&self) -> f64 {
        self.uptime_pct.unwrap_or(Self::DEFAULT_UPTIME_PCT)
    }

    pub fn wip_or_default(&self) -> f64 {
        self.wip_units.unwrap_or(Self::DEFAULT_WIP_UNITS)
    }

    /// Iterates over every numeric measurement with its field name.
    pub fn numeric_fields(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("cycleTimeSec", self.cycle_time_sec),
            ("changeoverSec", self.changeover_sec),
            ("uptimePct", self.uptime_pct),
            ("wipUnits", self.wip_units),
            ("availableTimeSec", self.available_time_sec),
        ]
    }
}
