use serde::{Deserialize, Serialize};

/// Working-time parameters that turn a day into available production seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkSchedule {
    #[serde(default = "default_working_hours")]
    pub working_hours: f64,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: f64,
}

fn default_working_hours() -> f64 {
    8.0
}

fn default_break_minutes() -> f64 {
    30.0
}

impl Default for WorkSchedule {
    fn default() -> Self {
        Self {
            working_hours: default_working_hours(),
            break_minutes: default_break_minutes(),
        }
    }
}
