use crate::process::Process;
use serde::{Deserialize, Serialize};

/// The unit of computation for the layout and metrics engines.
///
/// `processes` is ordered: the order is the flow order of the value stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub customer_demand_per_day: Option<f64>,
    #[serde(default)]
    pub processes: Vec<Process>,
}

impl Dataset {
    pub fn new(customer_demand_per_day: Option<f64>, processes: Vec<Process>) -> Self {
        Self {
            customer_demand_per_day,
            processes,
        }
    }

    /// Demand usable as a divisor, i.e. present and strictly positive.
    pub fn positive_demand(&self) -> Option<f64> {
        self.customer_demand_per_day.filter(|d| *d > 0.0)
    }
}
