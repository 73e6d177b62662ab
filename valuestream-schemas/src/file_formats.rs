use crate::{dataset::Dataset, schedule::WorkSchedule};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "1.0";

/// On-disk wrapper for a dataset, readable from JSON or YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetFile {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub dataset: Dataset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<WorkSchedule>,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl DatasetFile {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            schema_version: default_schema_version(),
            dataset,
            schedule: None,
        }
    }
}
