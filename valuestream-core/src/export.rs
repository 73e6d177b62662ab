use crate::{error::VsmError, metrics::Metrics};
use csv::Writer;
use serde::Serialize;
use std::{fs, io};
use valuestream_schemas::dataset::Dataset;

pub const TABLE_HEADERS: [&str; 7] = [
    "Step",
    "CycleTimeSec",
    "ChangeoverSec",
    "UptimePct",
    "WIPUnits",
    "EfficiencyPct",
    "Bottleneck",
];

#[derive(Debug, Serialize)]
struct TableRow<'a> {
    #[serde(rename = "Step")]
    step: &'a str,
    #[serde(rename = "CycleTimeSec")]
    cycle_time_sec: Option<f64>,
    #[serde(rename = "ChangeoverSec")]
    changeover_sec: Option<f64>,
    #[serde(rename = "UptimePct")]
    uptime_pct: Option<f64>,
    #[serde(rename = "WIPUnits")]
    wip_units: Option<f64>,
    #[serde(rename = "EfficiencyPct")]
    efficiency_pct: Option<f64>,
    #[serde(rename = "Bottleneck")]
    bottleneck: &'static str,
}

/// Writes the per-step table. Input values are written as entered (missing ones
/// empty) so the tabular importer reads the file back unchanged.
pub struct TableWriter<W: io::Write> {
    writer: Writer<W>,
    target: String,
}

impl TableWriter<fs::File> {
    pub fn create(path: &str) -> Result<Self, VsmError> {
        let writer = Writer::from_path(path).map_err(|e| VsmError::CsvError(path.to_string(), e))?;
        Ok(Self {
            writer,
            target: path.to_string(),
        })
    }
}

impl<W: io::Write> TableWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: Writer::from_writer(inner),
            target: "<memory>".to_string(),
        }
    }

    pub fn write_table(&mut self, dataset: &Dataset, metrics: &Metrics) -> Result<(), VsmError> {
        for (process, derived) in dataset.processes.iter().zip(&metrics.processes) {
            let row = TableRow {
                step: &process.name,
                cycle_time_sec: process.cycle_time_sec,
                changeover_sec: process.changeover_sec,
                uptime_pct: process.uptime_pct,
                wip_units: process.wip_units,
                efficiency_pct: derived.efficiency_pct,
                bottleneck: if derived.is_bottleneck { "yes" } else { "" },
            };
            self.writer
                .serialize(row)
                .map_err(|e| VsmError::CsvError(self.target.clone(), e))?;
        }
        self.writer
            .flush()
            .map_err(|e| VsmError::FileIO(self.target.clone(), e))
    }

    pub fn into_inner(self) -> Result<W, VsmError> {
        let target = self.target;
        self.writer
            .into_inner()
            .map_err(|e| VsmError::FileIO(target, e.into_error()))
    }
}

/// The table as a CSV string.
pub fn table_to_string(dataset: &Dataset, metrics: &Metrics) -> Result<String, VsmError> {
    let mut table = TableWriter::from_writer(Vec::new());
    table.write_table(dataset, metrics)?;
    let bytes = table.into_inner()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `None` renders as "N/A".
pub fn format_metric(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "N/A".to_string(),
    }
}

/// Whole seconds with an "s" suffix, e.g. "56s".
pub fn format_seconds(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}s", v.round()),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_applicable_values() {
        assert_eq!(format_metric(None, 1), "N/A");
        assert_eq!(format_metric(Some(0.4999), 1), "0.5");
        assert_eq!(format_seconds(Some(56.25)), "56s");
        assert_eq!(format_seconds(None), "N/A");
    }
}
