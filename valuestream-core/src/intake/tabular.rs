//! CSV import with forgiving headers and unit-bearing cells.

use super::units::{parse_number_loose, parse_shift_count, percent_or_plain, seconds_or_plain};
use crate::error::VsmError;
use std::{fs::File, io::Read, path::Path};
use tracing::{info, warn};
use valuestream_schemas::{dataset::Dataset, process::Process};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    CycleTime,
    Changeover,
    Uptime,
    Wip,
    Operators,
    Shifts,
    AvailableTime,
    Demand,
}

const HEADER_ALIASES: &[(&str, Column)] = &[
    ("step", Column::Name),
    ("name", Column::Name),
    ("process", Column::Name),
    ("processname", Column::Name),
    ("operation", Column::Name),
    ("cycletimesec", Column::CycleTime),
    ("cycletime", Column::CycleTime),
    ("cycletimes", Column::CycleTime),
    ("ct", Column::CycleTime),
    ("changeoversec", Column::Changeover),
    ("changeover", Column::Changeover),
    ("changeovertime", Column::Changeover),
    ("co", Column::Changeover),
    ("setup", Column::Changeover),
    ("setuptime", Column::Changeover),
    ("uptimepct", Column::Uptime),
    ("uptime", Column::Uptime),
    ("uptimepercent", Column::Uptime),
    ("availability", Column::Uptime),
    ("wipunits", Column::Wip),
    ("wip", Column::Wip),
    ("inventory", Column::Wip),
    ("operators", Column::Operators),
    ("operatorcount", Column::Operators),
    ("numoperators", Column::Operators),
    ("shifts", Column::Shifts),
    ("shiftcount", Column::Shifts),
    ("shiftsperday", Column::Shifts),
    ("availabletimesec", Column::AvailableTime),
    ("availabletime", Column::AvailableTime),
    ("demand", Column::Demand),
    ("demandperday", Column::Demand),
    ("customerdemand", Column::Demand),
    ("customerdemandperday", Column::Demand),
];

/// Lowercase with everything but letters and digits removed: "Cycle Time (s)" is "cycletimes".
fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn column_for(header: &str) -> Option<Column> {
    let key = header_key(header);
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, column)| *column)
}

/// A cell that was present but could not be read as its column's unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CellIssue {
    /// 1-based data row, not counting the header.
    pub row: usize,
    pub header: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportReport {
    pub dataset: Dataset,
    pub unmapped_headers: Vec<String>,
    pub skipped_rows: Vec<usize>,
    pub cell_issues: Vec<CellIssue>,
}

impl ImportReport {
    pub fn row_count(&self) -> usize {
        self.dataset.processes.len()
    }
}

pub fn import_csv_path<P: AsRef<Path>>(path: P) -> Result<ImportReport, VsmError> {
    let path_str = path.as_ref().display().to_string();
    let file = File::open(path.as_ref()).map_err(|e| VsmError::FileIO(path_str.clone(), e))?;
    let report = import_csv_reader(file, &path_str)?;
    info!(
        path = %path_str,
        rows = report.row_count(),
        skipped = report.skipped_rows.len(),
        "imported process table"
    );
    Ok(report)
}

/// Reads a process table. `source` names the input in error messages.
///
/// Rows become processes `P1..Pn` in table order; blank rows are skipped.
/// Customer demand comes from the first row with a readable demand cell.
pub fn import_csv_reader<R: Read>(reader: R, source: &str) -> Result<ImportReport, VsmError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| VsmError::CsvError(source.to_string(), e))?
        .clone();

    let mut report = ImportReport::default();
    let mut columns = Vec::with_capacity(headers.len());
    for header in headers.iter() {
        let column = column_for(header);
        if column.is_none() && !header.is_empty() {
            report.unmapped_headers.push(header.to_string());
        }
        columns.push(column);
    }
    if columns.iter().all(Option::is_none) {
        return Err(VsmError::Import {
            row: 0,
            message: format!(
                "no recognizable column in header '{}'",
                headers.iter().collect::<Vec<_>>().join(",")
            ),
        });
    }

    for (offset, record) in rdr.records().enumerate() {
        let row = offset + 1;
        let record = record.map_err(|e| VsmError::CsvError(source.to_string(), e))?;
        if record.iter().all(str::is_empty) {
            report.skipped_rows.push(row);
            continue;
        }

        let number = report.dataset.processes.len() + 1;
        let mut process = Process::new(format!("P{}", number), format!("P{}", number));

        for (cell, (column, header)) in record.iter().zip(columns.iter().zip(headers.iter())) {
            let Some(column) = column else { continue };
            if cell.is_empty() {
                continue;
            }
            let parsed = match column {
                Column::Name => {
                    process.name = cell.to_string();
                    continue;
                }
                Column::CycleTime => seconds_or_plain(cell).map(|v| process.cycle_time_sec = Some(v)),
                Column::Changeover => seconds_or_plain(cell).map(|v| process.changeover_sec = Some(v)),
                Column::AvailableTime => {
                    seconds_or_plain(cell).map(|v| process.available_time_sec = Some(v))
                }
                Column::Uptime => percent_or_plain(cell).map(|v| process.uptime_pct = Some(v)),
                Column::Wip => parse_number_loose(cell).map(|v| process.wip_units = Some(v)),
                Column::Operators => parse_count(cell).map(|n| process.operators = Some(n)),
                Column::Shifts => parse_shift_count(cell)
                    .or_else(|| parse_count(cell))
                    .map(|n| process.shift_count = Some(n)),
                Column::Demand => parse_number_loose(cell).map(|v| {
                    if report.dataset.customer_demand_per_day.is_none() {
                        report.dataset.customer_demand_per_day = Some(v);
                    }
                }),
            };
            if parsed.is_none() {
                warn!(source, row, header, value = cell, "unreadable cell left empty");
                report.cell_issues.push(CellIssue {
                    row,
                    header: header.to_string(),
                    value: cell.to_string(),
                });
            }
        }

        report.dataset.processes.push(process);
    }

    Ok(report)
}

fn parse_count(cell: &str) -> Option<u32> {
    parse_number_loose(cell)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32)
}

/// Folds an imported table into a draft. Demand is replaced only when the table
/// carried one, processes only when it had rows.
pub fn merge_into(draft: &mut Dataset, imported: Dataset) {
    if imported.customer_demand_per_day.is_some() {
        draft.customer_demand_per_day = imported.customer_demand_per_day;
    }
    if !imported.processes.is_empty() {
        draft.processes = imported.processes;
    }
}
