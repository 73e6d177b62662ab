use crate::{config::AppConfig, plotting};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use valuestream_core::{
    export::{format_metric, format_seconds, TableWriter},
    files,
    findings::{self, Finding},
    intake::tabular,
    layout::{Layout, LayoutEngine},
    metrics::Metrics,
    seed::Seed,
    validation::{self, Severity, ValidationIssue},
};
use valuestream_schemas::{dataset::Dataset, file_formats::DatasetFile, schedule::WorkSchedule};

/// Everything derived from one dataset under one configuration.
pub struct Analysis {
    pub dataset: Dataset,
    pub schedule: WorkSchedule,
    pub metrics: Metrics,
    pub layout: Layout,
    pub findings: Vec<Finding>,
    pub issues: Vec<ValidationIssue>,
    pub completeness_pct: u32,
}

#[derive(Serialize)]
struct MetricsReport<'a> {
    schedule: &'a WorkSchedule,
    completeness_pct: u32,
    metrics: &'a Metrics,
    findings: &'a [Finding],
    validation: &'a [ValidationIssue],
}

/// A schedule stored with the dataset wins over the config file's.
pub fn analyze(file: DatasetFile, config: &AppConfig) -> Result<Analysis> {
    let schedule = file.schedule.unwrap_or(config.schedule);
    let dataset = file.dataset;

    let metrics = Metrics::compute(&dataset, &schedule).context("Failed to compute metrics")?;
    let layout = LayoutEngine::builder()
        .with_schedule(schedule)
        .build()?
        .layout(&dataset, config.canvas.canvas(), Seed::for_dataset(&dataset))
        .context("Failed to lay out diagram")?;
    let findings = findings::findings(&metrics);
    let issues = validation::validate(&dataset, &schedule);
    let completeness_pct = validation::completeness_pct(&dataset);

    Ok(Analysis {
        dataset,
        schedule,
        metrics,
        layout,
        findings,
        issues,
        completeness_pct,
    })
}

fn load(dataset_path: &Path) -> Result<DatasetFile> {
    files::load_dataset_file(dataset_path)
        .with_context(|| format!("Failed to load dataset: {}", dataset_path.display()))
}

/// Runs the full pipeline and writes every artifact into a run directory.
pub fn run_render(dataset_path: &Path, config: &AppConfig, out: Option<PathBuf>) -> Result<PathBuf> {
    println!("\n--- [Workflow] Rendering value stream map ---");
    let analysis = analyze(load(dataset_path)?, config)?;

    let output_dir = out.unwrap_or_else(|| {
        Path::new(&config.output_root).join(format!(
            "vsm_{}",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        ))
    });
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    // Keep the input next to its outputs for traceability.
    if let Some(name) = dataset_path.file_name() {
        fs::copy(dataset_path, output_dir.join(name))
            .with_context(|| format!("Failed to copy {} into run directory", dataset_path.display()))?;
    }

    fs::write(
        output_dir.join("layout.json"),
        serde_json::to_string_pretty(&analysis.layout)?,
    )?;
    let report = MetricsReport {
        schedule: &analysis.schedule,
        completeness_pct: analysis.completeness_pct,
        metrics: &analysis.metrics,
        findings: &analysis.findings,
        validation: &analysis.issues,
    };
    fs::write(output_dir.join("metrics.json"), serde_json::to_string_pretty(&report)?)?;

    let table_path = output_dir.join("vsm_table.csv");
    let mut table = TableWriter::create(&table_path.display().to_string())?;
    table.write_table(&analysis.dataset, &analysis.metrics)?;

    plotting::render_vsm_diagram(
        &output_dir,
        &config.title,
        &analysis.dataset,
        &analysis.layout,
        &analysis.metrics,
        config.render_png,
    )?;
    plotting::plot_cycle_vs_takt(&output_dir, &analysis.metrics)?;

    print_summary_report(&config.title, &analysis);
    println!("\nRender complete. Results are in '{}'", output_dir.display());
    Ok(output_dir)
}

pub fn run_metrics(dataset_path: &Path, config: &AppConfig) -> Result<()> {
    let analysis = analyze(load(dataset_path)?, config)?;
    print_summary_report(&config.title, &analysis);
    Ok(())
}

/// Converts a CSV process table into a dataset file.
pub fn run_import(csv_path: &Path, demand: Option<f64>, out: &Path) -> Result<()> {
    println!("\n--- [Workflow] Importing process table ---");
    let report = tabular::import_csv_path(csv_path)
        .with_context(|| format!("Failed to import {}", csv_path.display()))?;

    let mut dataset = report.dataset.clone();
    if demand.is_some() {
        dataset.customer_demand_per_day = demand;
    }

    println!("Rows imported: {}", report.row_count());
    if !report.skipped_rows.is_empty() {
        println!("Blank rows skipped: {:?}", report.skipped_rows);
    }
    if !report.unmapped_headers.is_empty() {
        println!("Columns ignored: {}", report.unmapped_headers.join(", "));
    }
    for issue in &report.cell_issues {
        println!(
            "  - Row {}: could not read '{}' in column '{}'",
            issue.row, issue.value, issue.header
        );
    }

    files::save_dataset_file(out, &DatasetFile::new(dataset))
        .with_context(|| format!("Failed to write dataset: {}", out.display()))?;
    println!("Dataset written to '{}'", out.display());
    Ok(())
}

fn print_summary_report(title: &str, analysis: &Analysis) {
    let m = &analysis.metrics;

    println!("\n\n--- [Summary Report] {} ---", title);
    println!("========================================");
    println!(
        "Schedule: {} h shift, {} min breaks",
        analysis.schedule.working_hours, analysis.schedule.break_minutes
    );
    println!(
        "Customer demand: {} units/day",
        format_metric(analysis.dataset.customer_demand_per_day, 0)
    );
    println!("Data completeness: {}%", analysis.completeness_pct);
    println!("----------------------------------------");

    println!("\nFlow Metrics:");
    println!("  - Available Time:      {}", format_seconds(Some(m.available_time_sec)));
    println!("  - Takt Time:           {}", format_seconds(m.takt_time_sec));
    println!("  - Total Cycle Time:    {}", format_seconds(Some(m.total_cycle_time_sec)));
    println!("  - Total Changeover:    {}", format_seconds(Some(m.total_changeover_sec)));
    println!("  - Total Inventory:     {} units", m.total_inventory_units);
    println!("  - Inventory Days:      {}", format_metric(m.inventory_days, 2));
    println!("  - Value-Added Ratio:   {}%", format_metric(m.value_added_ratio_pct, 2));
    match &m.bottleneck {
        Some(b) => println!(
            "  - Bottleneck:          {} ({})",
            b.name,
            format_seconds(Some(b.cycle_time_sec))
        ),
        None => println!("  - Bottleneck:          N/A"),
    }
    println!(
        "  - Capacity per Shift:  {}",
        m.capacity_per_shift
            .map_or_else(|| "N/A".to_string(), |c| format!("{} units", c))
    );
    println!("  - Capacity Gap:        {}", format_metric(m.capacity_gap, 0));

    println!("\nProcess Steps:");
    for p in &m.processes {
        println!(
            "  - {:<16} | C/T: {:>7} | Uptime: {:>5.1}% | Efficiency: {:>5}%{}",
            p.name,
            format_seconds(Some(p.cycle_time_sec)),
            p.uptime_pct,
            format_metric(p.efficiency_pct, 1),
            if p.exceeds_takt { " | exceeds takt" } else { "" }
        );
    }

    let capacity_inputs = capacity_input_lines(&analysis.dataset);
    if !capacity_inputs.is_empty() {
        println!("\nCapacity Inputs:");
        for line in &capacity_inputs {
            println!("  - {}", line);
        }
    }

    if !analysis.findings.is_empty() {
        println!("\nRisk Findings:");
        for f in &analysis.findings {
            println!(
                "  - [{:?}] {}: {} ({:.0}% likely)",
                f.severity, f.process_name, f.description, f.probability_pct
            );
            println!("      -> {}", f.recommendation);
        }
    }

    let errors = analysis
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    if !analysis.issues.is_empty() {
        println!("\nValidation ({} errors):", errors);
        for issue in &analysis.issues {
            println!("  - [{:?}] {}", issue.severity, issue.message);
        }
    }

    for warning in m.warning_messages() {
        println!("Warning: {}", warning);
    }
    println!("========================================");
}

/// One line per step that declares its own shift count or available time.
fn capacity_input_lines(dataset: &Dataset) -> Vec<String> {
    dataset
        .processes
        .iter()
        .filter(|p| p.shift_count.is_some() || p.available_time_sec.is_some())
        .map(|p| {
            format!(
                "{:<16} | Shifts: {:>3} | Available: {}",
                p.name,
                p.shift_count.map_or_else(|| "-".to_string(), |n| n.to_string()),
                format_seconds(p.available_time_sec)
            )
        })
        .collect()
}
