//! Import boundary: tabular import, derived-table export and the guided session.
mod common;
use common::melt_cast;
use valuestream_core::{
    error::VsmError,
    export::{table_to_string, TABLE_HEADERS},
    intake::{
        session::{GuidedSession, Question, Speaker},
        tabular::import_csv_reader,
    },
    metrics::Metrics,
    validation::{validate, Field, Severity},
};
use valuestream_schemas::schedule::WorkSchedule;

const SHOP_FLOOR_CSV: &str = "\
Process,Cycle Time,Changeover,Uptime %,WIP,Demand
Melt,5 min,1h,92%,0,480
Cast,240,,85,600,
,,,,,
Trim,45s,10 min,0.9,20,
";

#[test]
fn test_import_converts_units_at_the_boundary() {
    let report = import_csv_reader(SHOP_FLOOR_CSV.as_bytes(), "shop_floor.csv").unwrap();
    let ds = &report.dataset;

    assert_eq!(ds.customer_demand_per_day, Some(480.0));
    assert_eq!(report.row_count(), 3);
    assert_eq!(report.skipped_rows, vec![3]);

    let ids: Vec<&str> = ds.processes.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2", "P3"]);

    let melt = &ds.processes[0];
    assert_eq!(melt.name, "Melt");
    assert_eq!(melt.cycle_time_sec, Some(300.0));
    assert_eq!(melt.changeover_sec, Some(3_600.0));
    assert_eq!(melt.uptime_pct, Some(92.0));
    assert_eq!(melt.wip_units, Some(0.0));

    let cast = &ds.processes[1];
    assert_eq!(cast.changeover_sec, None);
    assert_eq!(cast.wip_units, Some(600.0));

    // No guessing from magnitude: 0.9 stays 0.9 %.
    let trim = &ds.processes[2];
    assert_eq!(trim.cycle_time_sec, Some(45.0));
    assert_eq!(trim.changeover_sec, Some(600.0));
    assert_eq!(trim.uptime_pct, Some(0.9));
}

#[test]
fn test_unreadable_cells_are_reported_not_fatal() {
    let csv = "Step,CycleTimeSec,Notes\nCut,fast,keep blade sharp\n";
    let report = import_csv_reader(csv.as_bytes(), "inline").unwrap();

    assert_eq!(report.dataset.processes[0].cycle_time_sec, None);
    assert_eq!(report.cell_issues.len(), 1);
    assert_eq!(report.cell_issues[0].row, 1);
    assert_eq!(report.cell_issues[0].value, "fast");
    assert_eq!(report.unmapped_headers, vec!["Notes".to_string()]);
}

#[test]
fn test_missing_header_file_is_an_error() {
    let err = import_csv_reader("Colour,Size\nred,3\n".as_bytes(), "inline").unwrap_err();
    assert!(matches!(err, VsmError::Import { .. }));
}

#[test]
fn test_exported_table_reads_back_unchanged() {
    let mut ds = melt_cast();
    ds.processes[0].uptime_pct = Some(92.5);
    ds.processes[1].changeover_sec = Some(1_200.0);
    let metrics = Metrics::compute(&ds, &WorkSchedule::default()).unwrap();

    let table = table_to_string(&ds, &metrics).unwrap();
    let header = table.lines().next().unwrap();
    assert_eq!(header, TABLE_HEADERS.join(","));

    let report = import_csv_reader(table.as_bytes(), "export").unwrap();
    assert_eq!(report.dataset.processes.len(), 2);
    for (before, after) in ds.processes.iter().zip(&report.dataset.processes) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.cycle_time_sec, after.cycle_time_sec);
        assert_eq!(before.changeover_sec, after.changeover_sec);
        assert_eq!(before.uptime_pct, after.uptime_pct);
        assert_eq!(before.wip_units, after.wip_units);
    }
}

#[test]
fn test_guided_session_collects_a_full_dataset() {
    let mut session = GuidedSession::new();
    assert_eq!(session.transcript()[0].speaker, Speaker::System);
    assert_eq!(session.next_question(), Some(Question::CustomerDemand));

    session.answer("We ship 480 per day");
    assert_eq!(session.next_question(), Some(Question::ProcessNames));
    session.answer("Melt, Cast");
    assert_eq!(session.next_question(), Some(Question::CycleTimes));

    let replies = session.answer("300");
    assert!(replies[0].contains("2 values"));
    assert_eq!(session.next_question(), Some(Question::CycleTimes));

    session.answer("5 min, 240");
    session.answer("1h, 0");
    session.answer("92%, 85");
    assert_eq!(session.next_question(), Some(Question::Wip));
    let replies = session.answer("600");
    assert!(replies.last().unwrap().starts_with("All set"));
    assert!(session.is_complete());

    let ds = session.into_dataset();
    assert_eq!(ds.customer_demand_per_day, Some(480.0));
    assert_eq!(ds.processes[0].cycle_time_sec, Some(300.0));
    assert_eq!(ds.processes[0].changeover_sec, Some(3_600.0));
    assert_eq!(ds.processes[0].wip_units, Some(0.0));
    assert_eq!(ds.processes[1].uptime_pct, Some(85.0));
    assert_eq!(ds.processes[1].wip_units, Some(600.0));
}

#[test]
fn test_session_resumes_from_imported_table() {
    let mut session = GuidedSession::new();
    session.answer("480");
    let report = import_csv_reader("Step,CycleTimeSec\nA,30\nB,40\n".as_bytes(), "inline").unwrap();
    session.import_table(report);

    assert_eq!(session.draft().customer_demand_per_day, Some(480.0));
    assert_eq!(session.draft().processes.len(), 2);
    assert_eq!(session.next_question(), Some(Question::Changeovers));
}

#[test]
fn test_negative_duration_reaches_validation() {
    let table = "Process,Cycle Time,Demand\nCut,-5 min,480\n";
    let report = import_csv_reader(table.as_bytes(), "inline").unwrap();
    assert_eq!(report.dataset.processes[0].cycle_time_sec, Some(-300.0));

    let issues = validate(&report.dataset, &WorkSchedule::default());
    assert!(issues.iter().any(|i| i.field == Field::CycleTime
        && i.process_index == Some(0)
        && i.severity == Severity::Error));
}
