//! Data validation and completeness scoring.
mod common;
use common::{line, melt_cast, schedule};
use valuestream_core::validation::{completeness_pct, validate, Field, Severity};
use valuestream_schemas::{dataset::Dataset, process::Process};

#[test]
fn test_missing_demand_is_an_error() {
    let issues = validate(&line(None, &["A"], 10.0), &schedule(8.0, 30.0));
    assert!(issues
        .iter()
        .any(|i| i.field == Field::CustomerDemand && i.severity == Severity::Error));
}

#[test]
fn test_per_process_checks() {
    let ds = Dataset::new(
        Some(10.0),
        vec![
            Process::new("P1", "").with_cycle_time(-1.0),
            Process::new("P2", "Oven").with_cycle_time(4_000.0).with_uptime(40.0),
            Process::new("P3", "Pack").with_changeover(-5.0).with_uptime(101.0),
        ],
    );
    let issues = validate(&ds, &schedule(8.0, 30.0));
    let has = |field: Field, index: usize, severity: Severity| {
        issues
            .iter()
            .any(|i| i.field == field && i.process_index == Some(index) && i.severity == severity)
    };

    assert!(has(Field::ProcessName, 0, Severity::Error));
    assert!(has(Field::CycleTime, 0, Severity::Error));
    assert!(has(Field::CycleTime, 1, Severity::Warning));
    assert!(has(Field::Uptime, 1, Severity::Warning));
    assert!(has(Field::CycleTime, 2, Severity::Error));
    assert!(has(Field::ChangeoverTime, 2, Severity::Error));
    assert!(has(Field::Uptime, 2, Severity::Error));
}

#[test]
fn test_bottleneck_warning_follows_configured_schedule() {
    // 480/day: takt is 56.25 s on 8h/30m but 75 s on a 10 h day without breaks.
    let ds = line(Some(480.0), &["A"], 70.0);

    let standard = validate(&ds, &schedule(8.0, 30.0));
    assert!(standard.iter().any(|i| i.message.contains("BOTTLENECK")));

    let long_day = validate(&ds, &schedule(10.0, 0.0));
    assert!(long_day.iter().all(|i| !i.message.contains("BOTTLENECK")));
}

#[test]
fn test_complete_dataset_has_no_errors() {
    let mut ds = melt_cast();
    for p in &mut ds.processes {
        p.changeover_sec = Some(0.0);
        p.uptime_pct = Some(95.0);
    }
    let issues = validate(&ds, &schedule(8.0, 30.0));
    assert!(issues.iter().all(|i| i.severity != Severity::Error));
}

#[test]
fn test_completeness_score() {
    assert_eq!(completeness_pct(&Dataset::default()), 0);

    let core_only = Dataset::new(
        Some(100.0),
        vec![Process::new("P1", "Cut")
            .with_cycle_time(60.0)
            .with_changeover(0.0)
            .with_uptime(95.0)],
    );
    assert_eq!(completeness_pct(&core_only), 83);

    let mut full = core_only.clone();
    full.processes[0].wip_units = Some(10.0);
    full.processes[0].operators = Some(2);
    assert_eq!(completeness_pct(&full), 100);

    let bare = Dataset::new(None, vec![Process::new("P1", "")]);
    assert_eq!(completeness_pct(&bare), 0);
}
