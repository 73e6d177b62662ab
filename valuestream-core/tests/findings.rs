//! Ordering and threshold tests for risk findings.
mod common;
use common::melt_cast;
use valuestream_core::{
    findings::{findings, FindingKind, RiskLevel},
    metrics::Metrics,
};
use valuestream_schemas::{dataset::Dataset, process::Process, schedule::WorkSchedule};

fn findings_for(ds: &Dataset) -> Vec<(String, FindingKind, RiskLevel)> {
    let m = Metrics::compute(ds, &WorkSchedule::default()).unwrap();
    findings(&m)
        .into_iter()
        .map(|f| (f.process_name, f.kind, f.severity))
        .collect()
}

#[test]
fn test_findings_sorted_by_severity_then_probability() {
    // Demand 100 gives a 270 s takt.
    let ds = Dataset::new(
        Some(100.0),
        vec![
            Process::new("P1", "Cut").with_cycle_time(300.0).with_uptime(80.0),
            Process::new("P2", "Weld")
                .with_cycle_time(100.0)
                .with_uptime(60.0)
                .with_changeover(8_000.0),
            Process::new("P3", "Paint").with_cycle_time(100.0).with_wip(400.0),
        ],
    );

    let got = findings_for(&ds);
    let expected = vec![
        ("Weld".to_string(), FindingKind::Downtime, RiskLevel::High),
        ("Weld".to_string(), FindingKind::Changeover, RiskLevel::High),
        ("Paint".to_string(), FindingKind::Inventory, RiskLevel::Medium),
        ("Cut".to_string(), FindingKind::Downtime, RiskLevel::Medium),
        ("Cut".to_string(), FindingKind::Bottleneck, RiskLevel::Low),
    ];
    assert_eq!(got, expected);
}

#[test]
fn test_equal_findings_keep_flow_order() {
    let got = findings_for(&melt_cast());
    assert_eq!(
        got,
        vec![
            ("Melt".to_string(), FindingKind::Bottleneck, RiskLevel::High),
            ("Cast".to_string(), FindingKind::Bottleneck, RiskLevel::High),
        ]
    );
}

#[test]
fn test_probabilities_are_capped() {
    let m = Metrics::compute(&melt_cast(), &WorkSchedule::default()).unwrap();
    let all = findings(&m);
    assert!(all.iter().all(|f| f.probability_pct == 95.0));
    assert!(all.iter().all(|f| !f.recommendation.is_empty()));
}

#[test]
fn test_no_bottleneck_findings_without_demand() {
    let mut ds = melt_cast();
    ds.customer_demand_per_day = None;
    let got = findings_for(&ds);
    assert!(got.iter().all(|(_, kind, _)| *kind != FindingKind::Bottleneck));
    assert!(got.iter().all(|(_, kind, _)| *kind != FindingKind::Inventory));
}

#[test]
fn test_unnamed_step_is_labelled_by_position() {
    let ds = Dataset::new(
        Some(100.0),
        vec![Process::new("P1", " ").with_cycle_time(10.0).with_uptime(50.0)],
    );
    let got = findings_for(&ds);
    assert_eq!(got[0].0, "Process 1");
}
