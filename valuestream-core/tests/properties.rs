//! Property-based tests for normalization, seeding and layout determinism.
use proptest::prelude::*;
use valuestream_core::{
    layout::{layout, Canvas},
    metrics::Metrics,
    normalize,
    seed::Seed,
};
use valuestream_schemas::{dataset::Dataset, process::Process, schedule::WorkSchedule};

fn measurement() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        Just(None),
        (0i32..5000).prop_map(|x| Some(x as f64 / 4.0)),
        (-50i32..0).prop_map(|x| Some(x as f64)),
    ]
}

type Measurements = (Option<f64>, Option<f64>, Option<f64>, Option<f64>);

fn process_fields() -> impl Strategy<Value = (String, Measurements)> {
    (
        "[A-Za-z ]{0,10}",
        (measurement(), measurement(), measurement(), measurement()),
    )
}

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    (
        prop_oneof![Just(None), (-10i32..2000).prop_map(|d| Some(d as f64))],
        prop::collection::vec(process_fields(), 0..10),
    )
        .prop_map(|(demand, fields)| {
            let processes = fields
                .into_iter()
                .enumerate()
                .map(|(i, (name, (ct, co, up, wip)))| Process {
                    cycle_time_sec: ct,
                    changeover_sec: co,
                    uptime_pct: up,
                    wip_units: wip,
                    ..Process::new(format!("P{}", i + 1), name)
                })
                .collect();
            Dataset::new(demand, processes)
        })
}

fn canvas_strategy() -> impl Strategy<Value = Canvas> {
    (200u32..3000, 100u32..1500).prop_map(|(w, h)| Canvas::new(w as f64, h as f64))
}

fn is_finite(value: Option<f64>) -> bool {
    value.map_or(true, f64::is_finite)
}

proptest! {
    #[test]
    fn layout_is_deterministic(ds in dataset_strategy(), canvas in canvas_strategy()) {
        let first = layout(&ds, canvas).unwrap();
        let second = layout(&ds.clone(), canvas).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn normalize_ignores_process_order(
        (ds, shuffled) in dataset_strategy().prop_flat_map(|ds| {
            let processes = ds.processes.clone();
            (Just(ds), Just(processes).prop_shuffle())
        })
    ) {
        let reordered = Dataset::new(ds.customer_demand_per_day, shuffled);
        prop_assert_eq!(normalize(&ds), normalize(&reordered));
        prop_assert_eq!(Seed::for_dataset(&ds), Seed::for_dataset(&reordered));
    }

    #[test]
    fn layout_has_one_edge_per_adjacent_pair(ds in dataset_strategy(), canvas in canvas_strategy()) {
        let result = layout(&ds, canvas).unwrap();
        prop_assert_eq!(result.nodes.len(), ds.processes.len());
        prop_assert_eq!(result.edges.len(), ds.processes.len().saturating_sub(1));
        for (edge, downstream) in result.edges.iter().zip(ds.processes.iter().skip(1)) {
            prop_assert_eq!(&edge.to, &downstream.id);
            prop_assert!(edge.wip >= 0.0);
        }
    }

    #[test]
    fn metrics_never_surface_nan_or_infinity(ds in dataset_strategy()) {
        let m = Metrics::compute(&ds, &WorkSchedule::default()).unwrap();
        prop_assert!(m.available_time_sec.is_finite());
        prop_assert!(is_finite(m.takt_time_sec));
        prop_assert!(is_finite(m.inventory_days));
        prop_assert!(is_finite(m.lead_time_sec));
        prop_assert!(is_finite(m.value_added_ratio_pct));
        prop_assert!(is_finite(m.capacity_gap));
        for p in &m.processes {
            prop_assert!(is_finite(p.efficiency_pct));
            prop_assert!(is_finite(p.wip_days));
            if let Some(e) = p.efficiency_pct {
                prop_assert!((0.0..=100.0).contains(&e));
            }
        }
    }
}

#[test]
fn json_key_order_does_not_change_normal_form() {
    let a: Dataset = serde_json::from_str(
        r#"{"customerDemandPerDay":480,"processes":[{"id":"P1","name":"Melt","cycleTimeSec":300,"wipUnits":5}]}"#,
    )
    .unwrap();
    let b: Dataset = serde_json::from_str(
        r#"{"processes":[{"wipUnits":5,"cycleTimeSec":300,"name":" MELT ","id":"P1"}],"customerDemandPerDay":480}"#,
    )
    .unwrap();
    assert_eq!(normalize(&a), normalize(&b));
}
