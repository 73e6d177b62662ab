//! Shared dataset builders for the integration tests.
#![allow(dead_code)]

use valuestream_schemas::{dataset::Dataset, process::Process, schedule::WorkSchedule};

pub const EPS: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Two-step foundry line: Melt (300 s) feeding Cast (240 s, 600 units waiting).
pub fn melt_cast() -> Dataset {
    Dataset::new(
        Some(480.0),
        vec![
            Process::new("P1", "Melt").with_cycle_time(300.0),
            Process::new("P2", "Cast").with_cycle_time(240.0).with_wip(600.0),
        ],
    )
}

/// Steps named `names`, ids P1..Pn, every step with cycle time `ct`.
pub fn line(demand: Option<f64>, names: &[&str], ct: f64) -> Dataset {
    let processes = names
        .iter()
        .enumerate()
        .map(|(i, name)| Process::new(format!("P{}", i + 1), *name).with_cycle_time(ct))
        .collect();
    Dataset::new(demand, processes)
}

pub fn schedule(working_hours: f64, break_minutes: f64) -> WorkSchedule {
    WorkSchedule {
        working_hours,
        break_minutes,
    }
}
