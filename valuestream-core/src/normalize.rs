//! Canonical, order-independent text form of a [`Dataset`], used only for seeding.
//!
//! Unset measurements are filled with the defaults defined on [`Process`], names
//! are trimmed and lowercased, and processes are sorted by normalized name. The
//! sort discards flow order: two datasets that differ only in step
//! order produce the same canonical string (and therefore the same seed), while
//! the layout engine still places them differently.

use serde_json::{json, Value};
use valuestream_schemas::{dataset::Dataset, process::Process};

/// Serializes `dataset` into its canonical form.
///
/// Object keys are emitted in sorted order (`serde_json::Map` is a `BTreeMap`),
/// so the output does not depend on field declaration or insertion order.
pub fn normalize(dataset: &Dataset) -> String {
    let mut records: Vec<(String, String, Value)> = dataset
        .processes
        .iter()
        .map(|p| {
            let record = canonical_process(p);
            let name = normalize_name(&p.name);
            let rendered = record.to_string();
            (name, rendered, record)
        })
        .collect();

    // Ties on name fall back to the full rendered record so equal names never
    // leak the caller's ordering into the output.
    records.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let processes: Vec<Value> = records.into_iter().map(|(_, _, record)| record).collect();
    let demand = canonical_number(dataset.customer_demand_per_day.unwrap_or(0.0));

    json!({
        "customerDemandPerDay": demand,
        "processes": processes,
    })
    .to_string()
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn canonical_process(process: &Process) -> Value {
    json!({
        "id": process.id,
        "name": normalize_name(&process.name),
        "cycleTimeSec": canonical_number(process.cycle_time_or_default()),
        "changeoverSec": canonical_number(process.changeover_or_default()),
        "uptimePct": canonical_number(process.uptime_or_default()),
        "wipUnits": canonical_number(process.wip_or_default()),
    })
}

// Adding +0.0 folds -0.0 into 0.0 so both spell the same.
fn canonical_number(value: f64) -> f64 {
    value + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dataset_has_stable_form() {
        let out = normalize(&Dataset::default());
        assert_eq!(out, r#"{"customerDemandPerDay":0.0,"processes":[]}"#);
    }

    #[test]
    fn negative_zero_is_folded() {
        let a = Dataset::new(None, vec![Process::new("P1", "Cut").with_wip(-0.0)]);
        let b = Dataset::new(None, vec![Process::new("P1", "Cut").with_wip(0.0)]);
        assert_eq!(normalize(&a), normalize(&b));
    }

    #[test]
    fn names_are_trimmed_and_lowercased() {
        assert_eq!(normalize_name("  Final Assembly "), "final assembly");
    }

    #[test]
    fn missing_fields_match_explicit_defaults() {
        let bare = Dataset::new(Some(480.0), vec![Process::new("P1", "Cut")]);
        let explicit = Dataset::new(
            Some(480.0),
            vec![Process::new("P1", "Cut")
                .with_cycle_time(0.0)
                .with_changeover(0.0)
                .with_uptime(100.0)
                .with_wip(0.0)],
        );
        assert_eq!(normalize(&bare), normalize(&explicit));

        let mut full_uptime = bare.clone();
        full_uptime.processes[0].uptime_pct = Some(100.0);
        assert_eq!(normalize(&bare), normalize(&full_uptime));
    }
}
