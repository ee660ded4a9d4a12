//! The scenario files shipped in `scenarios/` load and behave as documented.

use std::path::PathBuf;

use idleworks_core::factory::UpgradeKind;
use idleworks_core::sim::RunOutcome;
use idleworks_data::{Scenario, load_scenario};

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../scenarios")
        .join(name)
}

#[test]
fn default_ron_matches_built_in_default() {
    let data = load_scenario(&scenario_path("default.ron")).unwrap();
    assert_eq!(data, Scenario::default_data());
}

#[test]
fn upgrade_rush_applies_capacity_upgrades() {
    let scenario = Scenario::load(&scenario_path("upgrade_rush.toml")).unwrap();
    assert!(scenario.pacer().is_none());

    let iron = scenario.registry.id_of("iron").unwrap();
    let (mut engine, minutes) = scenario.into_engine().unwrap();
    assert_eq!(minutes, 600);

    let first_iron = engine.factories_of(iron).next().unwrap();
    let factory = engine.factory(first_iron).unwrap();
    assert_eq!(factory.level(UpgradeKind::Capacity).get(), 3);

    let result = engine.run(minutes);
    assert_eq!(result.outcome, RunOutcome::TimeExhausted);
    assert_eq!(result.ticks_run, 600);
}
