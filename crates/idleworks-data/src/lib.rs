//! Scenario files for Idleworks.
//!
//! A scenario names the materials of a run (base rate and collection
//! target), the run length, wall-clock pacing, and the builds and upgrades
//! issued before the first tick. Files may be RON, TOML or JSON.

pub mod loader;
pub mod scenario;
pub mod schema;

pub use loader::{Format, ScenarioError, load_scenario, parse_scenario};
pub use scenario::{OpeningCommand, Scenario};
pub use schema::{CommandData, MaterialData, ScenarioData};
