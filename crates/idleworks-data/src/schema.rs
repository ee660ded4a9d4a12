//! Serde data file structs for scenario definitions.
//!
//! These structs define the on-disk format of a scenario. They are
//! deserialized from RON, JSON, or TOML and then resolved into engine types
//! by [`crate::scenario::Scenario::from_data`].

use idleworks_core::factory::UpgradeKind;
use serde::{Deserialize, Serialize};

fn default_minutes() -> u64 {
    1000
}

fn default_pace_ms() -> u64 {
    100
}

/// A complete scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    /// Simulated minutes to run before giving up on the goal.
    #[serde(default = "default_minutes")]
    pub minutes: u64,
    /// Wall-clock milliseconds per simulated minute. Zero disables pacing.
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,
    pub materials: Vec<MaterialData>,
    #[serde(default)]
    pub opening: Vec<CommandData>,
}

/// A material definition in a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialData {
    pub name: String,
    /// Units per minute at production level 1.
    pub base_rate: f64,
    /// Cumulative target. Omit for materials that do not count toward the goal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<f64>,
}

/// A command issued before the first tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandData {
    /// Build a factory for the named material.
    Build { material: String },
    /// Upgrade the first factory built for the named material.
    Upgrade { material: String, kind: UpgradeKind },
}
