//! Resolution of scenario data into a ready-to-run engine.

use std::path::Path;
use std::time::Duration;

use idleworks_core::clock::SleepPacing;
use idleworks_core::engine::Engine;
use idleworks_core::factory::UpgradeKind;
use idleworks_core::fixed::{Fixed64, Minutes, checked_f64_to_fixed64};
use idleworks_core::id::MaterialId;
use idleworks_core::registry::{MaterialRegistry, MaterialRegistryBuilder};
use tracing::{debug, warn};

use crate::loader::{ScenarioError, load_scenario};
use crate::schema::{CommandData, MaterialData, ScenarioData};

/// Convert a file-supplied quantity, rejecting values Q32.32 cannot hold.
fn to_fixed(
    material: &MaterialData,
    field: &'static str,
    value: f64,
) -> Result<Fixed64, ScenarioError> {
    checked_f64_to_fixed64(value).ok_or_else(|| ScenarioError::OutOfRange {
        name: material.name.clone(),
        field,
        value,
    })
}

/// An opening command with its material resolved against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningCommand {
    Build(MaterialId),
    Upgrade(MaterialId, UpgradeKind),
}

/// A validated scenario: registry, run length, pacing and opening moves.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub registry: MaterialRegistry,
    pub minutes: Minutes,
    pub pace: Duration,
    pub opening: Vec<OpeningCommand>,
}

impl Scenario {
    /// Validate materials and resolve every command's material name.
    pub fn from_data(data: ScenarioData) -> Result<Self, ScenarioError> {
        let mut builder = MaterialRegistryBuilder::new();
        for m in &data.materials {
            let base_rate = to_fixed(m, "base_rate", m.base_rate)?;
            let required = m
                .required
                .map(|r| to_fixed(m, "required", r))
                .transpose()?;
            builder.register(&m.name, base_rate, required);
        }
        let registry = builder.build()?;

        let resolve = |name: &str| {
            registry
                .id_of(name)
                .ok_or_else(|| ScenarioError::UnknownMaterial {
                    name: name.to_string(),
                })
        };
        let opening = data
            .opening
            .iter()
            .map(|cmd| match cmd {
                CommandData::Build { material } => resolve(material).map(OpeningCommand::Build),
                CommandData::Upgrade { material, kind } => {
                    resolve(material).map(|id| OpeningCommand::Upgrade(id, *kind))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            registry,
            minutes: data.minutes,
            pace: Duration::from_millis(data.pace_ms),
            opening,
        })
    }

    /// Load and resolve a scenario file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_data(load_scenario(path)?)
    }

    /// The stock game: five materials, 1000 minutes, wheat and fruit
    /// factories built up front.
    pub fn default_data() -> ScenarioData {
        let material = |name: &str, base_rate: f64, required: f64| MaterialData {
            name: name.to_string(),
            base_rate,
            required: Some(required),
        };
        ScenarioData {
            minutes: 1000,
            pace_ms: 100,
            materials: vec![
                material("wheat", 14.017, 75700.0),
                material("fruit", 42.733, 219000.0),
                material("iron", 40.217, 206000.0),
                material("water", 31.733, 164000.0),
                material("silver", 16.133, 86300.0),
            ],
            opening: vec![
                CommandData::Build {
                    material: "wheat".into(),
                },
                CommandData::Build {
                    material: "fruit".into(),
                },
            ],
        }
    }

    pub fn default_scenario() -> Result<Self, ScenarioError> {
        Self::from_data(Self::default_data())
    }

    /// `None` when pacing is disabled.
    pub fn pacer(&self) -> Option<SleepPacing> {
        (!self.pace.is_zero()).then(|| SleepPacing::new(self.pace))
    }

    /// Create an engine and play the opening commands.
    pub fn build_engine(&self) -> Result<Engine, ScenarioError> {
        let mut engine = Engine::new(self.registry.clone());
        for cmd in &self.opening {
            match *cmd {
                OpeningCommand::Build(material) => {
                    if engine.build_factory(material).is_none() {
                        warn!(
                            material = %self.registry.name(material),
                            "opening build ignored at factory cap"
                        );
                    }
                }
                OpeningCommand::Upgrade(material, kind) => {
                    let factory = engine.factories_of(material).next().ok_or_else(|| {
                        ScenarioError::NoFactory {
                            material: self.registry.name(material).to_string(),
                        }
                    })?;
                    engine.upgrade_factory(factory, kind);
                }
            }
        }
        debug!(
            factories = engine.factory_count(),
            queued = engine.queue_len(),
            "opening applied"
        );
        Ok(engine)
    }

    /// Consume the scenario, returning the engine and the run length.
    pub fn into_engine(self) -> Result<(Engine, Minutes), ScenarioError> {
        let engine = self.build_engine()?;
        Ok((engine, self.minutes))
    }
}
