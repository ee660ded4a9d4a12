//! The simulation engine: owns the factories, the action queue and the
//! collected totals, and advances them one simulated minute at a time.
//!
//! # Architecture
//!
//! The `Engine` owns:
//! - A frozen [`MaterialRegistry`] (base rates and collection targets)
//! - Up to [`MAX_FACTORIES`] [`Factory`] values, kept in build order
//! - An [`ActionQueue`] of build/upgrade timers
//! - Collected totals per material
//! - A [`SimState`] (elapsed minutes)
//! - An [`EventBus`] for typed simulation events
//! - A [`Pacer`] invoked after every tick
//!
//! # Tick
//!
//! Each `tick()` runs:
//! 1. **Actions** -- the head of the action queue loses one minute; a
//!    finished head is removed
//! 2. **Produce** -- every factory produces for one minute
//! 3. **Collect** -- on minutes divisible by [`COLLECTION_INTERVAL`]
//!    (including minute 0) every factory is drained into the totals
//! 4. **Bookkeeping** -- elapsed time advances, the goal is checked, events
//!    are delivered and the pacer runs

use slotmap::SlotMap;
use tracing::{debug, info, trace};

use crate::action::{ActionKind, ActionQueue, PendingAction};
use crate::clock::{NoPacing, Pacer};
use crate::event::{Event, EventBus, EventKind, PassiveListener};
use crate::factory::{Factory, UpgradeKind};
use crate::fixed::{Fixed64, Minutes};
use crate::id::{FactoryId, MaterialId};
use crate::query::{FactorySnapshot, MaterialTotal, StatusSnapshot};
use crate::registry::MaterialRegistry;
use crate::sim::{RunOutcome, RunResult, SimState, StateHash, TickResult};

/// Most factories a run may own.
pub const MAX_FACTORIES: usize = 12;

/// Minutes a factory build occupies the action queue.
pub const BUILD_MINUTES: Minutes = 2;

/// Production upgrade time per level reached.
pub const PRODUCTION_UPGRADE_MINUTES: Minutes = 30;

/// Capacity upgrade time per level reached.
pub const CAPACITY_UPGRADE_MINUTES: Minutes = 15;

/// Factories are drained every this many minutes.
pub const COLLECTION_INTERVAL: Minutes = 10;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Engine {
    registry: MaterialRegistry,

    factories: SlotMap<FactoryId, Factory>,

    /// Factory IDs in the order they were built.
    build_order: Vec<FactoryId>,

    /// Collected totals, indexed by `MaterialId`.
    collected: Vec<Fixed64>,

    actions: ActionQueue,

    pub sim_state: SimState,

    /// Typed event bus for simulation events.
    pub event_bus: EventBus,

    pacer: Box<dyn Pacer>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("factories", &self.factories)
            .field("build_order", &self.build_order)
            .field("collected", &self.collected)
            .field("actions", &self.actions)
            .field("sim_state", &self.sim_state)
            .field("event_bus", &self.event_bus)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine with no factories, an empty queue and no pacing.
    pub fn new(registry: MaterialRegistry) -> Self {
        let collected = vec![Fixed64::ZERO; registry.len()];
        Self {
            registry,
            factories: SlotMap::with_key(),
            build_order: Vec::with_capacity(MAX_FACTORIES),
            collected,
            actions: ActionQueue::new(),
            sim_state: SimState::new(),
            event_bus: EventBus::default(),
            pacer: Box::new(NoPacing),
        }
    }

    /// Replace the pacer run after every tick.
    pub fn set_pacer(&mut self, pacer: impl Pacer + 'static) {
        self.pacer = Box::new(pacer);
    }

    /// Keep up to `max_history` completed actions for inspection.
    pub fn set_action_history(&mut self, max_history: usize) {
        let mut queue = ActionQueue::with_max_history(max_history);
        for action in self.actions.iter() {
            queue.enqueue(action.clone());
        }
        self.actions = queue;
    }

    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    pub fn elapsed(&self) -> Minutes {
        self.sim_state.elapsed
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Build a level 1/1 factory for `material` and queue its build timer.
    ///
    /// Returns `None` without touching any state when the factory cap is
    /// reached or the material is not registered. The new factory produces
    /// from the very next tick; the build timer does not gate it.
    pub fn build_factory(&mut self, material: MaterialId) -> Option<FactoryId> {
        if self.factories.len() >= MAX_FACTORIES {
            debug!(material = material.0, "factory cap reached, build ignored");
            return None;
        }
        let def = self.registry.get(material)?;
        let description = format!("Build {} factory", def.name);

        let id = self.factories.insert(Factory::new(material, def.base_rate));
        self.build_order.push(id);
        debug!(
            material = %self.registry.name(material),
            count = self.build_order.len(),
            "factory built"
        );

        self.event_bus.emit(Event::FactoryBuilt {
            factory: id,
            material,
            minute: self.sim_state.elapsed,
        });
        self.queue(ActionKind::Build { factory: id }, BUILD_MINUTES, description);
        Some(id)
    }

    /// Append an arbitrary timed action to the queue.
    pub fn enqueue_action(&mut self, duration: Minutes, description: impl Into<String>) {
        self.queue(ActionKind::Custom, duration, description.into());
    }

    /// Upgrade one level of a factory and queue the upgrade timer.
    ///
    /// The timer is `30 × production level` or `15 × capacity level`, using
    /// the level after the upgrade. A factory already at level 6 keeps its
    /// level but the timer is still queued at the capped level. Returns
    /// `false` only for an unknown factory.
    pub fn upgrade_factory(&mut self, factory: FactoryId, kind: UpgradeKind) -> bool {
        let Some(f) = self.factories.get_mut(factory) else {
            return false;
        };
        let changed = f.upgrade(kind);
        let level = f.level(kind);
        let name = self.registry.name(f.material()).to_string();

        let (action, duration) = match kind {
            UpgradeKind::Production => (
                ActionKind::UpgradeProduction { factory, level },
                PRODUCTION_UPGRADE_MINUTES * Minutes::from(level.get()),
            ),
            UpgradeKind::Capacity => (
                ActionKind::UpgradeCapacity { factory, level },
                CAPACITY_UPGRADE_MINUTES * Minutes::from(level.get()),
            ),
        };
        debug!(material = %name, %kind, %level, changed, "factory upgraded");

        self.event_bus.emit(Event::FactoryUpgraded {
            factory,
            kind,
            level,
            changed,
            minute: self.sim_state.elapsed,
        });
        self.queue(
            action,
            duration,
            format!("Upgrade {kind} of {name} to level {level}"),
        );
        true
    }

    fn queue(&mut self, kind: ActionKind, duration: Minutes, description: String) {
        self.event_bus.emit(Event::ActionQueued {
            kind,
            duration,
            description: description.clone(),
            minute: self.sim_state.elapsed,
        });
        self.actions
            .enqueue(PendingAction::new(kind, duration, description));
    }

    /// Drain every factory into the collected totals, in build order.
    /// Returns the total amount moved across all materials.
    pub fn collect_all(&mut self) -> Fixed64 {
        let minute = self.sim_state.elapsed;
        let mut moved = Fixed64::ZERO;
        for &id in &self.build_order {
            let factory = &mut self.factories[id];
            let material = factory.material();
            let amount = factory.collect();

            let total = &mut self.collected[material.index()];
            *total = total.saturating_add(amount);
            moved = moved.saturating_add(amount);

            trace!(material = %self.registry.name(material), %amount, "collected");
            self.event_bus.emit(Event::MaterialCollected {
                factory: id,
                material,
                amount,
                minute,
            });
        }
        moved
    }

    // -----------------------------------------------------------------------
    // Advance
    // -----------------------------------------------------------------------

    /// Simulate one minute.
    pub fn tick(&mut self) -> TickResult {
        let minute = self.sim_state.elapsed;

        let completed_action = self.phase_actions(minute);
        self.phase_produce();
        let collected = minute % COLLECTION_INTERVAL == 0;
        if collected {
            self.collect_all();
        }

        self.sim_state.elapsed += 1;
        let goal_met = self.is_goal_met();
        if goal_met && !self.sim_state.goal_reached {
            self.sim_state.goal_reached = true;
            info!(minute, "all materials collected");
            self.event_bus.emit(Event::GoalReached { minute });
        }

        self.event_bus.deliver();
        self.pacer.pace(minute);

        TickResult {
            minute,
            completed_action,
            collected,
            goal_met,
        }
    }

    /// Tick until `total_minutes` have elapsed, stopping right after the
    /// first tick on which every target is met.
    pub fn run(&mut self, total_minutes: Minutes) -> RunResult {
        let mut ticks_run = 0;
        while self.sim_state.elapsed < total_minutes {
            let result = self.tick();
            ticks_run += 1;
            if result.goal_met {
                return RunResult {
                    outcome: RunOutcome::GoalReached,
                    ticks_run,
                    elapsed: self.sim_state.elapsed,
                };
            }
        }

        info!(elapsed = self.sim_state.elapsed, "time budget exhausted");
        RunResult {
            outcome: RunOutcome::TimeExhausted,
            ticks_run,
            elapsed: self.sim_state.elapsed,
        }
    }

    fn phase_actions(&mut self, minute: Minutes) -> Option<String> {
        let done = self.actions.advance(minute)?;
        debug!(minute, description = %done.description, "action complete");
        self.event_bus.emit(Event::ActionCompleted {
            kind: done.kind,
            description: done.description.clone(),
            minute,
        });
        Some(done.description)
    }

    fn phase_produce(&mut self) {
        for &id in &self.build_order {
            self.factories[id].produce(1);
        }
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Register a passive listener for an event kind. Listeners registered
    /// on several kinds see events in the order they were emitted.
    pub fn on_event(&mut self, kind: EventKind, listener: PassiveListener) {
        self.event_bus.on(kind, listener);
    }

    /// Suppress an event kind. Suppressed events are never buffered.
    pub fn suppress_event(&mut self, kind: EventKind) {
        self.event_bus.suppress(kind);
    }

    /// Deliver events emitted since the last tick (builds, upgrades, manual
    /// collections) without advancing time.
    pub fn flush_events(&mut self) -> usize {
        self.event_bus.deliver()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// True when every material with a target has reached it. Vacuously
    /// true when no material has a target.
    pub fn is_goal_met(&self) -> bool {
        self.registry
            .targets()
            .all(|(id, required)| self.collected[id.index()] >= required)
    }

    pub fn collected(&self, material: MaterialId) -> Fixed64 {
        self.collected
            .get(material.index())
            .copied()
            .unwrap_or(Fixed64::ZERO)
    }

    /// Fraction of the target collected, capped at 1. `None` for materials
    /// without a target.
    pub fn progress(&self, material: MaterialId) -> Option<Fixed64> {
        let required = self.registry.get(material)?.required?;
        if required == Fixed64::ZERO {
            return Some(Fixed64::ONE);
        }
        let ratio = self.collected(material).saturating_div(required);
        Some(ratio.min(Fixed64::ONE))
    }

    pub fn factory(&self, id: FactoryId) -> Option<&Factory> {
        self.factories.get(id)
    }

    pub fn factory_count(&self) -> usize {
        self.build_order.len()
    }

    /// Factories in build order.
    pub fn factories(&self) -> impl Iterator<Item = (FactoryId, &Factory)> {
        self.build_order.iter().map(|&id| (id, &self.factories[id]))
    }

    /// Factories of one material, in build order.
    pub fn factories_of(&self, material: MaterialId) -> impl Iterator<Item = FactoryId> + '_ {
        self.factories()
            .filter(move |(_, f)| f.material() == material)
            .map(|(id, _)| id)
    }

    pub fn actions(&self) -> &ActionQueue {
        &self.actions
    }

    pub fn queue_len(&self) -> usize {
        self.actions.len()
    }

    pub fn snapshot_factory(&self, id: FactoryId) -> Option<FactorySnapshot> {
        let f = self.factories.get(id)?;
        Some(FactorySnapshot {
            id,
            material: f.material(),
            production_level: f.production_level(),
            capacity_level: f.capacity_level(),
            rate: f.effective_production_rate(),
            capacity: f.effective_capacity(),
            accumulated: f.accumulated(),
            total_collected: f.total_collected(),
        })
    }

    pub fn snapshot_all_factories(&self) -> Vec<FactorySnapshot> {
        self.build_order
            .iter()
            .filter_map(|&id| self.snapshot_factory(id))
            .collect()
    }

    /// Elapsed time, factory count, per-material totals and queue length.
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            elapsed: self.sim_state.elapsed,
            factory_count: self.factory_count(),
            collected: self
                .registry
                .iter()
                .map(|(id, def)| MaterialTotal {
                    material: id,
                    name: def.name.clone(),
                    collected: self.collected(id),
                    required: def.required,
                })
                .collect(),
            queue_len: self.actions.len(),
        }
    }

    /// Hash of everything that affects future ticks.
    pub fn state_hash(&self) -> u64 {
        let mut hash = StateHash::new();
        hash.write_u64(self.sim_state.elapsed);
        for (_, f) in self.factories() {
            hash.write_u32(f.material().0);
            hash.write(&[f.production_level().get(), f.capacity_level().get()]);
            hash.write_fixed64(f.accumulated());
            hash.write_fixed64(f.total_collected());
        }
        for total in &self.collected {
            hash.write_fixed64(*total);
        }
        for action in self.actions.iter() {
            hash.write_u64(action.duration);
            hash.write_u64(action.remaining);
        }
        hash.finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
