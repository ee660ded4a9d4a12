//! Idleworks Core -- the simulation engine for an idle production game.
//!
//! Factories turn simulated minutes into materials, the player spends time
//! on builds and upgrades, and a run ends once every material target has
//! been collected or the minute budget runs out.
//!
//! # Tick
//!
//! Each call to [`engine::Engine::tick`] advances the simulation by one
//! minute:
//!
//! 1. **Actions** -- the head of the FIFO action queue counts down one minute.
//! 2. **Produce** -- every factory produces, clamped to its capacity.
//! 3. **Collect** -- every tenth minute, starting at minute 0, factories are
//!    drained into the run's collected totals.
//! 4. **Bookkeeping** -- elapsed time advances, events are delivered.
//!
//! ```rust,ignore
//! let mut builder = MaterialRegistryBuilder::new();
//! let wheat = builder.register("wheat", f64_to_fixed64(14.017), Some(f64_to_fixed64(75700.0)));
//! let mut engine = Engine::new(builder.build()?);
//! engine.build_factory(wheat);
//! let result = engine.run(1000);
//! ```
//!
//! # Key Types
//!
//! - [`engine::Engine`] -- Owns factories, the action queue and the totals.
//! - [`factory::Factory`] -- Production/capacity levels and per-minute yield.
//! - [`action::ActionQueue`] -- Sequential build/upgrade timers.
//! - [`event::EventBus`] -- Buffered, typed events for display layers.
//! - [`registry::MaterialRegistry`] -- Base rates and collection targets.
//! - [`clock::Pacer`] -- Optional wall-clock pacing between ticks.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.

pub mod action;
pub mod clock;
pub mod engine;
pub mod event;
pub mod factory;
pub mod fixed;
pub mod id;
pub mod query;
pub mod registry;
pub mod sim;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
