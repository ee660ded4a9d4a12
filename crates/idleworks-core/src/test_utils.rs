//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::Engine;
use crate::event::{Event, EventKind};
use crate::fixed::{Fixed64, fixed64_to_f64};
use crate::id::MaterialId;
use crate::registry::{MaterialRegistry, MaterialRegistryBuilder};

// ===========================================================================
// Fixed-point helpers
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Fixed-point rounding makes exact f64 comparisons meaningless.
pub fn approx(actual: Fixed64, expected: f64) -> bool {
    (fixed64_to_f64(actual) - expected).abs() < 1e-4
}

// ===========================================================================
// Material constructors (standard registry order)
// ===========================================================================

pub fn wheat() -> MaterialId {
    MaterialId(0)
}
pub fn fruit() -> MaterialId {
    MaterialId(1)
}
pub fn iron() -> MaterialId {
    MaterialId(2)
}
pub fn water() -> MaterialId {
    MaterialId(3)
}
pub fn silver() -> MaterialId {
    MaterialId(4)
}

// ===========================================================================
// Registries
// ===========================================================================

/// The five materials of the stock game with their rates and targets.
pub fn standard_registry() -> MaterialRegistry {
    let mut b = MaterialRegistryBuilder::new();
    b.register("wheat", fixed(14.017), Some(fixed(75700.0)));
    b.register("fruit", fixed(42.733), Some(fixed(219000.0)));
    b.register("iron", fixed(40.217), Some(fixed(206000.0)));
    b.register("water", fixed(31.733), Some(fixed(164000.0)));
    b.register("silver", fixed(16.133), Some(fixed(86300.0)));
    b.build().expect("standard registry is valid")
}

/// One material called "ore" with the given rate and optional target.
pub fn single_material_registry(rate: f64, required: Option<f64>) -> MaterialRegistry {
    let mut b = MaterialRegistryBuilder::new();
    b.register("ore", fixed(rate), required.map(fixed));
    b.build().expect("single-material registry is valid")
}

/// One material with no target, so the goal is always met.
pub fn untargeted_registry() -> MaterialRegistry {
    single_material_registry(1.0, None)
}

// ===========================================================================
// Engine helpers
// ===========================================================================

pub fn standard_engine() -> Engine {
    Engine::new(standard_registry())
}

/// Record every delivered event of `kind` into a shared vector.
pub fn record_events(engine: &mut Engine, kind: EventKind) -> Rc<RefCell<Vec<Event>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    engine.on_event(
        kind,
        Box::new(move |event| sink.borrow_mut().push(event.clone())),
    );
    log
}

/// An engine with `count` factories cycling through the standard materials.
pub fn build_mixed_engine(count: usize) -> Engine {
    let mut engine = standard_engine();
    for i in 0..count {
        engine.build_factory(MaterialId((i % 5) as u32));
    }
    engine
}
