//! Simulation state and result types.

use crate::fixed::{Fixed64, Minutes};

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable simulation state tracked by the engine.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SimState {
    /// Minutes simulated so far. Incremented by 1 at the end of each tick.
    pub elapsed: Minutes,
    /// Whether the goal has been announced with a `GoalReached` event.
    pub goal_reached: bool,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Result of a single `Engine::tick()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickResult {
    /// The minute this tick simulated (elapsed time before the tick).
    pub minute: Minutes,
    /// Description of the action that finished this tick, if any.
    pub completed_action: Option<String>,
    /// Whether this tick ran a collection pass.
    pub collected: bool,
    /// Whether every required material is satisfied after this tick.
    pub goal_met: bool,
}

/// Why `Engine::run()` stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All collection targets were met.
    GoalReached,
    /// The minute budget ran out first.
    TimeExhausted,
}

/// Result of an `Engine::run()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub outcome: RunOutcome,
    /// Ticks executed by this call.
    pub ticks_run: u64,
    /// Elapsed minutes when the call returned.
    pub elapsed: Minutes,
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of simulation state for comparing runs.
///
/// Uses FNV-1a (64-bit). Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_state_starts_at_zero() {
        let state = SimState::new();
        assert_eq!(state.elapsed, 0);
        assert!(!state.goal_reached);
    }

    #[test]
    fn state_hash_deterministic() {
        let mut h1 = StateHash::new();
        h1.write_u64(42);
        h1.write_fixed64(Fixed64::from_num(14.017));

        let mut h2 = StateHash::new();
        h2.write_u64(42);
        h2.write_fixed64(Fixed64::from_num(14.017));

        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn state_hash_order_matters() {
        let mut h1 = StateHash::new();
        h1.write_u32(1);
        h1.write_u32(2);

        let mut h2 = StateHash::new();
        h2.write_u32(2);
        h2.write_u32(1);

        assert_ne!(h1.finish(), h2.finish());
    }
}
