//! Presentation pacing.
//!
//! A [`Pacer`] runs after every tick and may slow the loop down so a viewer
//! can follow the output. It never sees or changes simulation state, so
//! results are identical with any pacer.

use std::time::Duration;

use crate::fixed::Minutes;

/// Called once after each completed tick.
pub trait Pacer {
    fn pace(&mut self, minute: Minutes);
}

/// Runs ticks back to back. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pace(&mut self, _minute: Minutes) {}
}

/// Sleeps a fixed wall-clock duration per simulated minute.
#[derive(Debug, Clone, Copy)]
pub struct SleepPacing {
    pub per_minute: Duration,
}

impl SleepPacing {
    pub fn new(per_minute: Duration) -> Self {
        Self { per_minute }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl Pacer for SleepPacing {
    fn pace(&mut self, _minute: Minutes) {
        if !self.per_minute.is_zero() {
            std::thread::sleep(self.per_minute);
        }
    }
}

impl<F: FnMut(Minutes)> Pacer for F {
    fn pace(&mut self, minute: Minutes) {
        self(minute)
    }
}
