//! Factories: per-material producers with upgradable rate and storage.
//!
//! A factory accumulates output every minute at its effective production
//! rate until it reaches its effective capacity. Anything produced beyond
//! capacity is discarded; the stock only drains when it is collected.
//!
//! Both effective values are pure functions of the base rate and the two
//! upgrade levels, looked up in fixed multiplier tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fixed::{Fixed64, Minutes, minutes_to_fixed64};
use crate::id::MaterialId;

// ---------------------------------------------------------------------------
// Multiplier tables
// ---------------------------------------------------------------------------

/// Production rate multiplier per level. Entry `i` belongs to level `i + 1`.
pub const PRODUCTION_MULTIPLIERS: [f64; Level::COUNT] = [1.0, 1.6, 2.198, 2.788, 3.374, 3.98];

/// Capacity multiplier (applied on top of the production rate) per level.
/// Entry `i` belongs to level `i + 1`.
pub const CAPACITY_MULTIPLIERS: [f64; Level::COUNT] = [4.0, 7.16, 12.67, 22.56, 40.18, 100.45];

/// Production multiplier for a level.
pub fn production_multiplier(level: Level) -> Fixed64 {
    Fixed64::from_num(PRODUCTION_MULTIPLIERS[level.table_index()])
}

/// Capacity multiplier for a level.
pub fn capacity_multiplier(level: Level) -> Fixed64 {
    Fixed64::from_num(CAPACITY_MULTIPLIERS[level.table_index()])
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// An upgrade tier in `1..=6`.
///
/// Levels are 1-based while the multiplier tables are 0-based. The mapping
/// between the two lives only in [`Level::table_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(6);
    pub const COUNT: usize = 6;

    /// Returns `None` outside `1..=6`.
    pub fn new(value: u8) -> Option<Level> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&value)
            .then_some(Level(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Level `L` reads table entry `L - 1`.
    pub fn table_index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// The next level, or `None` at the cap.
    pub fn next(self) -> Option<Level> {
        Level::new(self.0 + 1)
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    /// All levels, lowest first.
    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN.0..=Self::MAX.0).map(Level)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Level {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value).ok_or(InvalidLevel(value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("level {0} is outside 1..=6")]
pub struct InvalidLevel(pub u8);

// ---------------------------------------------------------------------------
// Upgrade kind
// ---------------------------------------------------------------------------

/// Which of a factory's two levels an upgrade targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    Production,
    Capacity,
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeKind::Production => f.write_str("production"),
            UpgradeKind::Capacity => f.write_str("capacity"),
        }
    }
}

impl FromStr for UpgradeKind {
    type Err = UnknownUpgradeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(UpgradeKind::Production),
            "capacity" => Ok(UpgradeKind::Capacity),
            other => Err(UnknownUpgradeKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown upgrade kind '{0}' (expected 'production' or 'capacity')")]
pub struct UnknownUpgradeKind(pub String);

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// A single producer of one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factory {
    material: MaterialId,
    base_rate: Fixed64,
    production_level: Level,
    capacity_level: Level,
    /// Uncollected output, always in `[0, effective_capacity()]`.
    accumulated: Fixed64,
    /// Everything ever collected from this factory.
    total_collected: Fixed64,
}

impl Factory {
    /// A fresh level 1/1 factory with nothing accumulated.
    pub fn new(material: MaterialId, base_rate: Fixed64) -> Self {
        Self {
            material,
            base_rate,
            production_level: Level::MIN,
            capacity_level: Level::MIN,
            accumulated: Fixed64::ZERO,
            total_collected: Fixed64::ZERO,
        }
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn base_rate(&self) -> Fixed64 {
        self.base_rate
    }

    pub fn production_level(&self) -> Level {
        self.production_level
    }

    pub fn capacity_level(&self) -> Level {
        self.capacity_level
    }

    pub fn level(&self, kind: UpgradeKind) -> Level {
        match kind {
            UpgradeKind::Production => self.production_level,
            UpgradeKind::Capacity => self.capacity_level,
        }
    }

    pub fn accumulated(&self) -> Fixed64 {
        self.accumulated
    }

    pub fn total_collected(&self) -> Fixed64 {
        self.total_collected
    }

    /// Units per minute at the current production level.
    pub fn effective_production_rate(&self) -> Fixed64 {
        self.base_rate
            .saturating_mul(production_multiplier(self.production_level))
    }

    /// Maximum uncollected stock at the current levels.
    pub fn effective_capacity(&self) -> Fixed64 {
        self.effective_production_rate()
            .saturating_mul(capacity_multiplier(self.capacity_level))
    }

    /// Whether the stock has hit the ceiling.
    pub fn is_full(&self) -> bool {
        self.accumulated >= self.effective_capacity()
    }

    /// Run production for `minutes`. Output past capacity is discarded.
    pub fn produce(&mut self, minutes: Minutes) {
        let produced = self
            .effective_production_rate()
            .saturating_mul(minutes_to_fixed64(minutes));
        self.accumulated = self
            .accumulated
            .saturating_add(produced)
            .min(self.effective_capacity());
    }

    /// Drain the stock. Returns the amount drained.
    pub fn collect(&mut self) -> Fixed64 {
        let collected = self.accumulated;
        self.total_collected = self.total_collected.saturating_add(collected);
        self.accumulated = Fixed64::ZERO;
        collected
    }

    /// Raise the production level by one. No-op at the cap; returns whether
    /// the level changed.
    pub fn upgrade_production(&mut self) -> bool {
        bump(&mut self.production_level)
    }

    /// Raise the capacity level by one. No-op at the cap; returns whether
    /// the level changed.
    pub fn upgrade_capacity(&mut self) -> bool {
        bump(&mut self.capacity_level)
    }

    pub fn upgrade(&mut self, kind: UpgradeKind) -> bool {
        match kind {
            UpgradeKind::Production => self.upgrade_production(),
            UpgradeKind::Capacity => self.upgrade_capacity(),
        }
    }
}

fn bump(level: &mut Level) -> bool {
    match level.next() {
        Some(next) => {
            *level = next;
            true
        }
        None => false,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{f64_to_fixed64, fixed64_to_f64};

    fn wheat_factory() -> Factory {
        Factory::new(MaterialId(0), f64_to_fixed64(14.017))
    }

    fn close(a: Fixed64, b: f64) -> bool {
        (fixed64_to_f64(a) - b).abs() < 1e-4
    }

    // -----------------------------------------------------------------------
    // Level
    // -----------------------------------------------------------------------

    #[test]
    fn level_bounds() {
        assert_eq!(Level::new(0), None);
        assert_eq!(Level::new(7), None);
        assert_eq!(Level::new(1), Some(Level::MIN));
        assert_eq!(Level::new(6), Some(Level::MAX));
    }

    #[test]
    fn level_one_reads_first_table_entry() {
        assert_eq!(Level::MIN.table_index(), 0);
        assert_eq!(Level::MAX.table_index(), 5);
        assert_eq!(production_multiplier(Level::MIN), Fixed64::from_num(1.0));
        assert_eq!(capacity_multiplier(Level::MIN), Fixed64::from_num(4.0));
        assert_eq!(capacity_multiplier(Level::MAX), Fixed64::from_num(100.45));
    }

    #[test]
    fn level_next_stops_at_max() {
        assert_eq!(Level::MIN.next(), Level::new(2));
        assert_eq!(Level::MAX.next(), None);
        assert_eq!(Level::all().count(), Level::COUNT);
    }

    #[test]
    fn level_serde_rejects_out_of_range() {
        assert_eq!(Level::try_from(3u8), Ok(Level(3)));
        assert_eq!(Level::try_from(9u8), Err(InvalidLevel(9)));
    }

    // -----------------------------------------------------------------------
    // Rates and capacity
    // -----------------------------------------------------------------------

    #[test]
    fn new_factory_is_level_one() {
        let f = wheat_factory();
        assert_eq!(f.production_level(), Level::MIN);
        assert_eq!(f.capacity_level(), Level::MIN);
        assert_eq!(f.accumulated(), Fixed64::ZERO);
        assert_eq!(f.total_collected(), Fixed64::ZERO);
    }

    #[test]
    fn level_one_rate_and_capacity() {
        let f = wheat_factory();
        assert!(close(f.effective_production_rate(), 14.017));
        assert!(close(f.effective_capacity(), 56.068));
    }

    #[test]
    fn rate_strictly_increases_with_production_level() {
        let mut f = wheat_factory();
        let mut prev = f.effective_production_rate();
        while f.upgrade_production() {
            let rate = f.effective_production_rate();
            assert!(rate > prev);
            prev = rate;
        }
        assert!(close(prev, 14.017 * 3.98));
    }

    #[test]
    fn capacity_strictly_increases_with_capacity_level() {
        let mut f = wheat_factory();
        let mut prev = f.effective_capacity();
        while f.upgrade_capacity() {
            let cap = f.effective_capacity();
            assert!(cap > prev);
            prev = cap;
        }
        assert!(close(prev, 14.017 * 100.45));
    }

    #[test]
    fn capacity_scales_with_production_level() {
        let mut f = wheat_factory();
        f.upgrade_production();
        assert!(close(f.effective_capacity(), 14.017 * 1.6 * 4.0));
    }

    // -----------------------------------------------------------------------
    // Produce / collect
    // -----------------------------------------------------------------------

    #[test]
    fn produce_accumulates_rate_times_minutes() {
        let mut f = wheat_factory();
        f.produce(3);
        assert!(close(f.accumulated(), 14.017 * 3.0));
        assert!(!f.is_full());
    }

    #[test]
    fn produce_clamps_at_capacity() {
        let mut f = wheat_factory();
        f.produce(10);
        assert_eq!(f.accumulated(), f.effective_capacity());
        assert!(f.is_full());
    }

    #[test]
    fn produce_at_capacity_is_idempotent() {
        let mut f = wheat_factory();
        f.produce(100);
        let full = f.accumulated();
        f.produce(1);
        f.produce(50);
        assert_eq!(f.accumulated(), full);
    }

    #[test]
    fn produce_zero_minutes_changes_nothing() {
        let mut f = wheat_factory();
        f.produce(0);
        assert_eq!(f.accumulated(), Fixed64::ZERO);
    }

    #[test]
    fn collect_drains_and_records_total() {
        let mut f = wheat_factory();
        f.produce(2);
        let stock = f.accumulated();

        assert_eq!(f.collect(), stock);
        assert_eq!(f.accumulated(), Fixed64::ZERO);
        assert_eq!(f.total_collected(), stock);
    }

    #[test]
    fn second_collect_returns_zero() {
        let mut f = wheat_factory();
        f.produce(2);
        f.collect();
        let total = f.total_collected();

        assert_eq!(f.collect(), Fixed64::ZERO);
        assert_eq!(f.total_collected(), total);
    }

    // -----------------------------------------------------------------------
    // Upgrades
    // -----------------------------------------------------------------------

    #[test]
    fn upgrade_stops_at_level_six() {
        let mut f = wheat_factory();
        for _ in 0..5 {
            assert!(f.upgrade(UpgradeKind::Production));
        }
        assert!(!f.upgrade(UpgradeKind::Production));
        assert_eq!(f.production_level(), Level::MAX);
        assert_eq!(f.capacity_level(), Level::MIN);
    }

    #[test]
    fn upgrades_are_independent() {
        let mut f = wheat_factory();
        f.upgrade_capacity();
        f.upgrade_capacity();
        assert_eq!(f.level(UpgradeKind::Capacity).get(), 3);
        assert_eq!(f.level(UpgradeKind::Production).get(), 1);
    }

    #[test]
    fn capacity_upgrade_keeps_existing_stock() {
        let mut f = wheat_factory();
        f.produce(100);
        let before = f.accumulated();
        f.upgrade_capacity();
        assert_eq!(f.accumulated(), before);
        assert!(!f.is_full());
    }

    #[test]
    fn upgrade_kind_parsing() {
        assert_eq!("production".parse(), Ok(UpgradeKind::Production));
        assert_eq!("capacity".parse(), Ok(UpgradeKind::Capacity));
        assert_eq!(
            "speed".parse::<UpgradeKind>(),
            Err(UnknownUpgradeKind("speed".to_string()))
        );
        assert_eq!(UpgradeKind::Capacity.to_string(), "capacity");
    }
}
