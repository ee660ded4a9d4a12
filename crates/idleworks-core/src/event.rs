//! Typed event system with pre-allocated ring buffers.
//!
//! The engine never prints. Everything a display layer might want to show
//! (collections, finished actions, the goal being reached) is emitted as an
//! [`Event`] into a per-kind [`EventBuffer`] and delivered in batch to
//! passive listeners at the end of each tick.
//!
//! Events emitted between ticks (builds and upgrades requested by game code)
//! wait in their buffers until the next delivery, or until
//! [`crate::engine::Engine::flush_events`] is called.
//!
//! Delivery replays events in emission order across all kinds, so a
//! collection made between ticks reaches listeners before anything the
//! following tick produces.
//!
//! # Suppression
//!
//! Event kinds can be suppressed via [`EventBus::suppress`], which prevents
//! any allocation or recording for that kind.

use std::collections::VecDeque;

use crate::action::ActionKind;
use crate::factory::{Level, UpgradeKind};
use crate::fixed::{Fixed64, Minutes};
use crate::id::{FactoryId, MaterialId};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A simulation event. All events carry the minute at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FactoryBuilt {
        factory: FactoryId,
        material: MaterialId,
        minute: Minutes,
    },
    FactoryUpgraded {
        factory: FactoryId,
        kind: UpgradeKind,
        level: Level,
        /// False when the factory was already at the cap.
        changed: bool,
        minute: Minutes,
    },
    ActionQueued {
        kind: ActionKind,
        duration: Minutes,
        description: String,
        minute: Minutes,
    },
    ActionCompleted {
        kind: ActionKind,
        description: String,
        minute: Minutes,
    },
    MaterialCollected {
        factory: FactoryId,
        material: MaterialId,
        amount: Fixed64,
        minute: Minutes,
    },
    GoalReached {
        minute: Minutes,
    },
}

/// Discriminant tag for event types, used for suppression and subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FactoryBuilt,
    FactoryUpgraded,
    ActionQueued,
    ActionCompleted,
    MaterialCollected,
    GoalReached,
}

/// Total number of event kinds.
const EVENT_KIND_COUNT: usize = 6;

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::FactoryBuilt { .. } => EventKind::FactoryBuilt,
            Event::FactoryUpgraded { .. } => EventKind::FactoryUpgraded,
            Event::ActionQueued { .. } => EventKind::ActionQueued,
            Event::ActionCompleted { .. } => EventKind::ActionCompleted,
            Event::MaterialCollected { .. } => EventKind::MaterialCollected,
            Event::GoalReached { .. } => EventKind::GoalReached,
        }
    }

    pub fn minute(&self) -> Minutes {
        match self {
            Event::FactoryBuilt { minute, .. }
            | Event::FactoryUpgraded { minute, .. }
            | Event::ActionQueued { minute, .. }
            | Event::ActionCompleted { minute, .. }
            | Event::MaterialCollected { minute, .. }
            | Event::GoalReached { minute } => *minute,
        }
    }
}

impl EventKind {
    pub const ALL: [EventKind; EVENT_KIND_COUNT] = [
        EventKind::FactoryBuilt,
        EventKind::FactoryUpgraded,
        EventKind::ActionQueued,
        EventKind::ActionCompleted,
        EventKind::MaterialCollected,
        EventKind::GoalReached,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBuffer -- pre-allocated ring buffer
// ---------------------------------------------------------------------------

/// A pre-allocated ring buffer for events. Fixed capacity; when full, the
/// oldest events are dropped.
#[derive(Debug)]
pub struct EventBuffer {
    events: Vec<Option<Event>>,
    /// Write position (wraps around).
    head: usize,
    len: usize,
    /// Total events ever written (including dropped).
    total_written: u64,
}

impl EventBuffer {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
        }
    }

    /// Push an event. If full, the oldest event is dropped.
    pub fn push(&mut self, event: Event) {
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Event> + '_ {
        let start = self.oldest();
        let cap = self.capacity();
        (0..self.len).filter_map(move |i| self.events[(start + i) % cap].as_ref())
    }

    /// Remove and return all events, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        let start = self.oldest();
        let cap = self.capacity();
        let drained = (0..self.len)
            .filter_map(|i| self.events[(start + i) % cap].take())
            .collect();
        self.head = 0;
        self.len = 0;
        drained
    }

    /// Slot of the oldest event. Once full, head points at it.
    fn oldest(&self) -> usize {
        if self.len < self.capacity() { 0 } else { self.head }
    }

    pub fn clear(&mut self) {
        for slot in &mut self.events {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// A passive listener receives events read-only.
pub type PassiveListener = Box<dyn FnMut(&Event)>;

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Holds one ring buffer per event kind, listener lists, and suppression
/// flags.
pub struct EventBus {
    buffers: [Option<EventBuffer>; EVENT_KIND_COUNT],
    suppressed: [bool; EVENT_KIND_COUNT],
    listeners: [Vec<PassiveListener>; EVENT_KIND_COUNT],
    /// Kinds in emission order since the last delivery.
    order: Vec<EventKind>,
    default_capacity: usize,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("buffers", &self.buffers)
            .field("suppressed", &self.suppressed)
            .field("default_capacity", &self.default_capacity)
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity per kind.
    pub fn new(default_capacity: usize) -> Self {
        Self {
            buffers: Default::default(),
            suppressed: [false; EVENT_KIND_COUNT],
            listeners: Default::default(),
            order: Vec::new(),
            default_capacity,
        }
    }

    /// Suppressed kinds are never allocated or buffered.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
        self.buffers[kind.index()] = None;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Buffer an event until the next delivery. No-op if its kind is
    /// suppressed.
    pub fn emit(&mut self, event: Event) {
        let idx = event.kind().index();
        if self.suppressed[idx] {
            return;
        }
        let capacity = self.default_capacity;
        self.buffers[idx]
            .get_or_insert_with(|| EventBuffer::new(capacity))
            .push(event);
        self.order.push(EventKind::ALL[idx]);
    }

    /// Register a listener for one kind. Listeners run in registration order.
    pub fn on(&mut self, kind: EventKind, listener: PassiveListener) {
        self.listeners[kind.index()].push(listener);
    }

    /// Deliver all buffered events to listeners in emission order and clear
    /// the buffers. Returns the number of events delivered.
    pub fn deliver(&mut self) -> usize {
        let mut pending: [VecDeque<Event>; EVENT_KIND_COUNT] = Default::default();
        for (idx, slot) in self.buffers.iter_mut().enumerate() {
            if let Some(buffer) = slot {
                pending[idx] = buffer.drain().into();
            }
        }

        // A full ring overwrites its oldest events; skip their order slots.
        let mut skip = [0usize; EVENT_KIND_COUNT];
        for kind in &self.order {
            skip[kind.index()] += 1;
        }
        for (idx, queue) in pending.iter().enumerate() {
            skip[idx] = skip[idx].saturating_sub(queue.len());
        }

        let mut delivered = 0;
        for kind in std::mem::take(&mut self.order) {
            let idx = kind.index();
            if skip[idx] > 0 {
                skip[idx] -= 1;
                continue;
            }
            let Some(event) = pending[idx].pop_front() else {
                continue;
            };
            for listener in &mut self.listeners[idx] {
                listener(&event);
            }
            delivered += 1;
        }
        delivered
    }

    pub fn buffer(&self, kind: EventKind) -> Option<&EventBuffer> {
        self.buffers[kind.index()].as_ref()
    }

    pub fn buffered_count(&self, kind: EventKind) -> usize {
        self.buffer(kind).map(EventBuffer::len).unwrap_or(0)
    }

    /// Total events ever emitted for a kind (including dropped).
    pub fn total_emitted(&self, kind: EventKind) -> u64 {
        self.buffer(kind).map(EventBuffer::total_written).unwrap_or(0)
    }

    /// Clear all buffers. Does not remove listeners or suppression settings.
    pub fn clear_all(&mut self) {
        for buffer in self.buffers.iter_mut().flatten() {
            buffer.clear();
        }
        self.order.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
