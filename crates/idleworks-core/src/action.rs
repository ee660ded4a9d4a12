//! Pending-action queue for build and upgrade timers.
//!
//! Actions run strictly one at a time: each tick only the head of the queue
//! loses a minute, and everything behind it waits. A completed head is popped
//! and handed back to the caller.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::factory::Level;
use crate::fixed::Minutes;
use crate::id::FactoryId;

// ---------------------------------------------------------------------------
// Action records
// ---------------------------------------------------------------------------

/// What a pending action represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Construction of a factory.
    Build { factory: FactoryId },
    /// Production upgrade that brought the factory to `level`.
    UpgradeProduction { factory: FactoryId, level: Level },
    /// Capacity upgrade that brought the factory to `level`.
    UpgradeCapacity { factory: FactoryId, level: Level },
    /// An action submitted directly by game code.
    Custom,
}

/// A timed action waiting in (or at the head of) the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub kind: ActionKind,
    /// Total length in minutes.
    pub duration: Minutes,
    /// Minutes left. Never exceeds `duration`.
    pub remaining: Minutes,
    /// Human-readable label, e.g. "Build wheat factory".
    pub description: String,
}

impl PendingAction {
    pub fn new(kind: ActionKind, duration: Minutes, description: impl Into<String>) -> Self {
        Self {
            kind,
            duration,
            remaining: duration,
            description: description.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Minutes already spent on this action.
    pub fn elapsed(&self) -> Minutes {
        self.duration - self.remaining
    }
}

/// A finished action as kept in the queue history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedAction {
    /// Minute at which the action finished.
    pub minute: Minutes,
    pub kind: ActionKind,
    pub description: String,
}

// ---------------------------------------------------------------------------
// ActionQueue
// ---------------------------------------------------------------------------

/// FIFO of pending actions where only the head makes progress.
///
/// Supports optional history tracking of completed actions.
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    pending: VecDeque<PendingAction>,
    history: VecDeque<CompletedAction>,
    /// Maximum history entries to retain. 0 = no history.
    max_history: usize,
}

impl ActionQueue {
    /// Create a new empty queue with no history tracking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new queue that retains up to `max_history` completed actions.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            max_history,
            ..Self::default()
        }
    }

    /// Append an action at the tail.
    pub fn enqueue(&mut self, action: PendingAction) {
        self.pending.push_back(action);
    }

    /// Spend one minute on the head action. If that finishes it, the action
    /// is removed and returned. Does nothing on an empty queue.
    pub fn advance(&mut self, minute: Minutes) -> Option<PendingAction> {
        let head = self.pending.front_mut()?;
        head.remaining = head.remaining.saturating_sub(1);
        if !head.is_complete() {
            return None;
        }

        let done = self.pending.pop_front()?;
        if self.max_history > 0 {
            if self.history.len() == self.max_history {
                self.history.pop_front();
            }
            self.history.push_back(CompletedAction {
                minute,
                kind: done.kind,
                description: done.description.clone(),
            });
        }
        Some(done)
    }

    /// The action currently making progress.
    pub fn head(&self) -> Option<&PendingAction> {
        self.pending.front()
    }

    /// Pending actions, head first.
    pub fn iter(&self) -> impl Iterator<Item = &PendingAction> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Minutes until the queue drains if nothing else is added.
    pub fn total_remaining(&self) -> Minutes {
        self.pending.iter().map(|a| a.remaining).sum()
    }

    /// Completed actions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &CompletedAction> {
        self.history.iter()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

// ===========================================================================
// Tests
// ===========================================================================
