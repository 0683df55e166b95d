//! Save coalescing
//!
//! Rapid edits (typing into a card) should land in history as one snapshot,
//! not one per keystroke. The scheduler holds only the latest tree; a newer
//! tree replaces it and pushes the deadline out, so a superseded state is
//! never persisted and saves can never land out of order.

use crate::map::Item;
use log::debug;
use std::time::{Duration, Instant};

/// Default quiet period before a pending tree is saved.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(500);

/// At most one pending tree plus the instant it becomes due.
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    delay: Duration,
    pending: Option<(Item, Instant)>,
}

impl Default for SaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DELAY)
    }
}

impl SaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue `tree` to be saved `delay` after `now`.
    ///
    /// Returns `true` if a previously pending tree was superseded.
    pub fn schedule(&mut self, tree: Item, now: Instant) -> bool {
        let superseded = self.pending.is_some();
        if superseded {
            debug!("Superseding pending save");
        }
        self.pending = Some((tree, now + self.delay));
        superseded
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Instant the pending tree becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// The latest scheduled tree, without taking it.
    pub fn peek(&self) -> Option<&Item> {
        self.pending.as_ref().map(|(tree, _)| tree)
    }

    /// The pending tree once its deadline has passed, without taking it.
    pub fn due(&self, now: Instant) -> Option<&Item> {
        match &self.pending {
            Some((tree, deadline)) if now >= *deadline => Some(tree),
            _ => None,
        }
    }

    /// Forget the pending tree after it has been persisted.
    ///
    /// Until this is called the tree stays pending, so a failed save is
    /// retried by the next tick or flush.
    pub fn complete(&mut self) {
        self.pending = None;
    }

    /// Drop the pending tree without saving it.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            debug!("Cancelled pending save");
        }
    }
}
