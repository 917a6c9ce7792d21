//! Trailing-edge debounce bookkeeping.
//!
//! The host owns the real timer. Every [`Debouncer::schedule`] call hands out
//! a fresh ticket and invalidates the previous one, so a timer that was not
//! cancelled in time still cannot trigger a second reclassification.

/// Identifies one scheduled debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket(u64);

/// Tracks the single pending window of a debounced action.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: u32,
    generation: u64,
    pending: bool,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            generation: 0,
            pending: false,
        }
    }

    /// Quiet period the host should wait before firing.
    #[must_use]
    pub const fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Start (or restart) the window. Any earlier ticket becomes stale.
    pub fn schedule(&mut self) -> DebounceTicket {
        self.generation = self.generation.wrapping_add(1);
        self.pending = true;
        DebounceTicket(self.generation)
    }

    /// Drop the pending window without firing.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Whether a window is waiting to fire.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the window if `ticket` is the most recent one.
    ///
    /// Returns `true` at most once per scheduled window.
    pub fn fire(&mut self, ticket: DebounceTicket) -> bool {
        if self.pending && ticket.0 == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }
}
