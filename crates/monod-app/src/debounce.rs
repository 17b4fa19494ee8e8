//! Trailing-edge debounce policy.
//!
//! At most one value is released per quiescence window, and only the last
//! value pushed inside the window. Every push restarts the window. The
//! policy is clock-agnostic: callers pass `now`, so simulations can drive it
//! with virtual time.

use std::{ops::Add, time::Duration};

#[derive(Debug, Clone)]
struct Pending<I, T> {
    value: T,
    deadline: I,
}

/// Coalesces bursts of values into one.
#[derive(Debug, Clone)]
pub struct Debouncer<I, T> {
    window: Duration,
    pending: Option<Pending<I, T>>,
}

impl<I, T> Debouncer<I, T>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    /// Debouncer with the given quiescence window.
    pub fn new(window: Duration) -> Self {
        Self { window, pending: None }
    }

    /// Quiescence window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record `value` at `now`, replacing any pending value and restarting
    /// the window.
    pub fn push(&mut self, value: T, now: I) {
        self.pending = Some(Pending { value, deadline: now + self.window });
    }

    /// When the pending value becomes due. `None` if nothing is pending.
    pub fn deadline(&self) -> Option<I> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// True when a value is waiting for its window to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value if its window has elapsed at `now`.
    pub fn poll(&mut self, now: I) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| p.deadline <= now) { self.flush() } else { None }
    }

    /// Release the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}
