//! Session input events.
//!
//! This module defines [`SessionEvent`], everything that drives the
//! [`crate::Session`] state machine.
//!
//! Events originate from three sources:
//! - Lifecycle events emitted by the external controller.
//! - User input from the rendering side.
//! - Time: ticks for the debounce window, and the one-shot initial load.

use monod_core::ControllerEvent;

use crate::UserInput;

/// Events processed by the session.
///
/// Generic over `I`, the instant type, so simulations can use virtual time.
#[derive(Debug, Clone)]
pub enum SessionEvent<I> {
    /// Lifecycle event from the controller.
    Lifecycle(ControllerEvent),

    /// User input observed at `now`.
    Input {
        /// The input.
        input: UserInput,
        /// When it happened.
        now: I,
    },

    /// Time advanced to `now`.
    Tick {
        /// Current time.
        now: I,
    },

    /// The one-shot raw content load resolved. `None` on failure.
    RawLoaded(Option<String>),
}
