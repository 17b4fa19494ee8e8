//! Session side-effects.
//!
//! This module defines [`SessionAction`], the instructions produced by the
//! [`crate::Session`] state machine for the runtime to execute.

use monod_core::Command;

use crate::Navigation;

/// Actions produced by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Re-render the view state.
    Render,

    /// Replace the current history entry.
    Navigate(Navigation),

    /// Send a command to the controller.
    Dispatch(Command),

    /// Leave the session.
    Quit,
}
