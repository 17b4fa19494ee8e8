//! Driver trait for abstracting the rendering side.
//!
//! The [`Driver`] trait decouples the runtime from any particular UI. It
//! delivers user input, renders the session, and owns the navigation
//! capability through its [`Navigator`] supertrait.

use std::future::Future;

use tokio::time::Instant;

use crate::{Navigator, Session, UserInput};

/// Abstracts rendering and user input for the runtime.
///
/// # Implementations
///
/// - **Simulation**: scripted input and in-memory history
/// - **Replay**: timed input from a script file, headless rendering
pub trait Driver: Navigator + Send {
    /// Driver-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user input.
    ///
    /// Returns `None` once no more input will arrive.
    fn poll_input(&mut self) -> impl Future<Output = Result<Option<UserInput>, Self::Error>> + Send;

    /// Render the session.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, session: &Session<Instant>) -> Result<(), Self::Error>;

    /// Release resources once the runtime stops.
    fn stop(&mut self);
}
