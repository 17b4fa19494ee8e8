//! Controller trait for the external document controller.
//!
//! The [`Controller`] trait is the only way the runtime talks to the remote
//! document store. It performs the network requests, decrypts content, and
//! reports the outcome as lifecycle events. The runtime only subscribes,
//! dispatches commands, and consumes events in the order they are emitted.

use std::future::Future;

use monod_core::{Command, ControllerEvent, EventKind};

/// Abstracts the external document controller.
///
/// # Implementations
///
/// - **Simulation**: scripted or in-memory store (see `monod-harness`)
/// - **Replay**: events read from a script file
/// - **Browser**: a wrapper around the JS controller's event bus
pub trait Controller: Send {
    /// Controller-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Register interest in events of `kind`.
    ///
    /// Events of kinds nobody subscribed to are never delivered.
    fn subscribe(&mut self, kind: EventKind);

    /// Send a command to the controller.
    ///
    /// # Errors
    ///
    /// Returns an error if the controller can no longer accept commands.
    fn dispatch(
        &mut self,
        command: Command,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Wait for the next lifecycle event.
    ///
    /// Returns `None` once the controller has shut down.
    fn next_event(
        &mut self,
    ) -> impl Future<Output = Result<Option<ControllerEvent>, Self::Error>> + Send;

    /// Start the one-shot load of the document's raw content.
    ///
    /// The returned future is independent of `self` and resolves exactly
    /// once. There is no retry and no timeout; a failure means the editor
    /// starts empty.
    fn load_raw(&mut self) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static;
}
