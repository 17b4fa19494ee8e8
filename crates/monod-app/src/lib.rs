//! Application layer for Monod
//!
//! Reconciles the locally edited document with the remote document store.
//! The external controller emits lifecycle events; this crate turns each one
//! into exactly one view-state transition, plus an optional navigation and an
//! optional user-facing notification.
//!
//! # Components
//!
//! - [`transition`]: pure `(state, event, history) -> Transition` function
//! - [`Session`]: state machine wrapping the transition function, local
//!   edits, debouncing and the editor pane
//! - [`Controller`]: trait for the external document controller
//! - [`Driver`]: trait for the rendering side (input, render, navigation)
//! - [`Navigator`]: injected history capability, with [`MemoryHistory`] as
//!   an in-process implementation
//! - [`Runtime`]: generic async loop wiring the above together

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod config;
mod controller;
mod debounce;
mod driver;
mod editor;
mod error;
mod event;
mod input;
mod navigator;
mod runtime;
mod session;
mod state;
pub mod transition;

pub use action::SessionAction;
pub use config::{DEFAULT_QUIESCENCE_WINDOW, DEFAULT_TITLE_PREFIX, SessionConfig};
pub use controller::Controller;
pub use debounce::Debouncer;
pub use driver::Driver;
pub use editor::{EditorMode, EditorPane, Handle};
pub use error::RuntimeError;
pub use event::SessionEvent;
pub use input::UserInput;
pub use navigator::{HistoryEntry, MemoryHistory, Navigation, NavigationContext, Navigator};
pub use runtime::Runtime;
pub use session::Session;
pub use state::SessionState;
pub use transition::{Transition, transition};
