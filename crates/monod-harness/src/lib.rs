//! Deterministic simulation harness for Monod sessions.
//!
//! In-memory implementations of the [`monod_app::Controller`] and
//! [`monod_app::Driver`] traits, so the real [`monod_app::Runtime`] can be
//! exercised under a paused tokio clock with seeded randomness.
//!
//! # Components
//!
//! - [`SimController`]: in-memory document store answering `init`,
//!   `updateContent` and `updateTemplate`, plus event injection through
//!   [`SimControllerHandle`]
//! - [`SimDriver`]: scripted user input, in-memory history and recorded
//!   renders
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks over [`SessionSnapshot`]s. Use [`InvariantRegistry::standard()`]
//! for the session invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_controller;
pub mod sim_driver;

pub use invariants::{
    Invariant, InvariantKind, InvariantRegistry, InvariantResult, LoadedMonotonic, PositiveCounts,
    ReadOnlyPrefix, SessionSnapshot, SnapshotRecorder, UniqueMessages, Violation,
};
pub use sim_controller::{SimController, SimControllerError, SimControllerHandle, SimStore};
pub use sim_driver::{SimDriver, SimDriverError, SimDriverHandle};
