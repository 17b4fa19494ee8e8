//! Monod core
//!
//! Sans-IO data model for the client side of a collaborative document
//! session: documents and their secrets, browser locations, the event
//! contract honored by the external document controller, and the
//! notification store.
//!
//! # Architecture
//!
//! Nothing in this crate performs I/O or owns an async runtime. The external
//! controller emits [`ControllerEvent`]s which are validated into
//! [`LifecycleEvent`]s; commands flowing the other way are [`Command`]s. The
//! [`Notifications`] store is a pure reducer over [`NotificationAction`]s.
//!
//! # Components
//!
//! - [`Document`], [`DocumentId`], [`Secret`]: the current document and the
//!   access token paired with it
//! - [`Location`]: snapshot of the browser location (path + fragment)
//! - [`ControllerEvent`], [`LifecycleEvent`]: raw and validated lifecycle events
//! - [`Command`]: dispatches sent to the controller
//! - [`Notifications`]: deduplicating message store

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod command;
pub mod document;
pub mod error;
pub mod event;
pub mod location;
pub mod notification;

pub use command::Command;
pub use document::{DEFAULT_TEMPLATE, Document, DocumentAccess, DocumentId, Secret};
pub use error::{ContractViolation, LocationError};
pub use event::{ControllerEvent, EventKind, EventState, ForkState, LifecycleEvent};
pub use location::{Location, READ_ONLY_PREFIX, document_path, scoped_path};
pub use notification::{Level, Message, NotificationAction, NotificationIntent, Notifications};
