//! Observable session view state.
//!
//! [`SessionState`] is the view model handed to renderers. It is replaced
//! as a whole on every transition and never exposed mutably outside this
//! crate.

use monod_core::{Document, Notifications, Secret};
use serde::{Deserialize, Serialize};

/// What renderers see of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// The single current document.
    pub document: Document,
    /// Secret paired with `document`. Empty when none unlocked it.
    pub secret: Secret,
    /// User-facing messages.
    pub messages: Notifications,
    /// Set once the first lifecycle event has been applied. Never reverts.
    pub loaded: bool,
    /// Whether the share dialog is open.
    pub display_share_modal: bool,
}

impl SessionState {
    /// State at session start: empty document, no messages, not loaded.
    pub fn new() -> Self {
        Self::default()
    }
}
