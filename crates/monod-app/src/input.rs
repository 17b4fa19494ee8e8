//! Renderer-agnostic user input.

use monod_core::{NotificationAction, NotificationIntent};
use serde::{Deserialize, Serialize};

use crate::Handle;

/// Input from the rendering side.
///
/// Decouples the session from any particular UI toolkit so the same state
/// machine runs in a browser shell, a terminal or a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UserInput {
    /// The editor text changed.
    EditContent {
        /// Full raw text.
        raw: String,
    },
    /// A different template was picked.
    ChangeTemplate {
        /// Template name.
        template: String,
    },
    /// A message box was dismissed.
    RemoveMessage {
        /// Position of the message.
        index: usize,
    },
    /// The share button or dialog backdrop was clicked.
    ToggleShareModal,
    /// The editor cursor moved.
    MoveCursor {
        /// New cursor position.
        pos: usize,
    },
    /// A pane handle was clicked.
    ClickHandle {
        /// Which handle.
        handle: Handle,
    },
    /// Leave the session.
    Quit,
}

impl NotificationIntent for UserInput {
    fn notification(&self) -> Option<NotificationAction> {
        match self {
            Self::RemoveMessage { index } => Some(NotificationAction::close(*index)),
            _ => None,
        }
    }
}
