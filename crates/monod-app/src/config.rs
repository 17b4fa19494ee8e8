//! Session configuration.

use std::time::Duration;

use monod_core::DocumentId;

/// Quiescence window for local edits. Bursts of keystrokes inside it collapse
/// into one `updateContent` dispatch.
pub const DEFAULT_QUIESCENCE_WINDOW: Duration = Duration::from_millis(150);

/// Prefix of every history entry title.
pub const DEFAULT_TITLE_PREFIX: &str = "Monod";

/// Tunables for a [`crate::Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Debounce window for outgoing content updates.
    pub quiescence_window: Duration,
    /// Prefix of history entry titles.
    pub title_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            quiescence_window: DEFAULT_QUIESCENCE_WINDOW,
            title_prefix: DEFAULT_TITLE_PREFIX.to_owned(),
        }
    }
}

impl SessionConfig {
    /// History entry title for `document`, e.g. `Monod - 1234`.
    pub fn title_for(&self, document: &DocumentId) -> String {
        format!("{} - {document}", self.title_prefix)
    }
}
