//! Editor pane state.
//!
//! Tracks the raw text being edited, the cursor, whether the initial load
//! has resolved, and which of the two panes has focus. Rendering is left to
//! the driver.

use serde::{Deserialize, Serialize};

/// Which panes are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Source pane only.
    Focus,
    /// Source and preview side by side.
    #[default]
    Preview,
    /// Preview pane only.
    Reading,
}

/// Handle between the two panes that can be clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    /// Handle on the source side.
    Left,
    /// Handle on the preview side.
    Right,
}

/// State of the editor pane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorPane {
    raw: String,
    pos: usize,
    loaded: bool,
    mode: EditorMode,
}

impl EditorPane {
    /// Empty, not yet loaded pane in preview mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the one-shot initial load.
    ///
    /// `None` means the load failed and the pane starts empty. Only the first
    /// resolution is applied; returns `false` for later ones.
    pub fn load(&mut self, raw: Option<String>) -> bool {
        if self.loaded {
            return false;
        }
        *self =
            Self { raw: raw.unwrap_or_default(), pos: 0, loaded: true, mode: EditorMode::Preview };
        true
    }

    /// Replace the raw text, keeping the cursor.
    pub fn change(&mut self, raw: String) {
        self.raw = raw;
    }

    /// Move the cursor.
    pub fn move_cursor(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Toggle panes after a click on `handle`.
    ///
    /// Left collapses to reading (or back to preview from focus); right
    /// collapses to focus (or back to preview from reading).
    pub fn click(&mut self, handle: Handle) {
        self.mode = match (handle, self.mode) {
            (Handle::Left, EditorMode::Focus) | (Handle::Right, EditorMode::Reading) => {
                EditorMode::Preview
            },
            (Handle::Left, _) => EditorMode::Reading,
            (Handle::Right, _) => EditorMode::Focus,
        };
    }

    /// Raw text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Cursor position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Whether the initial load has resolved.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Current pane mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }
}
