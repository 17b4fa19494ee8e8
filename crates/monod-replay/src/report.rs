//! Final replay report.

use std::io::Write;

use monod_app::{EditorPane, HistoryEntry, SessionState};
use monod_core::Command;
use serde::Serialize;

use crate::ReplayError;

/// What a replay ends with.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Location after the last navigation.
    pub location: String,
    /// Whether the session was read-only.
    pub read_only: bool,
    /// Whether sharing was available at the end.
    pub share_enabled: bool,
    /// Final view state.
    pub state: SessionState,
    /// Final editor pane.
    pub editor: EditorPane,
    /// History pushed during the replay, oldest first.
    pub history: Vec<HistoryEntry>,
    /// Commands the session dispatched, in order.
    pub dispatched: Vec<Command>,
    /// Number of renders.
    pub renders: usize,
}

impl Report {
    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, mut writer: impl Write) -> Result<(), ReplayError> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| ReplayError::Write(e.into()))?;
        writeln!(writer).map_err(ReplayError::Write)
    }
}
