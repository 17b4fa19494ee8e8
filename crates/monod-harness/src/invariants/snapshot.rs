//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a session at a point in time.
//! Invariants operate on snapshots rather than live state so checks are
//! consistent and can see history across steps.

use monod_app::{HistoryEntry, MemoryHistory, Session, SessionState};
use serde::Serialize;

/// Snapshot of one session and its history.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSnapshot {
    /// View state at the time of the snapshot.
    pub state: SessionState,
    /// Whether the session was opened through a read-only path.
    pub read_only: bool,
    /// History entries pushed so far, oldest first.
    pub history: Vec<HistoryEntry>,
    /// `loaded` as observed at every snapshot so far, this one last.
    pub loaded_history: Vec<bool>,
}

/// Builds snapshots and carries cross-step observations between them.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecorder {
    loaded_history: Vec<bool>,
}

impl SnapshotRecorder {
    /// Create a recorder with no observations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `session` together with `history`.
    pub fn record<I>(&mut self, session: &Session<I>, history: &MemoryHistory) -> SessionSnapshot {
        self.loaded_history.push(session.is_loaded());
        SessionSnapshot {
            state: session.state().clone(),
            read_only: session.is_read_only(),
            history: history.entries().to_vec(),
            loaded_history: self.loaded_history.clone(),
        }
    }

    /// Number of snapshots taken.
    pub fn len(&self) -> usize {
        self.loaded_history.len()
    }

    /// True before the first snapshot.
    pub fn is_empty(&self) -> bool {
        self.loaded_history.is_empty()
    }
}
