//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use super::{Invariant, InvariantKind, InvariantResult, SessionSnapshot, Violation};

/// Messages are unique by `(content, level)`.
///
/// A repeated notification must bump the existing entry's count instead of
/// appending a duplicate box.
pub struct UniqueMessages;

impl Invariant for UniqueMessages {
    fn kind(&self) -> InvariantKind {
        InvariantKind::UniqueMessages
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let mut seen = HashSet::new();
        for (index, message) in state.state.messages.iter().enumerate() {
            if !seen.insert((message.content.as_str(), message.level)) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "message {index} duplicates ({}, {})",
                        message.level, message.content
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Every message has been seen at least once.
pub struct PositiveCounts;

impl Invariant for PositiveCounts {
    fn kind(&self) -> InvariantKind {
        InvariantKind::PositiveCounts
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        match state.state.messages.iter().position(|message| message.count == 0) {
            Some(index) => Err(Violation {
                invariant: self.kind(),
                message: format!("message {index} has count 0"),
            }),
            None => Ok(()),
        }
    }
}

/// Once a session has loaded it stays loaded.
pub struct LoadedMonotonic;

impl Invariant for LoadedMonotonic {
    fn kind(&self) -> InvariantKind {
        InvariantKind::LoadedMonotonic
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        for (step, window) in state.loaded_history.windows(2).enumerate() {
            if window[0] && !window[1] {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("loaded reverted to false at step {}", step + 1),
                });
            }
        }
        Ok(())
    }
}

/// A read-only session never leaves the `/r` namespace.
pub struct ReadOnlyPrefix;

impl Invariant for ReadOnlyPrefix {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ReadOnlyPrefix
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if !state.read_only {
            return Ok(());
        }
        match state.history.iter().find(|entry| !entry.location.is_read_only()) {
            Some(entry) => Err(Violation {
                invariant: self.kind(),
                message: format!(
                    "read-only session pushed {} for {}",
                    entry.location.path(),
                    entry.document
                ),
            }),
            None => Ok(()),
        }
    }
}
