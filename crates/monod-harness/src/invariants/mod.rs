//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold during a session.
//! Unlike example-based tests that check specific scenarios, invariants
//! verify behavioral properties across all possible event sequences.
//!
//! # Architecture
//!
//! A [`SnapshotRecorder`] extracts observable state from a session and its
//! history into a [`SessionSnapshot`], then registered [`Invariant`] checks
//! run against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = recorder.record(&session, &history);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{LoadedMonotonic, PositiveCounts, ReadOnlyPrefix, UniqueMessages};
pub use snapshot::{SessionSnapshot, SnapshotRecorder};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies a standard invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// No two messages share content and level.
    UniqueMessages,
    /// Every message was seen at least once.
    PositiveCounts,
    /// `loaded` never reverts to false.
    LoadedMonotonic,
    /// Read-only sessions only navigate to `/r` paths.
    ReadOnlyPrefix,
}

impl InvariantKind {
    /// Name for error reporting.
    pub fn name(self) -> &'static str {
        match self {
            Self::UniqueMessages => "unique-messages",
            Self::PositiveCounts => "positive-counts",
            Self::LoadedMonotonic => "loaded-monotonic",
            Self::ReadOnlyPrefix => "read-only-prefix",
        }
    }
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The violated invariant.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against session state.
pub trait Invariant: Send + Sync {
    /// Which invariant this is.
    fn kind(&self) -> InvariantKind;

    /// Check the invariant against a snapshot.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &SessionSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
///
/// Use [`InvariantRegistry::standard()`] for the session invariants.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InvariantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.invariants.iter().map(|inv| inv.kind())).finish()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard session invariants.
    ///
    /// Includes:
    /// - [`UniqueMessages`]: `(content, level)` pairs are unique
    /// - [`PositiveCounts`]: every count is at least one
    /// - [`LoadedMonotonic`]: `loaded` never reverts
    /// - [`ReadOnlyPrefix`]: read-only history stays under `/r`
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(UniqueMessages);
        registry.add(PositiveCounts);
        registry.add(LoadedMonotonic);
        registry.add(ReadOnlyPrefix);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given snapshot.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &SessionSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_invariants() {
        let registry = InvariantRegistry::standard();
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn empty_snapshot_passes_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(registry.check_all(&SessionSnapshot::default()).is_ok());
    }

    #[test]
    fn violation_names_invariant() {
        let violation =
            Violation { invariant: InvariantKind::ReadOnlyPrefix, message: "/A#s".into() };
        assert_eq!(violation.to_string(), "read-only-prefix: /A#s");
    }
}
