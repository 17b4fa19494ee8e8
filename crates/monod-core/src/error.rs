//! Error types for the Monod core.
//!
//! Remote-state failures (decryption, missing documents) are not errors here:
//! they arrive as lifecycle events and are absorbed by the session. The only
//! conditions raised locally are contract violations by the controller and
//! malformed location strings.

use thiserror::Error;

use crate::EventKind;

/// A controller event arrived without a field its kind requires.
///
/// This is a programming error in the controller, not a recoverable remote
/// failure. Callers must surface it rather than render a broken state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("contract violation: {event} payload is missing `{field}`")]
pub struct ContractViolation {
    /// Event that carried the malformed payload.
    pub event: EventKind,
    /// Dotted name of the missing field.
    pub field: &'static str,
}

impl ContractViolation {
    /// Build a violation for `event` missing `field`.
    pub fn missing(event: EventKind, field: &'static str) -> Self {
        Self { event, field }
    }
}

/// Errors when parsing a location string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// Location did not start with `/`.
    #[error("location must be absolute: {0:?}")]
    NotAbsolute(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_names_event_and_field() {
        let err = ContractViolation::missing(EventKind::Conflict, "fork.secret");
        assert_eq!(
            err.to_string(),
            "contract violation: conflict payload is missing `fork.secret`"
        );
    }
}
