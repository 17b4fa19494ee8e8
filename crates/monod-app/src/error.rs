//! Runtime errors.

use monod_core::ContractViolation;
use thiserror::Error;

/// Errors that stop the [`crate::Runtime`].
///
/// Remote-state failures never show up here: they are absorbed by the
/// session as notifications and redirects.
#[derive(Debug, Error)]
pub enum RuntimeError<C, D>
where
    C: std::error::Error + 'static,
    D: std::error::Error + 'static,
{
    /// The controller failed.
    #[error("controller error: {0}")]
    Controller(#[source] C),

    /// The driver failed.
    #[error("driver error: {0}")]
    Driver(#[source] D),

    /// The controller emitted a malformed event.
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

impl<C, D> RuntimeError<C, D>
where
    C: std::error::Error + 'static,
    D: std::error::Error + 'static,
{
    /// True for errors caused by a broken controller contract rather than
    /// I/O.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Contract(_))
    }
}
