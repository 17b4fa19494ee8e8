//! Replay errors.

use std::{convert::Infallible, io, path::PathBuf};

use monod_app::RuntimeError;
use monod_core::LocationError;
use thiserror::Error;

/// Errors raised by the scripted controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// The script has no raw content, so the one-shot load fails.
    #[error("script provides no raw content")]
    RawUnavailable,
}

/// Errors that abort a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The script file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Script path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The script is not valid JSON of the expected shape.
    #[error("invalid script: {0}")]
    Parse(#[source] serde_json::Error),

    /// The starting location is not an absolute path.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// The session runtime stopped with an error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError<ScriptError, Infallible>),

    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Write(#[source] io::Error),
}
