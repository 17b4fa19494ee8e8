//! Scripted replay of Monod sessions.
//!
//! Runs the real [`monod_app::Runtime`] against a [`ScriptController`] that
//! emits the script's controller events on schedule and a
//! [`HeadlessDriver`] that feeds the script's user input. The outcome is a
//! [`Report`] of the final view state, history and dispatched commands.
//!
//! # Components
//!
//! - [`Script`]: JSON script of timed events and input
//! - [`ScriptController`]: plays back events, records dispatches
//! - [`HeadlessDriver`]: plays back input, keeps history in memory
//! - [`replay`]: wires them into a runtime and collects the [`Report`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod error;
mod report;
mod script;

use std::path::Path;

use monod_app::{Navigator, Runtime, SessionConfig};
use monod_core::Location;
use tokio::time::Instant;

pub use driver::HeadlessDriver;
pub use error::{ReplayError, ScriptError};
pub use report::Report;
pub use script::{Script, ScriptController, TimedEvent, TimedInput};

/// Replay settings.
#[derive(Debug, Clone, Default)]
pub struct ReplayConfig {
    /// Starting location. Overrides the script's own.
    pub location: Option<String>,
    /// Session tunables.
    pub session: SessionConfig,
}

/// Read and parse a script file.
pub async fn load_script(path: &Path) -> Result<Script, ReplayError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReplayError::Read { path: path.to_owned(), source })?;
    Script::from_json(&json).map_err(ReplayError::Parse)
}

/// Run `script` to completion and report the outcome.
///
/// The replay ends once the script's last step plus one quiescence window
/// has elapsed, or earlier on a `quit` input.
///
/// # Errors
///
/// Returns an error if the starting location is invalid or the runtime
/// stops on a malformed controller event.
pub async fn replay(script: &Script, config: ReplayConfig) -> Result<Report, ReplayError> {
    let target = config.location.as_deref().or(script.location.as_deref()).unwrap_or("/");
    let location = Location::parse(target)?;

    let start = Instant::now();
    let horizon = script.horizon(config.session.quiescence_window);
    tracing::info!(location = %location.path(), ?horizon, "replaying");

    let controller = ScriptController::new(script, start, horizon);
    let driver = HeadlessDriver::new(script, location, start);
    let mut runtime = Runtime::new(controller, driver, config.session);

    runtime.run().await?;

    let (controller, driver, session) = runtime.into_parts();
    Ok(Report {
        location: driver.current_location().to_string(),
        read_only: session.is_read_only(),
        share_enabled: session.share_enabled(),
        state: session.state().clone(),
        editor: session.editor().clone(),
        history: driver.history().to_vec(),
        renders: driver.renders(),
        dispatched: controller.into_dispatched(),
    })
}
