//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` replaces a real renderer for deterministic testing. It
//! implements [`Driver`] so the same [`monod_app::Runtime`] orchestration
//! code runs in both production and simulation. Input is scripted through a
//! [`SimDriverHandle`], history lives in a [`MemoryHistory`], and every
//! render is recorded as a [`SessionSnapshot`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use monod_app::{Driver, MemoryHistory, Navigator, Session, UserInput};
use monod_core::{DocumentId, Location};
use thiserror::Error;
use tokio::{sync::mpsc, time::Instant};

use crate::invariants::{InvariantRegistry, SessionSnapshot, SnapshotRecorder, Violation};

/// Error type for simulation driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimDriverError {
    /// A rendered state broke a registered invariant.
    #[error("invariant violated: {}", render_violations(.0))]
    InvariantViolated(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Renders and lifecycle observed by the driver.
#[derive(Default)]
struct RenderLog {
    snapshots: Vec<SessionSnapshot>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
pub struct SimDriver {
    history: MemoryHistory,
    inputs: mpsc::UnboundedReceiver<UserInput>,
    log: Arc<Mutex<RenderLog>>,
    recorder: SnapshotRecorder,
    invariants: Option<InvariantRegistry>,
}

/// Scripts input into a running [`SimDriver`] and reads back its renders.
///
/// Dropping every handle closes the input stream.
#[derive(Clone)]
pub struct SimDriverHandle {
    inputs: mpsc::UnboundedSender<UserInput>,
    log: Arc<Mutex<RenderLog>>,
}

impl SimDriver {
    /// Create a driver whose history opens at `location`.
    pub fn new(location: Location) -> (Self, SimDriverHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let log = Arc::new(Mutex::new(RenderLog::default()));
        let driver = Self {
            history: MemoryHistory::new(location),
            inputs: rx,
            log: Arc::clone(&log),
            recorder: SnapshotRecorder::new(),
            invariants: None,
        };
        (driver, SimDriverHandle { inputs: tx, log })
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// History pushed by the runtime.
    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }
}

impl SimDriverHandle {
    fn lock(&self) -> MutexGuard<'_, RenderLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue user input.
    pub fn send(&self, input: UserInput) {
        if self.inputs.send(input).is_err() {
            tracing::debug!("driver dropped, input discarded");
        }
    }

    /// Every render so far, oldest first.
    pub fn renders(&self) -> Vec<SessionSnapshot> {
        self.lock().snapshots.clone()
    }

    /// The most recent render.
    pub fn last_render(&self) -> Option<SessionSnapshot> {
        self.lock().snapshots.last().cloned()
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }
}

impl Navigator for SimDriver {
    fn current_location(&self) -> Location {
        self.history.current_location()
    }

    fn recorded_document(&self) -> Option<DocumentId> {
        self.history.recorded_document()
    }

    fn push_state(&mut self, document: &DocumentId, title: &str, path: &str) {
        self.history.push_state(document, title, path);
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_input(&mut self) -> Result<Option<UserInput>, Self::Error> {
        Ok(self.inputs.recv().await)
    }

    fn render(&mut self, session: &Session<Instant>) -> Result<(), Self::Error> {
        let snapshot = self.recorder.record(session, &self.history);

        if let Some(registry) = &self.invariants {
            registry.check_all(&snapshot).map_err(SimDriverError::InvariantViolated)?;
        }

        self.log.lock().unwrap_or_else(PoisonError::into_inner).snapshots.push(snapshot);
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).stopped = true;
    }
}
