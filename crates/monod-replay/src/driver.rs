//! Headless driver that feeds scripted input and renders to the log.

use std::{collections::VecDeque, convert::Infallible, time::Duration};

use monod_app::{Driver, HistoryEntry, MemoryHistory, Navigator, Session, UserInput};
use monod_core::{DocumentId, Location};
use tokio::time::{Instant, sleep_until};

use crate::script::{Script, TimedInput};

/// Driver without a screen.
///
/// Input arrives on the script's schedule, renders are counted and traced,
/// and navigation goes to an in-memory history.
#[derive(Debug)]
pub struct HeadlessDriver {
    start: Instant,
    inputs: VecDeque<TimedInput>,
    history: MemoryHistory,
    renders: usize,
}

impl HeadlessDriver {
    /// Driver opened at `location`, with input offsets counted from `start`.
    pub fn new(script: &Script, location: Location, start: Instant) -> Self {
        Self {
            start,
            inputs: script.timed_inputs(),
            history: MemoryHistory::new(location),
            renders: 0,
        }
    }

    /// Number of renders so far.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// History pushed during the replay.
    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }
}

impl Navigator for HeadlessDriver {
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

impl Driver for HeadlessDriver {
    type Error = Infallible;

    async fn poll_input(&mut self) -> Result<Option<UserInput>, Self::Error> {
        let Some(at_ms) = self.inputs.front().map(|i| i.at_ms) else {
            return Ok(None);
        };
        sleep_until(self.start + Duration::from_millis(at_ms)).await;
        Ok(self.inputs.pop_front().map(|timed| timed.input))
    }

    fn render(&mut self, session: &Session<Instant>) -> Result<(), Self::Error> {
        self.renders += 1;
        tracing::trace!(
            render = self.renders,
            document = %session.document().uuid,
            loaded = session.is_loaded(),
            messages = session.messages().len(),
            "render"
        );
        Ok(())
    }

    fn stop(&mut self) {
        tracing::debug!(renders = self.renders, "driver stopped");
    }
}
