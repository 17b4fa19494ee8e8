//! Replay scripts and the controller that plays them back.
//!
//! A script is a JSON document listing controller events and user input,
//! each stamped with the millisecond offset at which it happens:
//!
//! ```json
//! {
//!   "location": "/A#s1",
//!   "raw": "# Notes",
//!   "events": [
//!     { "at_ms": 0, "event": { "kind": "synchronize",
//!       "state": { "document": { "uuid": "A", "content": "" }, "secret": "s1" } } }
//!   ],
//!   "inputs": [
//!     { "at_ms": 20, "input": { "type": "edit-content", "raw": "hello" } }
//!   ]
//! }
//! ```

use std::{
    collections::{BTreeSet, VecDeque},
    future::{self, Future},
    time::Duration,
};

use monod_app::Controller;
use monod_core::{Command, ControllerEvent, EventKind};
use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep_until};

use crate::ScriptError;

/// A controller event delivered at a fixed offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Milliseconds after the replay starts.
    pub at_ms: u64,
    /// The event, exactly as the controller would emit it.
    pub event: ControllerEvent,
}

/// User input delivered at a fixed offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedInput {
    /// Milliseconds after the replay starts.
    pub at_ms: u64,
    /// The input.
    pub input: monod_app::UserInput,
}

/// A parsed replay script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Location the session opens at. Defaults to `/`.
    #[serde(default)]
    pub location: Option<String>,
    /// Result of the one-shot raw load. Absent means the load fails.
    #[serde(default)]
    pub raw: Option<String>,
    /// Controller events.
    #[serde(default)]
    pub events: Vec<TimedEvent>,
    /// User input.
    #[serde(default)]
    pub inputs: Vec<TimedInput>,
}

impl Script {
    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// How long the replay runs: the last scheduled step plus one
    /// quiescence window, so the final edit still gets dispatched.
    pub fn horizon(&self, quiescence_window: Duration) -> Duration {
        let last = self
            .events
            .iter()
            .map(|e| e.at_ms)
            .chain(self.inputs.iter().map(|i| i.at_ms))
            .max()
            .unwrap_or(0);
        Duration::from_millis(last) + quiescence_window
    }

    /// Input sorted by offset.
    pub(crate) fn timed_inputs(&self) -> VecDeque<TimedInput> {
        let mut inputs = self.inputs.clone();
        inputs.sort_by_key(|i| i.at_ms);
        inputs.into()
    }
}

/// Controller that plays back a script's events on schedule.
///
/// Dispatched commands are recorded but never answered; the script is the
/// only source of events. The event stream ends at the script's horizon.
#[derive(Debug)]
pub struct ScriptController {
    start: Instant,
    end: Instant,
    events: VecDeque<TimedEvent>,
    raw: Option<String>,
    subscriptions: BTreeSet<EventKind>,
    dispatched: Vec<Command>,
}

impl ScriptController {
    /// Controller for `script`, with offsets counted from `start`.
    pub fn new(script: &Script, start: Instant, horizon: Duration) -> Self {
        let mut events = script.events.clone();
        events.sort_by_key(|e| e.at_ms);
        Self {
            start,
            end: start + horizon,
            events: events.into(),
            raw: script.raw.clone(),
            subscriptions: BTreeSet::new(),
            dispatched: Vec::new(),
        }
    }

    /// Commands dispatched by the session, in order.
    pub fn dispatched(&self) -> &[Command] {
        &self.dispatched
    }

    /// Consume the controller, keeping its dispatch log.
    pub fn into_dispatched(self) -> Vec<Command> {
        self.dispatched
    }
}

impl Controller for ScriptController {
    type Error = ScriptError;

    fn subscribe(&mut self, kind: EventKind) {
        self.subscriptions.insert(kind);
    }

    async fn dispatch(&mut self, command: Command) -> Result<(), Self::Error> {
        tracing::info!(command = command.name(), "dispatched");
        self.dispatched.push(command);
        Ok(())
    }

    async fn next_event(&mut self) -> Result<Option<ControllerEvent>, Self::Error> {
        // The front event is only popped after its sleep completes, so a
        // cancelled wait loses nothing.
        while let Some(at_ms) = self.events.front().map(|e| e.at_ms) {
            sleep_until(self.start + Duration::from_millis(at_ms)).await;
            let Some(timed) = self.events.pop_front() else {
                break;
            };
            if self.subscriptions.contains(&timed.event.kind) {
                return Ok(Some(timed.event));
            }
            tracing::warn!(kind = %timed.event.kind, at_ms, "no subscriber, skipping event");
        }

        sleep_until(self.end).await;
        Ok(None)
    }

    fn load_raw(&mut self) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static {
        future::ready(self.raw.clone().ok_or(ScriptError::RawUnavailable))
    }
}

#[cfg(test)]
mod tests {
    use monod_app::UserInput;

    use super::*;

    const SCRIPT: &str = r#"{
        "location": "/r/A#s1",
        "events": [
            { "at_ms": 40, "event": { "kind": "update-without-conflict",
              "state": { "document": { "uuid": "A", "content": "v2" } } } },
            { "at_ms": 0, "event": { "kind": "synchronize",
              "state": { "document": { "uuid": "A" }, "secret": "s1" } } }
        ],
        "inputs": [
            { "at_ms": 90, "input": { "type": "toggle-share-modal" } },
            { "at_ms": 10, "input": { "type": "edit-content", "raw": "x" } }
        ]
    }"#;

    #[test]
    fn parses_script() {
        let script = Script::from_json(SCRIPT).expect("valid script");

        assert_eq!(script.location.as_deref(), Some("/r/A#s1"));
        assert_eq!(script.raw, None);
        assert_eq!(script.events[0].event.kind, EventKind::UpdateWithoutConflict);
        assert_eq!(script.timed_inputs().front().map(|i| &i.input), Some(&UserInput::EditContent {
            raw: "x".into()
        }));
    }

    #[test]
    fn horizon_covers_last_step_and_window() {
        let script = Script::from_json(SCRIPT).expect("valid script");
        assert_eq!(script.horizon(Duration::from_millis(150)), Duration::from_millis(240));
        assert_eq!(
            Script::default().horizon(Duration::from_millis(150)),
            Duration::from_millis(150)
        );
    }

    #[test]
    fn rejects_unknown_event_kind() {
        let json = r#"{ "events": [ { "at_ms": 0, "event": { "kind": "explode" } } ] }"#;
        assert!(Script::from_json(json).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn events_play_back_in_offset_order() {
        let script = Script::from_json(SCRIPT).expect("valid script");
        let start = Instant::now();
        let mut controller = ScriptController::new(&script, start, script.horizon(Duration::ZERO));
        for kind in EventKind::ALL {
            controller.subscribe(kind);
        }

        let first = controller.next_event().await.expect("event").expect("open");
        assert_eq!(first.kind, EventKind::Synchronize);

        let second = controller.next_event().await.expect("event").expect("open");
        assert_eq!(second.kind, EventKind::UpdateWithoutConflict);
        assert!(Instant::now() >= start + Duration::from_millis(40));

        assert_eq!(controller.next_event().await, Ok(None));
        assert!(Instant::now() >= start + Duration::from_millis(90));
    }

    #[tokio::test]
    async fn missing_raw_fails_load() {
        let mut controller =
            ScriptController::new(&Script::default(), Instant::now(), Duration::ZERO);
        assert_eq!(controller.load_raw().await, Err(ScriptError::RawUnavailable));
    }
}
