//! Property-based tests for the Session state machine.
//!
//! Tests verify that invariants hold under arbitrary sequences of
//! controller events, user input and elapsed time. The session runs on a
//! virtual clock (`Duration` since start) with an in-memory history.

use std::time::Duration;

use monod_app::{
    DEFAULT_QUIESCENCE_WINDOW, MemoryHistory, Navigator, Session, SessionAction, SessionConfig,
    SessionEvent, UserInput,
};
use monod_core::{Command, ControllerEvent, Document, DocumentAccess, EventKind, Location};
use monod_harness::{InvariantRegistry, SnapshotRecorder};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Lifecycle(ControllerEvent),
    Input(UserInput),
    Advance(u64),
}

/// Session plus the collaborators the runtime would normally provide.
struct Sim {
    session: Session<Duration>,
    history: MemoryHistory,
    now: Duration,
    navigations: Vec<String>,
    dispatched: Vec<(Duration, Command)>,
}

impl Sim {
    fn at(target: &str) -> Self {
        let location = Location::parse(target).expect("absolute");
        Self {
            session: Session::new(SessionConfig::default(), location.clone()),
            history: MemoryHistory::new(location),
            now: Duration::ZERO,
            navigations: Vec::new(),
            dispatched: Vec::new(),
        }
    }

    fn step(&mut self, step: Step) {
        let event = match step {
            Step::Lifecycle(event) => SessionEvent::Lifecycle(event),
            Step::Input(input) => SessionEvent::Input { input, now: self.now },
            Step::Advance(ms) => {
                self.now += Duration::from_millis(ms);
                SessionEvent::Tick { now: self.now }
            },
        };

        let actions = self.session.handle(event, &self.history.context()).expect("well-formed");
        for action in actions {
            match action {
                SessionAction::Navigate(navigation) => {
                    let title = self.session.config().title_for(&navigation.document);
                    self.navigations.push(navigation.path.clone());
                    self.history.push_state(&navigation.document, &title, &navigation.path);
                },
                SessionAction::Dispatch(command) => self.dispatched.push((self.now, command)),
                SessionAction::Render | SessionAction::Quit => {},
            }
        }
    }

    fn content_dispatches(&self) -> Vec<Duration> {
        self.dispatched
            .iter()
            .filter(|(_, command)| matches!(command, Command::UpdateContent { .. }))
            .map(|(at, _)| *at)
            .collect()
    }
}

fn access_strategy() -> impl Strategy<Value = DocumentAccess> {
    let uuid = prop::sample::select(vec!["A", "B", "C"]);
    let secret = prop::sample::select(vec!["s1", "s2"]);
    (uuid, secret, "[a-z]{0,3}").prop_map(|(uuid, secret, content)| {
        DocumentAccess::new(Document::new(uuid, content), secret)
    })
}

/// Generate well-formed controller events of every kind.
fn lifecycle_strategy() -> impl Strategy<Value = ControllerEvent> {
    let document_only = |kind: EventKind| {
        access_strategy()
            .prop_map(move |access| ControllerEvent::with_document(kind, access.document))
    };
    prop_oneof![
        document_only(EventKind::NoDocumentId),
        document_only(EventKind::DecryptionFailed),
        document_only(EventKind::DocumentNotFound),
        document_only(EventKind::UpdateWithoutConflict),
        (access_strategy(), access_strategy())
            .prop_map(|(original, fork)| ControllerEvent::conflict(original, fork)),
        access_strategy().prop_map(|a| ControllerEvent::with_access(EventKind::Synchronize, a)),
        access_strategy().prop_map(|a| ControllerEvent::with_access(EventKind::Change, a)),
    ]
}

/// Generate user input the session reacts to.
fn input_strategy() -> impl Strategy<Value = UserInput> {
    prop_oneof![
        4 => "[a-z]{0,4}".prop_map(|raw| UserInput::EditContent { raw }),
        1 => "[a-z]{1,6}".prop_map(|template| UserInput::ChangeTemplate { template }),
        1 => (0usize..4).prop_map(|index| UserInput::RemoveMessage { index }),
        1 => Just(UserInput::ToggleShareModal),
        1 => (0usize..10).prop_map(|pos| UserInput::MoveCursor { pos }),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => lifecycle_strategy().prop_map(Step::Lifecycle),
        3 => input_strategy().prop_map(Step::Input),
        2 => (0u64..400).prop_map(Step::Advance),
    ]
}

fn location_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["/", "/A#s1", "/B#nope", "/r/", "/r/A#s1", "/r/C#s2"])
}

proptest! {
    /// Session invariants hold under arbitrary step sequences.
    ///
    /// Messages stay unique with positive counts, `loaded` never reverts,
    /// and read-only sessions stay under `/r`.
    #[test]
    fn prop_session_invariants_hold(
        start in location_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..60),
    ) {
        let mut sim = Sim::at(start);
        let mut recorder = SnapshotRecorder::new();
        let invariants = InvariantRegistry::standard();

        for step in steps {
            sim.step(step.clone());

            let snapshot = recorder.record(&sim.session, &sim.history);
            prop_assert!(
                invariants.check_all(&snapshot).is_ok(),
                "Invariant violated after {:?}: {:?}", step, invariants.check_all(&snapshot)
            );
        }
    }

    /// Read-only sessions prefix every navigation and never push edits.
    #[test]
    fn prop_read_only_never_escapes(
        start in prop::sample::select(vec!["/r/", "/r/A#s1", "/r/B#s2"]),
        steps in prop::collection::vec(step_strategy(), 0..60),
    ) {
        let mut sim = Sim::at(start);
        for step in steps {
            sim.step(step);
        }

        for path in &sim.navigations {
            prop_assert!(path.starts_with("/r/"), "navigated to {}", path);
        }
        let pushed_edits = sim.dispatched.iter().filter(|(_, command)| {
            matches!(command, Command::UpdateContent { .. } | Command::UpdateTemplate { .. })
        });
        prop_assert_eq!(pushed_edits.count(), 0);
    }

    /// Repeating a synchronize for the same document pushes history at most
    /// once, whatever happened before.
    #[test]
    fn prop_repeated_synchronize_pushes_once(
        start in location_strategy(),
        prefix in prop::collection::vec(step_strategy(), 0..20),
        access in access_strategy(),
    ) {
        let mut sim = Sim::at(start);
        for step in prefix {
            sim.step(step);
        }

        let before = sim.history.len();
        let sync = ControllerEvent::with_access(EventKind::Synchronize, access);
        sim.step(Step::Lifecycle(sync.clone()));
        sim.step(Step::Lifecycle(sync));

        prop_assert!(sim.history.len() - before <= 1);
    }

    /// Content dispatches are at least one quiescence window apart.
    #[test]
    fn prop_edits_dispatch_once_per_window(
        steps in prop::collection::vec(step_strategy(), 0..80),
    ) {
        let mut sim = Sim::at("/A#s1");
        for step in steps {
            sim.step(step);
        }

        for pair in sim.content_dispatches().windows(2) {
            prop_assert!(
                pair[1] - pair[0] >= DEFAULT_QUIESCENCE_WINDOW,
                "dispatched at {:?} then {:?}", pair[0], pair[1]
            );
        }
    }

    /// A dispatched edit always differs from the document it was sent for.
    #[test]
    fn prop_unchanged_content_is_not_dispatched(
        raw in "[a-z]{0,3}",
        access in access_strategy(),
    ) {
        let mut sim = Sim::at("/A#s1");
        let content = access.document.content.clone();
        sim.step(Step::Lifecycle(ControllerEvent::with_access(EventKind::Synchronize, access)));
        sim.step(Step::Input(UserInput::EditContent { raw: raw.clone() }));
        sim.step(Step::Advance(200));

        let dispatched = sim.content_dispatches().len();
        prop_assert_eq!(dispatched, usize::from(raw != content));
    }
}
