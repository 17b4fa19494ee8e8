//! Integration tests for Session and its navigation side channel.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - The view state holds the expected document and secret
//! - History holds exactly the expected entries
//! - Messages carry the expected levels and counts

use std::time::Duration;

use monod_app::{
    MemoryHistory, Navigator, Session, SessionAction, SessionConfig, SessionEvent, UserInput,
};
use monod_core::{
    Command, ControllerEvent, Document, DocumentAccess, EventKind, Level, Location,
};

/// Session plus in-memory history, executing actions the way the runtime does.
struct Host {
    session: Session<Duration>,
    history: MemoryHistory,
    dispatched: Vec<Command>,
}

impl Host {
    fn at(target: &str) -> Self {
        let location = Location::parse(target).expect("absolute");
        Self {
            session: Session::new(SessionConfig::default(), location.clone()),
            history: MemoryHistory::new(location),
            dispatched: Vec::new(),
        }
    }

    fn process_actions(&mut self, actions: Vec<SessionAction>) {
        for action in actions {
            match action {
                SessionAction::Navigate(navigation) => {
                    let title = self.session.config().title_for(&navigation.document);
                    self.history.push_state(&navigation.document, &title, &navigation.path);
                },
                SessionAction::Dispatch(command) => self.dispatched.push(command),
                SessionAction::Render | SessionAction::Quit => {},
            }
        }
    }

    fn event(&mut self, event: ControllerEvent) {
        let actions = self
            .session
            .handle(SessionEvent::Lifecycle(event), &self.history.context())
            .expect("well-formed event");
        self.process_actions(actions);
    }

    fn input(&mut self, input: UserInput, at_ms: u64) {
        let now = Duration::from_millis(at_ms);
        let actions = self
            .session
            .handle(SessionEvent::Input { input, now }, &self.history.context())
            .expect("input never fails");
        self.process_actions(actions);
    }

    fn tick(&mut self, at_ms: u64) {
        let now = Duration::from_millis(at_ms);
        let actions = self
            .session
            .handle(SessionEvent::Tick { now }, &self.history.context())
            .expect("tick never fails");
        self.process_actions(actions);
    }

    fn paths(&self) -> Vec<String> {
        self.history.entries().iter().map(|e| e.location.to_string()).collect()
    }
}

fn access(uuid: &str, content: &str, secret: &str) -> DocumentAccess {
    DocumentAccess::new(Document::new(uuid, content), secret)
}

fn synchronize(uuid: &str, content: &str, secret: &str) -> ControllerEvent {
    ControllerEvent::with_access(EventKind::Synchronize, access(uuid, content, secret))
}

#[test]
fn fresh_document_then_first_save() {
    let mut host = Host::at("/");
    let init = host.session.init();
    host.process_actions(init);
    assert_eq!(host.dispatched, vec![Command::Init {
        id: None,
        secret: monod_core::Secret::default()
    }]);

    host.event(ControllerEvent::with_document(EventKind::NoDocumentId, Document::new("A", "")));
    assert!(host.session.is_loaded());
    assert!(host.history.is_empty());
    assert!(!host.session.share_enabled());

    host.input(UserInput::EditContent { raw: "hello".into() }, 0);
    host.tick(150);
    host.event(ControllerEvent::with_access(EventKind::Change, access("A", "hello", "s1")));

    assert_eq!(host.paths(), ["/A#s1"]);
    assert_eq!(host.history.entries()[0].title, "Monod - A");
    assert!(host.session.share_enabled());
    assert_eq!(host.dispatched.last(), Some(&Command::UpdateContent { content: "hello".into() }));
}

#[test]
fn conflict_moves_to_fork_and_links_original() {
    let mut host = Host::at("/A#s1");
    host.event(synchronize("A", "v1", "s1"));
    host.event(ControllerEvent::conflict(access("A", "v2", "s1"), access("B", "mine", "s2")));

    assert_eq!(host.session.document().uuid.as_str(), "B");
    assert_eq!(host.session.secret().expose(), "s2");
    assert_eq!(host.paths(), ["/A#s1", "/B#s2"]);

    let messages = host.session.messages().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, Level::Warning);
    assert!(messages[0].content.ends_with("/A#s1"));
}

#[test]
fn decryption_failure_redirects_to_root() {
    let mut host = Host::at("/A#wrong");
    host.event(ControllerEvent::with_document(
        EventKind::DecryptionFailed,
        Document::new("C", ""),
    ));

    assert_eq!(host.session.document().uuid.as_str(), "C");
    assert!(host.session.secret().is_empty());
    assert_eq!(host.paths(), ["/"]);
    assert_eq!(host.session.messages().len(), 1);
    assert_eq!(host.session.messages().messages()[0].level, Level::Error);
}

#[test]
fn read_only_prefix_survives_every_redirect() {
    let mut host = Host::at("/r/A#s1");
    host.event(synchronize("A", "", "s1"));
    host.event(ControllerEvent::conflict(access("A", "", "s1"), access("B", "", "s2")));
    host.event(ControllerEvent::with_document(
        EventKind::DocumentNotFound,
        Document::new("C", ""),
    ));

    assert_eq!(host.paths(), ["/r/A#s1", "/r/B#s2", "/r/"]);
    assert!(host.session.is_read_only());
}

#[test]
fn repeated_updates_bump_one_message() {
    let mut host = Host::at("/A#s1");
    host.event(synchronize("A", "v1", "s1"));
    for content in ["v2", "v3", "v4"] {
        host.event(ControllerEvent::with_document(
            EventKind::UpdateWithoutConflict,
            Document::new("A", content),
        ));
    }

    assert_eq!(host.session.document().content, "v4");
    assert_eq!(host.paths(), ["/A#s1"]);
    let messages = host.session.messages().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, Level::Info);
    assert_eq!(messages[0].count, 3);

    host.input(UserInput::RemoveMessage { index: 0 }, 0);
    host.input(UserInput::RemoveMessage { index: 0 }, 0);
    assert!(host.session.messages().is_empty());
}

#[test]
fn stale_event_is_still_applied() {
    let mut host = Host::at("/B#s2");
    host.event(synchronize("B", "new", "s2"));
    host.event(synchronize("A", "old", "s1"));

    assert_eq!(host.session.document().uuid.as_str(), "A");
    assert_eq!(host.paths(), ["/B#s2", "/A#s1"]);
}

#[test]
fn keystroke_burst_dispatches_last_value_once() {
    let mut host = Host::at("/A#s1");
    host.event(synchronize("A", "", "s1"));

    for (at_ms, raw) in [(0, "h"), (40, "he"), (80, "hel"), (120, "hello")] {
        host.input(UserInput::EditContent { raw: raw.into() }, at_ms);
        host.tick(at_ms);
    }
    host.tick(269);
    assert!(host.dispatched.is_empty());

    host.tick(270);
    host.tick(500);
    assert_eq!(host.dispatched, vec![Command::UpdateContent { content: "hello".into() }]);
}

#[test]
fn template_change_is_dispatched_immediately() {
    let mut host = Host::at("/A#s1");
    host.input(UserInput::ChangeTemplate { template: "slides".into() }, 0);

    assert_eq!(host.dispatched, vec![Command::UpdateTemplate { template: "slides".into() }]);
}

#[test]
fn document_id_starting_with_r_stays_full_access() {
    let mut host = Host::at("/");
    host.event(synchronize("report", "", "s1"));
    host.input(UserInput::EditContent { raw: "draft".into() }, 0);
    host.event(ControllerEvent::conflict(access("report", "", "s1"), access("B", "draft", "s2")));

    assert!(!host.session.is_read_only());
    assert_eq!(host.paths(), ["/report#s1", "/B#s2"]);

    host.input(UserInput::EditContent { raw: "draft 2".into() }, 10);
    host.tick(160);
    assert_eq!(host.dispatched, vec![Command::UpdateContent { content: "draft 2".into() }]);
}
