//! Simulation controller implementing the Controller trait.
//!
//! `SimController` stands in for the external document controller. It keeps
//! documents in memory, answers commands with the lifecycle events the real
//! controller would emit, and lets tests inject remote activity (third-party
//! updates, conflicts, malformed events) through a [`SimControllerHandle`].
//!
//! Document ids and secrets come from a seeded RNG, so a given seed always
//! produces the same session.

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    future::{self, Future},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use monod_app::Controller;
use monod_core::{
    Command, ControllerEvent, Document, DocumentAccess, DocumentId, EventKind, Secret,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tokio::sync::mpsc;

/// Error type for simulation controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimControllerError {
    /// The raw content load was configured to fail.
    #[error("raw content unavailable")]
    RawUnavailable,
}

#[derive(Debug, Clone)]
struct Stored {
    document: Document,
    secret: Secret,
}

impl Stored {
    fn access(&self) -> DocumentAccess {
        DocumentAccess::new(self.document.clone(), self.secret.clone())
    }
}

/// Shared state between the controller, its handle and any store views.
struct SharedState {
    rng: ChaCha8Rng,
    documents: BTreeMap<DocumentId, Stored>,
    current: Option<DocumentId>,
    subscriptions: BTreeSet<EventKind>,
    /// Responses to dispatched commands, delivered before injected events.
    outbox: VecDeque<ControllerEvent>,
    dispatched: Vec<Command>,
    raw: Option<String>,
}

impl SharedState {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            documents: BTreeMap::new(),
            current: None,
            subscriptions: BTreeSet::new(),
            outbox: VecDeque::new(),
            dispatched: Vec::new(),
            raw: Some(String::new()),
        }
    }

    /// Create and store a document with a fresh id and secret.
    fn create(&mut self, content: &str) -> DocumentAccess {
        let mut id = [0u8; 16];
        self.rng.fill_bytes(&mut id);
        let mut secret = [0u8; 16];
        self.rng.fill_bytes(&mut secret);

        let uuid = uuid::Builder::from_random_bytes(id).into_uuid().to_string();
        let access =
            DocumentAccess::new(Document::new(uuid, content), Secret::new(hex::encode(secret)));
        self.store(&access);
        access
    }

    fn store(&mut self, access: &DocumentAccess) {
        self.documents.insert(access.document.uuid.clone(), Stored {
            document: access.document.clone(),
            secret: access.secret.clone(),
        });
    }

    fn current(&self) -> Option<&Stored> {
        self.current.as_ref().and_then(|id| self.documents.get(id))
    }

    fn current_mut(&mut self) -> Option<&mut Stored> {
        let id = self.current.as_ref()?;
        self.documents.get_mut(id)
    }

    fn apply(&mut self, command: Command) -> Option<ControllerEvent> {
        match command {
            Command::Init { id: None, .. } => {
                let created = self.create("");
                self.current = Some(created.document.uuid.clone());
                Some(ControllerEvent::with_document(EventKind::NoDocumentId, created.document))
            },
            Command::Init { id: Some(id), secret } => {
                let unlocked = self.documents.get(&id).map(|stored| stored.secret == secret);
                let event = match unlocked {
                    Some(true) => {
                        self.current = Some(id);
                        let access = self.current()?.access();
                        return Some(ControllerEvent::with_access(EventKind::Synchronize, access));
                    },
                    Some(false) => EventKind::DecryptionFailed,
                    None => EventKind::DocumentNotFound,
                };
                tracing::debug!(%id, %event, "init failed, creating fallback");
                let fallback = self.create("");
                self.current = Some(fallback.document.uuid.clone());
                Some(ControllerEvent::with_document(event, fallback.document))
            },
            Command::UpdateContent { content } => {
                self.update_current(EventKind::Change, |document| document.content = content)
            },
            Command::UpdateTemplate { template } => {
                self.update_current(EventKind::Change, |document| document.template = template)
            },
        }
    }

    fn update_current(
        &mut self,
        kind: EventKind,
        edit: impl FnOnce(&mut Document),
    ) -> Option<ControllerEvent> {
        let Some(stored) = self.current_mut() else {
            tracing::warn!(%kind, "no current document, ignoring update");
            return None;
        };
        edit(&mut stored.document);
        Some(ControllerEvent::with_access(kind, stored.access()))
    }

    fn pop_outbox(&mut self) -> Option<ControllerEvent> {
        while let Some(event) = self.outbox.pop_front() {
            if self.subscriptions.contains(&event.kind) {
                return Some(event);
            }
        }
        None
    }
}

/// Inspection view over the simulated document store.
///
/// Cheap to clone; every clone sees the same store.
#[derive(Clone)]
pub struct SimStore {
    state: Arc<Mutex<SharedState>>,
}

impl SimStore {
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a document so a later `init` can find it.
    pub fn insert(&self, document: Document, secret: impl Into<Secret>) {
        self.lock().store(&DocumentAccess::new(document, secret));
    }

    /// Stored copy of `id`.
    pub fn document(&self, id: &DocumentId) -> Option<Document> {
        self.lock().documents.get(id).map(|stored| stored.document.clone())
    }

    /// Document the controller currently serves, with its secret.
    pub fn current(&self) -> Option<DocumentAccess> {
        self.lock().current().map(Stored::access)
    }

    /// Every command dispatched so far, in order.
    pub fn dispatched(&self) -> Vec<Command> {
        self.lock().dispatched.clone()
    }

    /// Event kinds the session subscribed to.
    pub fn subscriptions(&self) -> Vec<EventKind> {
        self.lock().subscriptions.iter().copied().collect()
    }

    /// Configure the one-shot raw load. `None` makes it fail.
    pub fn set_raw(&self, raw: Option<String>) {
        self.lock().raw = raw;
    }
}

/// Simulation controller for deterministic testing.
///
/// Implements [`Controller`] so the real [`monod_app::Runtime`] runs
/// against it unchanged.
pub struct SimController {
    store: SimStore,
    injected: mpsc::UnboundedReceiver<ControllerEvent>,
}

/// Injects remote activity into a running [`SimController`].
///
/// Dropping every handle ends the controller's event stream once the
/// pending events are delivered.
#[derive(Clone)]
pub struct SimControllerHandle {
    store: SimStore,
    injected: mpsc::UnboundedSender<ControllerEvent>,
}

impl SimController {
    /// Create a controller whose ids and secrets derive from `seed`.
    pub fn new(seed: u64) -> (Self, SimControllerHandle) {
        let store = SimStore { state: Arc::new(Mutex::new(SharedState::new(seed))) };
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self { store: store.clone(), injected: rx };
        (controller, SimControllerHandle { store, injected: tx })
    }

    /// View of the document store.
    pub fn store(&self) -> SimStore {
        self.store.clone()
    }
}

impl SimControllerHandle {
    /// View of the document store.
    pub fn store(&self) -> SimStore {
        self.store.clone()
    }

    /// Deliver `event` as is. Used for malformed or out-of-band events.
    pub fn inject(&self, event: ControllerEvent) {
        if self.injected.send(event).is_err() {
            tracing::debug!("controller dropped, event discarded");
        }
    }

    /// A third party updated the current document without conflicting.
    pub fn remote_update(&self, content: &str) {
        let event = {
            let mut state = self.store.lock();
            let Some(stored) = state.current_mut() else {
                return;
            };
            stored.document.content = content.to_owned();
            let document = stored.document.clone();
            ControllerEvent::with_document(EventKind::UpdateWithoutConflict, document)
        };
        self.inject(event);
    }

    /// A third party updated the current document while it had local
    /// edits. The original takes `content`; the local version moves to a
    /// fresh fork, which becomes current.
    pub fn remote_conflict(&self, content: &str) {
        let event = {
            let mut state = self.store.lock();
            let Some(local) = state.current().cloned() else {
                return;
            };
            let fork = state.create(&local.document.content);

            let mut original = local;
            original.document.content = content.to_owned();
            let original = original.access();
            state.store(&original);
            state.current = Some(fork.document.uuid.clone());

            ControllerEvent::conflict(original, fork)
        };
        self.inject(event);
    }
}

impl Controller for SimController {
    type Error = SimControllerError;

    fn subscribe(&mut self, kind: EventKind) {
        self.store.lock().subscriptions.insert(kind);
    }

    async fn dispatch(&mut self, command: Command) -> Result<(), Self::Error> {
        tracing::debug!(command = command.name(), "sim dispatch");
        {
            let mut state = self.store.lock();
            state.dispatched.push(command.clone());
            if let Some(event) = state.apply(command) {
                state.outbox.push_back(event);
            }
        }
        Ok(())
    }

    async fn next_event(&mut self) -> Result<Option<ControllerEvent>, Self::Error> {
        let queued = self.store.lock().pop_outbox();
        if queued.is_some() {
            return Ok(queued);
        }

        while let Some(event) = self.injected.recv().await {
            let subscribed = self.store.lock().subscriptions.contains(&event.kind);
            if subscribed {
                return Ok(Some(event));
            }
            tracing::debug!(kind = %event.kind, "no subscriber, dropping event");
        }
        Ok(None)
    }

    fn load_raw(&mut self) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static {
        let raw = self.store.lock().raw.clone();
        future::ready(raw.ok_or(SimControllerError::RawUnavailable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn respond(controller: &mut SimController, command: Command) -> ControllerEvent {
        for kind in EventKind::ALL {
            controller.subscribe(kind);
        }
        controller.dispatch(command).await.expect("dispatch");
        controller.next_event().await.expect("event").expect("open")
    }

    #[tokio::test]
    async fn init_without_id_creates_document() {
        let (mut controller, _handle) = SimController::new(7);
        let event = respond(&mut controller, Command::Init { id: None, secret: Secret::default() })
            .await;

        assert_eq!(event.kind, EventKind::NoDocumentId);
        let document = event.state.document.expect("document");
        assert_eq!(document.uuid.as_str().len(), 36);
        assert_eq!(controller.store().current().map(|a| a.document.uuid), Some(document.uuid));
    }

    #[tokio::test]
    async fn same_seed_same_ids() {
        let (mut a, _ha) = SimController::new(42);
        let (mut b, _hb) = SimController::new(42);
        let init = || Command::Init { id: None, secret: Secret::default() };

        assert_eq!(respond(&mut a, init()).await, respond(&mut b, init()).await);
    }

    #[tokio::test]
    async fn init_checks_secret() {
        let (mut controller, handle) = SimController::new(1);
        handle.store().insert(Document::new("A", "hello"), "s1");

        let wrong =
            respond(&mut controller, Command::Init { id: Some("A".into()), secret: "bad".into() })
                .await;
        assert_eq!(wrong.kind, EventKind::DecryptionFailed);

        let missing =
            respond(&mut controller, Command::Init { id: Some("Z".into()), secret: "s1".into() })
                .await;
        assert_eq!(missing.kind, EventKind::DocumentNotFound);

        let right =
            respond(&mut controller, Command::Init { id: Some("A".into()), secret: "s1".into() })
                .await;
        assert_eq!(right.kind, EventKind::Synchronize);
        assert_eq!(right.state.secret, Some(Secret::new("s1")));
    }

    #[tokio::test]
    async fn update_emits_change() {
        let (mut controller, handle) = SimController::new(1);
        handle.store().insert(Document::new("A", ""), "s");
        respond(&mut controller, Command::Init { id: Some("A".into()), secret: "s".into() }).await;

        let change =
            respond(&mut controller, Command::UpdateContent { content: "new".into() }).await;

        assert_eq!(change.kind, EventKind::Change);
        assert_eq!(handle.store().document(&"A".into()).map(|d| d.content), Some("new".into()));
    }

    #[tokio::test]
    async fn unsubscribed_events_are_dropped() {
        let (mut controller, handle) = SimController::new(1);
        controller.subscribe(EventKind::Change);

        handle.inject(ControllerEvent::with_document(EventKind::Conflict, Document::default()));
        handle.inject(ControllerEvent::with_document(EventKind::Change, Document::default()));
        drop(handle);

        let delivered = controller.next_event().await.expect("event");
        assert_eq!(delivered.map(|e| e.kind), Some(EventKind::Change));
        assert_eq!(controller.next_event().await, Ok(None));
    }

    #[tokio::test]
    async fn remote_conflict_forks_current_document() {
        let (mut controller, handle) = SimController::new(3);
        handle.store().insert(Document::new("A", "local"), "s1");
        respond(&mut controller, Command::Init { id: Some("A".into()), secret: "s1".into() }).await;

        handle.remote_conflict("theirs");
        let event = controller.next_event().await.expect("event").expect("open");

        assert_eq!(event.kind, EventKind::Conflict);
        let fork = event.state.fork.and_then(|f| f.document).expect("fork");
        assert_eq!(fork.content, "local");
        assert_eq!(handle.store().document(&"A".into()).map(|d| d.content), Some("theirs".into()));
        assert_eq!(handle.store().current().map(|a| a.document.uuid), Some(fork.uuid));
    }

    #[tokio::test]
    async fn raw_load_can_fail() {
        let (mut controller, handle) = SimController::new(1);
        handle.store().set_raw(Some("# raw".into()));
        assert_eq!(controller.load_raw().await, Ok("# raw".to_owned()));

        handle.store().set_raw(None);
        assert_eq!(controller.load_raw().await, Err(SimControllerError::RawUnavailable));
    }
}
