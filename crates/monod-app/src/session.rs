//! Session state machine.
//!
//! This module defines [`Session`], the adapter between the external
//! document controller and the renderers. It owns the view state exclusively
//! and changes it only by replacing it with the result of
//! [`crate::transition`] or of a local operation.
//!
//! This is a pure state machine: it consumes [`crate::SessionEvent`]s and
//! produces [`crate::SessionAction`]s for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Requests the session document from the controller at startup.
//! - Applies lifecycle events strictly one at a time, in arrival order.
//! - Debounces local edits and drops dispatches that would not change the
//!   document.
//! - Disables edit dispatches in read-only sessions.
//! - Tracks the editor pane and the share dialog.

use std::{ops::Add, time::Duration};

use monod_core::{
    Command, ContractViolation, ControllerEvent, Document, EventKind, Location, NotificationAction,
    Notifications, Secret, document_path,
};

use crate::{
    Debouncer, EditorPane, Handle, NavigationContext, SessionAction, SessionConfig, SessionEvent,
    SessionState, Transition, UserInput, transition,
};

/// Session state machine.
///
/// Generic over the instant type `I` used by the debounce window.
#[derive(Debug, Clone)]
pub struct Session<I> {
    config: SessionConfig,
    state: SessionState,
    /// Location observed with the most recent event.
    location: Location,
    /// Fixed by the location the session was opened at.
    read_only: bool,
    editor: EditorPane,
    pending_content: Debouncer<I, String>,
}

impl<I> Session<I>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    /// Create a session opened at `location`.
    pub fn new(config: SessionConfig, location: Location) -> Self {
        let pending_content = Debouncer::new(config.quiescence_window);
        Self {
            config,
            state: SessionState::new(),
            read_only: location.is_read_only(),
            location,
            editor: EditorPane::new(),
            pending_content,
        }
    }

    /// Lifecycle events the session registers for. One handler per kind.
    pub fn subscriptions() -> [EventKind; 7] {
        EventKind::ALL
    }

    /// Startup dispatch: load the requested document, or create one.
    pub fn init(&self) -> Vec<SessionAction> {
        vec![SessionAction::Dispatch(Command::Init {
            id: self.location.requested_document(),
            secret: self.location.secret(),
        })]
    }

    /// Process an event and return actions.
    ///
    /// `history` is the navigator snapshot taken just before this event.
    ///
    /// # Errors
    ///
    /// [`ContractViolation`] if a lifecycle event is missing fields its kind
    /// requires. The session is left untouched in that case.
    pub fn handle(
        &mut self,
        event: SessionEvent<I>,
        history: &NavigationContext,
    ) -> Result<Vec<SessionAction>, ContractViolation> {
        match event {
            SessionEvent::Lifecycle(event) => self.apply_lifecycle(event, history),
            SessionEvent::Input { input, now } => {
                self.observe(history);
                Ok(self.apply_input(input, now))
            },
            SessionEvent::Tick { now } => {
                self.observe(history);
                Ok(self.tick(now))
            },
            SessionEvent::RawLoaded(raw) => {
                self.observe(history);
                if self.editor.load(raw) { Ok(vec![SessionAction::Render]) } else { Ok(vec![]) }
            },
        }
    }

    fn observe(&mut self, history: &NavigationContext) {
        self.location = history.location.clone();
    }

    fn apply_lifecycle(
        &mut self,
        event: ControllerEvent,
        history: &NavigationContext,
    ) -> Result<Vec<SessionAction>, ContractViolation> {
        let kind = event.kind;
        let event = event.decode().inspect_err(|e| {
            tracing::error!(error = %e, "controller broke the event contract");
        })?;
        self.observe(history);

        let Transition { state, navigation, notification } =
            transition(&self.state, event, history, self.read_only);

        tracing::debug!(%kind, document = %state.document.uuid, loaded = state.loaded, "applied");
        if let Some(NotificationAction::Notify { content, level }) = &notification {
            tracing::info!(%kind, %level, %content, "notifying");
        }

        self.state = state;

        let mut actions = Vec::with_capacity(2);
        if let Some(navigation) = navigation {
            // Track the target now; the navigator catches up when the
            // runtime executes the action.
            if let Ok(location) = Location::parse(&navigation.path) {
                self.location = location;
            }
            actions.push(SessionAction::Navigate(navigation));
        }
        actions.push(SessionAction::Render);
        Ok(actions)
    }

    fn apply_input(&mut self, input: UserInput, now: I) -> Vec<SessionAction> {
        match input {
            UserInput::EditContent { raw } => self.update_content(raw, now),
            UserInput::ChangeTemplate { template } => self.update_template(template),
            UserInput::RemoveMessage { index } => self.remove_message(index),
            UserInput::ToggleShareModal => self.toggle_share_modal(),
            UserInput::MoveCursor { pos } => {
                self.editor.move_cursor(pos);
                vec![SessionAction::Render]
            },
            UserInput::ClickHandle { handle } => self.click_handle(handle),
            UserInput::Quit => vec![SessionAction::Quit],
        }
    }

    /// Record a local edit.
    ///
    /// The editor pane always reflects `raw`. Outside read-only sessions the
    /// edit is queued for dispatch once the quiescence window elapses.
    pub fn update_content(&mut self, raw: String, now: I) -> Vec<SessionAction> {
        if !self.is_read_only() {
            self.pending_content.push(raw.clone(), now);
        }
        self.editor.change(raw);
        vec![SessionAction::Render]
    }

    /// Switch the document template. Ignored in read-only sessions.
    pub fn update_template(&self, template: String) -> Vec<SessionAction> {
        if self.is_read_only() {
            tracing::debug!(%template, "read-only session, not switching template");
            return vec![];
        }
        vec![SessionAction::Dispatch(Command::UpdateTemplate { template })]
    }

    /// Dismiss the message at `index`. Stale indices are ignored.
    pub fn remove_message(&mut self, index: usize) -> Vec<SessionAction> {
        let messages = std::mem::take(&mut self.state.messages);
        self.state.messages = messages.reduce(&NotificationAction::close(index));
        vec![SessionAction::Render]
    }

    /// Open or close the share dialog.
    pub fn toggle_share_modal(&mut self) -> Vec<SessionAction> {
        self.state.display_share_modal = !self.state.display_share_modal;
        vec![SessionAction::Render]
    }

    /// Toggle editor panes.
    pub fn click_handle(&mut self, handle: Handle) -> Vec<SessionAction> {
        self.editor.click(handle);
        vec![SessionAction::Render]
    }

    /// Dispatch the pending edit if its quiescence window has elapsed.
    pub fn tick(&mut self, now: I) -> Vec<SessionAction> {
        match self.pending_content.poll(now) {
            Some(content) => self.content_dispatch(content),
            None => vec![],
        }
    }

    /// Dispatch the pending edit immediately, e.g. before shutdown.
    pub fn flush(&mut self) -> Vec<SessionAction> {
        match self.pending_content.flush() {
            Some(content) => self.content_dispatch(content),
            None => vec![],
        }
    }

    fn content_dispatch(&self, content: String) -> Vec<SessionAction> {
        if content == self.state.document.content {
            tracing::debug!("edit matches current document, not dispatching");
            return vec![];
        }
        vec![SessionAction::Dispatch(Command::UpdateContent { content })]
    }

    /// When the pending edit becomes due. `None` if nothing is pending.
    pub fn deadline(&self) -> Option<I> {
        self.pending_content.deadline()
    }

    /// True while an edit waits for its quiescence window.
    pub fn has_pending_edit(&self) -> bool {
        self.pending_content.is_pending()
    }
}

impl<I> Session<I> {
    /// Current view state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The current document.
    pub fn document(&self) -> &Document {
        &self.state.document
    }

    /// Secret paired with the current document.
    pub fn secret(&self) -> &Secret {
        &self.state.secret
    }

    /// User-facing messages.
    pub fn messages(&self) -> &Notifications {
        &self.state.messages
    }

    /// Whether a lifecycle event has loaded a document.
    pub fn is_loaded(&self) -> bool {
        self.state.loaded
    }

    /// Whether the share dialog is open.
    pub fn display_share_modal(&self) -> bool {
        self.state.display_share_modal
    }

    /// Editor pane state.
    pub fn editor(&self) -> &EditorPane {
        &self.editor
    }

    /// Location observed with the most recent event.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Whether the session was opened through a read-only path.
    ///
    /// Later navigations never change it.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether there is a document to share yet.
    pub fn share_enabled(&self) -> bool {
        !self.location.is_root()
    }

    /// URL granting full access to the current document.
    pub fn full_access_url(&self, origin: &str) -> String {
        format!("{origin}{}", document_path(&self.state.document.uuid, &self.state.secret))
    }

    /// URL granting read-only access to the current document.
    pub fn read_only_url(&self, origin: &str) -> String {
        format!(
            "{origin}{}{}",
            monod_core::READ_ONLY_PREFIX,
            document_path(&self.state.document.uuid, &self.state.secret)
        )
    }

    /// Configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
