//! Pure lifecycle transition function.
//!
//! Every controller event maps to exactly one [`Transition`]: the next view
//! state, an optional history replacement and an optional notification. No
//! I/O happens here; callers execute the navigation and render.
//!
//! | Event | Document | Navigation | Notification |
//! |---|---|---|---|
//! | no document id | created document | none | none |
//! | decryption failed | fallback | `/` | error |
//! | document not found | fallback | `/` | error |
//! | conflict | fork | `/{fork}#{fork secret}` | warning linking the original |
//! | update without conflict | updated | none | info |
//! | synchronize / change | current | `/{uuid}#{secret}` | none |
//!
//! Read-only sessions get every navigation path prefixed with `/r`. A
//! navigation is dropped when its document already owns the current history
//! entry, so repeated events do not thrash history.

use monod_core::{
    Document, DocumentAccess, LifecycleEvent, NotificationAction, Secret, scoped_path,
};

use crate::{Navigation, NavigationContext, SessionState};

/// Shown when the requested document could not be decrypted.
pub const DECRYPTION_FAILED_MESSAGE: &str = "We were unable to decrypt the document. Either the \
                                             secret has not been supplied or it is invalid. We \
                                             have redirected you to a new document.";

/// Shown when the requested document does not exist.
pub const DOCUMENT_NOT_FOUND_MESSAGE: &str = "We could not find the document you were trying \
                                              to load, so we have redirected you to a new \
                                              document.";

/// Shown when the document was updated remotely without conflict.
pub const UPDATED_MESSAGE: &str = "We have updated the document you are viewing to its latest \
                                   revision. Happy reading/working!";

/// Warning shown when local edits were moved to a fork of `original`.
pub fn conflict_message(original: &DocumentAccess) -> String {
    format!(
        "Snap! The document you were working on has been updated by a third, and you are now \
         working on a fork. You can still find the original (and updated) document: {}",
        original.path()
    )
}

/// Result of applying one lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Next view state. `messages` already includes `notification`.
    pub state: SessionState,
    /// History replacement to perform, if any.
    pub navigation: Option<Navigation>,
    /// Notification that was pushed through the store, if any.
    pub notification: Option<NotificationAction>,
}

/// Compute the transition for `event` from `state`.
///
/// `history` is a snapshot of the navigator; its recorded document
/// suppresses redundant navigations. `read_only` is fixed when the session
/// opens and prefixes every navigation with `/r`.
pub fn transition(
    state: &SessionState,
    event: LifecycleEvent,
    history: &NavigationContext,
    read_only: bool,
) -> Transition {
    let (document, secret, redirect, notification) = match event {
        LifecycleEvent::NoDocumentId { document } => {
            return Transition {
                state: SessionState { document, loaded: true, ..state.clone() },
                navigation: None,
                notification: None,
            };
        },
        LifecycleEvent::UpdateWithoutConflict { document } => {
            let notification = NotificationAction::info(UPDATED_MESSAGE);
            let messages = state.messages.clone().reduce(&notification);
            return Transition {
                state: SessionState { document, messages, ..state.clone() },
                navigation: None,
                notification: Some(notification),
            };
        },
        LifecycleEvent::DecryptionFailed { fallback } => (
            fallback,
            Secret::default(),
            "/".to_owned(),
            Some(NotificationAction::error(DECRYPTION_FAILED_MESSAGE)),
        ),
        LifecycleEvent::DocumentNotFound { fallback } => (
            fallback,
            Secret::default(),
            "/".to_owned(),
            Some(NotificationAction::error(DOCUMENT_NOT_FOUND_MESSAGE)),
        ),
        LifecycleEvent::Conflict { original, fork } => {
            let notification = NotificationAction::warning(conflict_message(&original));
            let path = fork.path();
            (fork.document, fork.secret, path, Some(notification))
        },
        LifecycleEvent::Synchronize { current } => {
            let path = current.path();
            (current.document, current.secret, path, None)
        },
    };

    let navigation = redirect_to(&document, &redirect, read_only, history);
    let messages = state.messages.clone().reduce(&notification);

    Transition {
        state: SessionState { document, secret, messages, loaded: true, ..state.clone() },
        navigation,
        notification,
    }
}

fn redirect_to(
    document: &Document,
    path: &str,
    read_only: bool,
    history: &NavigationContext,
) -> Option<Navigation> {
    if history.is_recorded(&document.uuid) {
        return None;
    }
    Some(Navigation { document: document.uuid.clone(), path: scoped_path(path, read_only) })
}
