//! Controller lifecycle events.
//!
//! The external document controller emits named events carrying a loosely
//! shaped state payload ([`ControllerEvent`]). Before a session acts on one,
//! it is validated into a [`LifecycleEvent`], whose variants carry exactly
//! the fields each kind needs. Validation is the single place where a
//! malformed payload is detected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ContractViolation, Document, DocumentAccess, Secret};

/// Names of the lifecycle events the controller emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// No document id was requested; a fresh document was created.
    NoDocumentId,
    /// The requested document could not be decrypted with the given secret.
    DecryptionFailed,
    /// The requested document does not exist.
    DocumentNotFound,
    /// A remote update conflicted with local edits; the document was forked.
    Conflict,
    /// A remote update was applied without conflict.
    UpdateWithoutConflict,
    /// The document was synchronized with the store.
    Synchronize,
    /// The document changed locally and was pushed to the store.
    Change,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::NoDocumentId,
        Self::DecryptionFailed,
        Self::DocumentNotFound,
        Self::Conflict,
        Self::UpdateWithoutConflict,
        Self::Synchronize,
        Self::Change,
    ];

    /// Wire name of the event.
    pub fn name(self) -> &'static str {
        match self {
            Self::NoDocumentId => "no-document-id",
            Self::DecryptionFailed => "decryption-failed",
            Self::DocumentNotFound => "document-not-found",
            Self::Conflict => "conflict",
            Self::UpdateWithoutConflict => "update-without-conflict",
            Self::Synchronize => "synchronize",
            Self::Change => "change",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fork half of a conflict payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkState {
    /// The forked document.
    #[serde(default)]
    pub document: Option<Document>,
    /// Secret of the forked document.
    #[serde(default)]
    pub secret: Option<Secret>,
}

/// State payload as emitted by the controller.
///
/// Every field is optional on the wire; which ones are required depends on
/// the event kind and is enforced by [`ControllerEvent::decode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventState {
    /// Current (or fallback) document.
    #[serde(default)]
    pub document: Option<Document>,
    /// Secret paired with `document`.
    #[serde(default)]
    pub secret: Option<Secret>,
    /// Fork created on conflict.
    #[serde(default)]
    pub fork: Option<ForkState>,
}

/// A raw event from the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerEvent {
    /// Event name.
    pub kind: EventKind,
    /// State payload.
    #[serde(default)]
    pub state: EventState,
}

impl ControllerEvent {
    /// Event carrying only a document.
    pub fn with_document(kind: EventKind, document: Document) -> Self {
        Self { kind, state: EventState { document: Some(document), ..EventState::default() } }
    }

    /// Event carrying a document and its secret.
    pub fn with_access(kind: EventKind, access: DocumentAccess) -> Self {
        Self {
            kind,
            state: EventState {
                document: Some(access.document),
                secret: Some(access.secret),
                fork: None,
            },
        }
    }

    /// Conflict event: the original document and the fork made from it.
    pub fn conflict(original: DocumentAccess, fork: DocumentAccess) -> Self {
        Self {
            kind: EventKind::Conflict,
            state: EventState {
                document: Some(original.document),
                secret: Some(original.secret),
                fork: Some(ForkState { document: Some(fork.document), secret: Some(fork.secret) }),
            },
        }
    }

    /// Validate the payload against the requirements of its kind.
    ///
    /// # Errors
    ///
    /// [`ContractViolation`] naming the first missing field.
    pub fn decode(self) -> Result<LifecycleEvent, ContractViolation> {
        let kind = self.kind;
        let EventState { document, secret, fork } = self.state;
        let document = document.ok_or(ContractViolation::missing(kind, "document"));

        let event = match kind {
            EventKind::NoDocumentId => LifecycleEvent::NoDocumentId { document: document? },
            EventKind::DecryptionFailed => LifecycleEvent::DecryptionFailed { fallback: document? },
            EventKind::DocumentNotFound => LifecycleEvent::DocumentNotFound { fallback: document? },
            EventKind::UpdateWithoutConflict => {
                LifecycleEvent::UpdateWithoutConflict { document: document? }
            },
            EventKind::Synchronize | EventKind::Change => {
                let document = document?;
                let secret = secret.ok_or(ContractViolation::missing(kind, "secret"))?;
                LifecycleEvent::Synchronize { current: DocumentAccess::new(document, secret) }
            },
            EventKind::Conflict => {
                let document = document?;
                let secret = secret.ok_or(ContractViolation::missing(kind, "secret"))?;
                let fork = fork.ok_or(ContractViolation::missing(kind, "fork"))?;
                let fork_document =
                    fork.document.ok_or(ContractViolation::missing(kind, "fork.document"))?;
                let fork_secret =
                    fork.secret.ok_or(ContractViolation::missing(kind, "fork.secret"))?;
                LifecycleEvent::Conflict {
                    original: DocumentAccess::new(document, secret),
                    fork: DocumentAccess::new(fork_document, fork_secret),
                }
            },
        };

        Ok(event)
    }
}

impl TryFrom<ControllerEvent> for LifecycleEvent {
    type Error = ContractViolation;

    fn try_from(event: ControllerEvent) -> Result<Self, Self::Error> {
        event.decode()
    }
}

/// A validated lifecycle event.
///
/// `synchronize` and `change` are handled identically and both decode to
/// [`LifecycleEvent::Synchronize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A fresh document was created because none was requested.
    NoDocumentId {
        /// The fresh document.
        document: Document,
    },

    /// Decryption failed; the controller created a fallback document.
    DecryptionFailed {
        /// Fresh document replacing the undecryptable one.
        fallback: Document,
    },

    /// The requested document is missing; the controller created a fallback.
    DocumentNotFound {
        /// Fresh document replacing the missing one.
        fallback: Document,
    },

    /// Local edits conflicted with a remote update and were forked.
    Conflict {
        /// The original, remotely updated document.
        original: DocumentAccess,
        /// The fork holding the local edits.
        fork: DocumentAccess,
    },

    /// The document was updated to its latest remote revision.
    UpdateWithoutConflict {
        /// Updated document.
        document: Document,
    },

    /// The document is synchronized with the store.
    Synchronize {
        /// Current document and its secret.
        current: DocumentAccess,
    },
}
