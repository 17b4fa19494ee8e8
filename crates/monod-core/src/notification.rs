//! Notification store.
//!
//! A pure reducer over user-facing messages. Messages are deduplicated on
//! `(content, level)`: notifying an existing pair bumps its `count` instead
//! of appending a second entry.
//!
//! # Invariants
//!
//! - No two messages share the same `(content, level)`.
//! - Every message has `count >= 1`.
//! - Relative order of messages is first-seen order and never changes,
//!   except that closing one shifts the later ones down by one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Informational.
    Info,
    /// Something the user should look at.
    Warning,
    /// Something failed and was recovered from.
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Text shown to the user.
    pub content: String,
    /// Severity.
    pub level: Level,
    /// How many times this `(content, level)` was notified.
    pub count: u32,
}

impl Message {
    fn new(content: String, level: Level) -> Self {
        Self { content, level, count: 1 }
    }

    fn matches(&self, content: &str, level: Level) -> bool {
        self.level == level && self.content == content
    }
}

/// Actions understood by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationAction {
    /// Add a message, or bump the count of an identical one.
    Notify {
        /// Message text.
        content: String,
        /// Message severity.
        level: Level,
    },

    /// Remove the message at `index`. Out-of-range indices are ignored.
    Close {
        /// Position of the message to remove.
        index: usize,
    },
}

impl NotificationAction {
    /// Notify `content` at `level`.
    pub fn notify(content: impl Into<String>, level: Level) -> Self {
        Self::Notify { content: content.into(), level }
    }

    /// Notify at [`Level::Info`].
    pub fn info(content: impl Into<String>) -> Self {
        Self::notify(content, Level::Info)
    }

    /// Notify at [`Level::Warning`].
    pub fn warning(content: impl Into<String>) -> Self {
        Self::notify(content, Level::Warning)
    }

    /// Notify at [`Level::Error`].
    pub fn error(content: impl Into<String>) -> Self {
        Self::notify(content, Level::Error)
    }

    /// Close the message at `index`.
    pub fn close(index: usize) -> Self {
        Self::Close { index }
    }
}

/// Anything that may carry an action for the notification store.
///
/// The store is reduced with every action flowing through a session. Actions
/// that are not addressed to it return `None` and leave it unchanged.
pub trait NotificationIntent {
    /// The notification action carried by `self`, if any.
    fn notification(&self) -> Option<NotificationAction>;
}

impl NotificationIntent for NotificationAction {
    fn notification(&self) -> Option<NotificationAction> {
        Some(self.clone())
    }
}

impl<T: NotificationIntent> NotificationIntent for Option<T> {
    fn notification(&self) -> Option<NotificationAction> {
        self.as_ref().and_then(NotificationIntent::notification)
    }
}

/// Ordered, deduplicated message store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notifications {
    messages: Vec<Message>,
}

impl Notifications {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `action`, returning the next store.
    ///
    /// Total: never fails, and actions not addressed to the store return it
    /// unchanged.
    #[must_use]
    pub fn reduce(self, action: &impl NotificationIntent) -> Self {
        match action.notification() {
            Some(NotificationAction::Notify { content, level }) => self.notify(content, level),
            Some(NotificationAction::Close { index }) => self.close(index),
            None => self,
        }
    }

    fn notify(mut self, content: String, level: Level) -> Self {
        match self.messages.iter_mut().find(|m| m.matches(&content, level)) {
            Some(existing) => existing.count = existing.count.saturating_add(1),
            None => self.messages.push(Message::new(content, level)),
        }
        self
    }

    fn close(mut self, index: usize) -> Self {
        if index < self.messages.len() {
            self.messages.remove(index);
        }
        self
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Message at `index`.
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Number of distinct messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when no message is held.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate messages in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Notifications {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
