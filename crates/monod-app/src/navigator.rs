//! Navigation capability.
//!
//! Sessions never touch global browser state. History access is injected
//! through the [`Navigator`] trait; the transition function only ever sees a
//! [`NavigationContext`] snapshot of it.

use monod_core::{DocumentId, Location};
use serde::{Deserialize, Serialize};

/// A history replacement requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Document the new history entry is keyed by.
    pub document: DocumentId,
    /// Target path, including the `#secret` fragment.
    pub path: String,
}

/// Snapshot of the navigator taken before a transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
    /// Current location.
    pub location: Location,
    /// Document the current history entry is keyed by, if any.
    pub recorded: Option<DocumentId>,
}

impl NavigationContext {
    /// Context for `location` with no recorded history entry.
    pub fn at(location: Location) -> Self {
        Self { location, recorded: None }
    }

    /// True when `document` already owns the current history entry.
    ///
    /// An empty recorded id never matches.
    pub fn is_recorded(&self, document: &DocumentId) -> bool {
        self.recorded.as_ref().is_some_and(|recorded| !recorded.is_empty() && recorded == document)
    }
}

/// Browser-history capability.
pub trait Navigator {
    /// Current location.
    fn current_location(&self) -> Location;

    /// Document the current history entry is keyed by, if any.
    fn recorded_document(&self) -> Option<DocumentId>;

    /// Push a history entry keyed by `document`. Replaces the location
    /// without reloading.
    fn push_state(&mut self, document: &DocumentId, title: &str, path: &str);

    /// Snapshot for the transition function.
    fn context(&self) -> NavigationContext {
        NavigationContext { location: self.current_location(), recorded: self.recorded_document() }
    }
}

/// One pushed history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Document the entry is keyed by.
    pub document: DocumentId,
    /// Entry title.
    pub title: String,
    /// Location the entry points at.
    pub location: Location,
}

/// In-process history stack.
///
/// Starts at an initial location with no recorded document, the same as a
/// browser tab opened on a URL.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    initial: Location,
    entries: Vec<HistoryEntry>,
}

impl MemoryHistory {
    /// History opened at `initial`.
    pub fn new(initial: Location) -> Self {
        Self { initial, entries: Vec::new() }
    }

    /// Entries pushed so far, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of pushed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was pushed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Navigator for MemoryHistory {
    fn current_location(&self) -> Location {
        self.entries.last().map_or_else(|| self.initial.clone(), |entry| entry.location.clone())
    }

    fn recorded_document(&self) -> Option<DocumentId> {
        self.entries.last().map(|entry| entry.document.clone())
    }

    fn push_state(&mut self, document: &DocumentId, title: &str, path: &str) {
        match Location::parse(path) {
            Ok(location) => self.entries.push(HistoryEntry {
                document: document.clone(),
                title: title.to_owned(),
                location,
            }),
            Err(e) => tracing::warn!(%document, error = %e, "ignoring push to invalid path"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_history_has_no_record() {
        let history = MemoryHistory::new(Location::parse("/abc#s").expect("absolute"));
        let context = history.context();

        assert_eq!(context.location.path(), "/abc");
        assert_eq!(context.recorded, None);
        assert!(!context.is_recorded(&DocumentId::new("abc")));
    }

    #[test]
    fn push_moves_location_and_record() {
        let mut history = MemoryHistory::new(Location::root());
        history.push_state(&DocumentId::new("B"), "Monod - B", "/r/B#s2");

        let context = history.context();
        assert_eq!(context.location.to_string(), "/r/B#s2");
        assert!(context.is_recorded(&DocumentId::new("B")));
        assert_eq!(history.entries()[0].title, "Monod - B");
    }

    #[test]
    fn invalid_path_is_not_pushed() {
        let mut history = MemoryHistory::new(Location::root());
        history.push_state(&DocumentId::new("B"), "Monod - B", "B#s2");
        assert!(history.is_empty());
    }

    #[test]
    fn empty_record_never_matches() {
        let context = NavigationContext {
            location: Location::root(),
            recorded: Some(DocumentId::default()),
        };
        assert!(!context.is_recorded(&DocumentId::default()));
    }
}
