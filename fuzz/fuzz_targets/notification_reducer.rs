//! Fuzz target for the notification store
//!
//! Applies arbitrary notify/close sequences and checks the store after each.
//!
//! # Invariants
//!
//! - No two messages share `(content, level)`
//! - Every count is at least 1
//! - Closing an out-of-range index is a no-op
//! - Notifying never reorders existing messages

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use monod_core::{Level, NotificationAction, Notifications};

#[derive(Debug, Clone, Arbitrary)]
enum FuzzLevel {
    Info,
    Warning,
    Error,
}

impl From<FuzzLevel> for Level {
    fn from(level: FuzzLevel) -> Self {
        match level {
            FuzzLevel::Info => Level::Info,
            FuzzLevel::Warning => Level::Warning,
            FuzzLevel::Error => Level::Error,
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum FuzzAction {
    // Small content alphabet so duplicates are common
    Notify { content: u8, level: FuzzLevel },
    Close { index: u8 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let mut store = Notifications::new();

    for action in actions {
        let before = store.clone();
        let action = match action {
            FuzzAction::Notify { content, level } => {
                NotificationAction::notify(format!("m{}", content % 8), level.into())
            },
            FuzzAction::Close { index } => NotificationAction::close(usize::from(index % 16)),
        };
        store = store.clone().reduce(&action);

        let messages = store.messages();
        for (i, a) in messages.iter().enumerate() {
            assert!(a.count >= 1, "zero count at {i}");
            for b in &messages[i + 1..] {
                assert!(!(a.content == b.content && a.level == b.level), "duplicate message");
            }
        }

        match action {
            NotificationAction::Close { index } if index >= before.len() => {
                assert_eq!(store, before, "out-of-range close changed the store");
            },
            NotificationAction::Notify { .. } => {
                let kept: Vec<_> = messages.iter().take(before.len()).map(|m| &m.content).collect();
                let prior: Vec<_> = before.iter().map(|m| &m.content).collect();
                assert_eq!(kept, prior, "notify reordered messages");
            },
            NotificationAction::Close { .. } => {
                assert_eq!(store.len() + 1, before.len());
            },
        }
    }
});
