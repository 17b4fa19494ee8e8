//! Fuzz target for controller event decoding and the transition function
//!
//! Feeds arbitrary bytes through the same path a controller event takes:
//! JSON payload, contract check, then transition.
//!
//! # Invariants
//!
//! - Malformed payloads are rejected, never panic
//! - Every event except `update-without-conflict` leaves the state loaded
//! - Navigation from a read-only session stays under `/r/`
//! - No navigation when the target document already owns the history entry

#![no_main]

use libfuzzer_sys::fuzz_target;
use monod_app::{NavigationContext, SessionState, transition};
use monod_core::{ControllerEvent, EventKind, Location, READ_ONLY_PREFIX};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };

    let Ok(event) = serde_json::from_slice::<ControllerEvent>(payload) else {
        return;
    };
    let kind = event.kind;
    let Ok(lifecycle) = event.decode() else {
        return;
    };

    let target = if selector & 1 == 0 { "/A#s1" } else { "/r/A#s1" };
    let read_only = selector & 4 != 0;
    let Ok(location) = Location::parse(target) else {
        return;
    };
    let mut history = NavigationContext::at(location);
    if selector & 2 != 0 {
        history.recorded = Some("A".into());
    }

    let state = SessionState::new();
    let next = transition(&state, lifecycle, &history, read_only);

    if kind != EventKind::UpdateWithoutConflict {
        assert!(next.state.loaded, "{kind} left the session unloaded");
    }

    if let Some(navigation) = &next.navigation {
        if read_only {
            assert!(
                navigation.path.starts_with(&format!("{READ_ONLY_PREFIX}/")),
                "read-only session escaped to {}",
                navigation.path
            );
        }
        assert!(!history.is_recorded(&navigation.document), "redundant navigation");
    }
});
