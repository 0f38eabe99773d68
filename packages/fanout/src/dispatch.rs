//! Failure isolation for user code run by an event.

use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use crate::{Listener, ListenerPanicked};

/// Calls one listener, containing any panic so the rest of the broadcast can proceed.
///
/// The failing listener stays registered.
pub(crate) fn invoke<T>(listener: &Listener<T>, data: &T) {
    // The listener only sees a shared reference to the payload and our storage is never borrowed
    // while user code runs, so a panic cannot leave any of our state half-updated.
    run_isolated("listener", || listener.call(data));
}

/// Runs a teardown function composed into an event by `from_source`.
pub(crate) fn run_teardown(teardown: Box<dyn FnOnce()>) {
    run_isolated("teardown", teardown);
}

fn run_isolated(role: &'static str, f: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
        let failure = ListenerPanicked::from_payload(role, payload.as_ref());
        error!(error = %failure, "event {role} failed; continuing");
    }
}
