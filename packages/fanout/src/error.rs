use std::any::Any;

use thiserror::Error;

/// A listener or teardown function panicked while the event was running it.
///
/// This never reaches the producer. It only exists to be logged.
#[derive(Debug, Error)]
#[error("{role} panicked: {message}")]
pub(crate) struct ListenerPanicked {
    role: &'static str,
    message: String,
}

impl ListenerPanicked {
    /// Extracts the panic message from a payload returned by `catch_unwind`.
    ///
    /// `panic!` produces either a `&'static str` or a `String` payload. Anything else came from
    /// `panic_any` and has no message we can show.
    pub(crate) fn from_payload(role: &'static str, payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|message| (*message).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());

        Self { role, message }
    }
}
