use std::fmt;
use std::rc::Weak;

use crate::sealed::Sealed;
use crate::{Core, LazySet, Storage};

/// Broadcasts `data` to every listener of `target`.
///
/// Listeners run synchronously on the current thread before this function returns. A listener that
/// panics is logged and skipped; the broadcast continues with the remaining listeners and nothing
/// is reported back to the caller.
///
/// Broadcasting through an [`Emitter`] whose event no longer exists does nothing.
///
/// # Example
///
/// ```
/// use fanout::{Event, send};
///
/// let on_did_change = Event::<&str>::new();
/// on_did_change.on(|data: &&str| assert_eq!(*data, "data"));
///
/// send(&on_did_change, "data");
/// ```
pub fn send<T>(target: &impl Dispatch<T>, data: T) {
    target.dispatch(&data, Token(()));
}

/// Something that [`send()`] can broadcast through: an [`Event`][crate::Event] or an [`Emitter`].
///
/// The broadcast entry point cannot be called outside this crate, so the only way to broadcast is
/// through [`send()`]. A listener receiving one of these types as its payload can therefore never
/// mistake it for a method to call.
///
/// This trait is sealed. Types outside this crate cannot become broadcast targets:
///
/// ```compile_fail
/// use fanout::{Dispatch, Token};
///
/// struct Forwarder;
///
/// impl Dispatch<u32> for Forwarder {
///     fn dispatch(&self, _data: &u32, _token: Token) {}
/// }
/// ```
pub trait Dispatch<T>: Sealed {
    #[doc(hidden)]
    fn dispatch(&self, data: &T, token: Token);
}

/// Proof that a dispatch call originates from [`send()`]. Cannot be created outside this crate.
#[doc(hidden)]
#[derive(Debug)]
pub struct Token(());

/// A broadcast-only handle to an [`Event`][crate::Event].
///
/// Give this to producers that should be able to broadcast but not manage listeners. An emitter
/// does not keep its event alive: once the event and all of its
/// [`Subscriber`][crate::Subscriber]s are dropped, broadcasting through the emitter does nothing.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use fanout::{Event, send};
///
/// let event = Event::<u32>::new();
/// let emitter = event.emitter();
///
/// let received = Rc::new(Cell::new(0));
/// event.on({
///     let received = Rc::clone(&received);
///     move |value: &u32| received.set(*value)
/// });
///
/// send(&emitter, 5);
/// assert_eq!(received.get(), 5);
///
/// drop(event);
/// send(&emitter, 6); // No-op, the event is gone.
/// assert_eq!(received.get(), 5);
/// ```
pub struct Emitter<T, S = LazySet<T>> {
    core: Weak<Core<T, S>>,
}

impl<T, S> Emitter<T, S>
where
    S: Storage<T>,
{
    pub(crate) fn new(core: Weak<Core<T, S>>) -> Self {
        Self { core }
    }

    /// Whether the event this emitter broadcasts to still exists.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.core.strong_count() > 0
    }
}

impl<T, S> Sealed for Emitter<T, S> {}

impl<T, S> Dispatch<T> for Emitter<T, S>
where
    S: Storage<T>,
{
    fn dispatch(&self, data: &T, _: Token) {
        if let Some(core) = self.core.upgrade() {
            core.send(data);
        }
    }
}

impl<T, S> Clone for Emitter<T, S> {
    fn clone(&self) -> Self {
        Self {
            core: Weak::clone(&self.core),
        }
    }
}

impl<T, S> fmt::Debug for Emitter<T, S>
where
    S: Storage<T>,
{
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("connected", &self.is_connected())
            .finish()
    }
}
