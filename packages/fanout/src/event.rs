use std::fmt;
use std::rc::Rc;

use crate::sealed::Sealed;
use crate::{
    Core, Dispatch, Emitter, IntoListener, LazySet, Listener, Storage, Subscriber, Subscription,
    Teardown, Token,
};

/// A single-threaded event that broadcasts values of type `T` to its listeners.
///
/// Register listeners with [`on()`][Self::on] and broadcast with the free function
/// [`send()`][crate::send]. Broadcasting is synchronous: every listener registered when the
/// broadcast starts is called before `send()` returns, in the order defined by the storage
/// strategy `S`.
///
/// Listeners may register and remove listeners (including themselves) while being called. Removed
/// listeners that have not yet been reached are skipped; listeners added during a broadcast first
/// run on the next one.
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
/// let total = Rc::new(Cell::new(0));
///
/// let subscription = event.on({
///     let total = Rc::clone(&total);
///     move |value: &u32| total.set(total.get() + value)
/// });
///
/// send(&event, 1);
/// send(&event, 2);
/// assert_eq!(total.get(), 3);
///
/// subscription.unsubscribe();
/// send(&event, 3);
/// assert_eq!(total.get(), 3);
/// ```
pub struct Event<T, S = LazySet<T>> {
    core: Rc<Core<T, S>>,
}

impl<T> Event<T> {
    /// Creates an event with the default storage strategy ([`LazySet`]).
    ///
    /// Creating an event does not allocate a listener collection; neither does registering the
    /// first listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, S> Event<T, S>
where
    S: Storage<T>,
{
    /// Creates an event fed by an external push-based source.
    ///
    /// `init` is called immediately with an [`Emitter`] that forwards values to the event's
    /// listeners. If `init` returns a stop function (as `Some(f)`), the stop function runs when
    /// the event is disposed, so disposing the event also detaches it from the source.
    ///
    /// See [`from_source()`][crate::from_source] for the variant that uses the default strategy.
    #[must_use]
    pub fn from_source<F, D>(init: F) -> Self
    where
        F: FnOnce(Emitter<T, S>) -> D,
        D: Teardown,
    {
        let event = Self::default();

        if let Some(teardown) = init(event.emitter()).into_teardown() {
            event.core.set_teardown(teardown);
        }

        event
    }

    /// Registers a listener, returning a handle that removes it again.
    ///
    /// Passing a closure registers a new listener every time. To be able to remove the listener
    /// via [`off()`][Self::off], or to register the same listener more than once, pass a
    /// [`Listener`] instead.
    ///
    /// Registering a listener that is already registered either has no effect or adds a second
    /// registration, depending on the [`Storage::DUPLICATES`] policy of the strategy.
    ///
    /// Dropping the returned [`Subscription`] does not remove the listener.
    pub fn on(&self, listener: impl IntoListener<T>) -> Subscription<T, S> {
        let listener = listener.into_listener();
        self.core.on(listener.clone());
        Subscription::new(Rc::downgrade(&self.core), listener)
    }

    /// Removes a listener.
    ///
    /// Returns whether the listener was registered. If duplicates are kept by the storage
    /// strategy, one registration is removed per call.
    pub fn off(&self, listener: &Listener<T>) -> bool {
        self.core.off(listener)
    }

    /// Removes every listener.
    ///
    /// Returns whether there were any listeners.
    pub fn off_all(&self) -> bool {
        self.core.off_all()
    }

    /// The number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.core.len()
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every listener and stops the external source, if any.
    ///
    /// Disposing more than once has no further effect. A disposed event can still be used: it
    /// delivers broadcasts to nobody and accepts new listeners, which makes it live again. In
    /// builds with `debug_assertions`, such use logs a warning that points at where the event was
    /// disposed.
    pub fn dispose(&self) {
        self.core.dispose();
    }

    /// Whether [`dispose()`][Self::dispose] was called and no listener has been registered since.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }

    /// Returns a handle that can manage listeners but cannot broadcast.
    ///
    /// Hand this to consumers of the event.
    #[must_use]
    pub fn subscriber(&self) -> Subscriber<T, S> {
        Subscriber::new(Rc::clone(&self.core))
    }

    /// Returns a handle that can broadcast but cannot manage listeners.
    ///
    /// Hand this to producers of the event. The emitter does not keep the event alive; once the
    /// event and all its [`Subscriber`]s are dropped, broadcasting through the emitter does
    /// nothing.
    #[must_use]
    pub fn emitter(&self) -> Emitter<T, S> {
        Emitter::new(Rc::downgrade(&self.core))
    }

    #[cfg(test)]
    pub(crate) fn has_collection(&self) -> bool {
        self.core.has_collection()
    }
}

impl<T, S> Default for Event<T, S>
where
    S: Storage<T>,
{
    fn default() -> Self {
        Self {
            core: Rc::new(Core::new()),
        }
    }
}

impl<T, S> Sealed for Event<T, S> {}

impl<T, S> Dispatch<T> for Event<T, S>
where
    S: Storage<T>,
{
    fn dispatch(&self, data: &T, _: Token) {
        self.core.send(data);
    }
}

impl<T, S> fmt::Debug for Event<T, S>
where
    S: Storage<T>,
{
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event").field("core", &self.core).finish()
    }
}
