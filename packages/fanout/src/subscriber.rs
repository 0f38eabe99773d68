use std::fmt;
use std::rc::Rc;

use crate::{Core, IntoListener, LazySet, Listener, Storage, Subscription};

/// A handle to an [`Event`][crate::Event] that can manage listeners but cannot broadcast.
///
/// Give this to consumers of the event. Subscribers are cheap to clone and keep the event alive.
///
/// # Example
///
/// ```
/// use fanout::{Event, send};
///
/// let event = Event::<u32>::new();
/// let subscriber = event.subscriber();
///
/// subscriber.on(|value: &u32| println!("received {value}"));
/// assert_eq!(event.len(), 1);
///
/// send(&event, 1);
/// ```
pub struct Subscriber<T, S = LazySet<T>> {
    core: Rc<Core<T, S>>,
}

impl<T, S> Subscriber<T, S>
where
    S: Storage<T>,
{
    pub(crate) fn new(core: Rc<Core<T, S>>) -> Self {
        Self { core }
    }

    /// Registers a listener, returning a handle that removes it again.
    ///
    /// See [`Event::on()`][crate::Event::on].
    pub fn on(&self, listener: impl IntoListener<T>) -> Subscription<T, S> {
        let listener = listener.into_listener();
        self.core.on(listener.clone());
        Subscription::new(Rc::downgrade(&self.core), listener)
    }

    /// Removes a listener, returning whether it was registered.
    pub fn off(&self, listener: &Listener<T>) -> bool {
        self.core.off(listener)
    }

    /// Removes every listener, returning whether there were any.
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
    /// See [`Event::dispose()`][crate::Event::dispose].
    pub fn dispose(&self) {
        self.core.dispose();
    }
}

impl<T, S> Clone for Subscriber<T, S> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T, S> fmt::Debug for Subscriber<T, S>
where
    S: Storage<T>,
{
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("core", &self.core)
            .finish()
    }
}
