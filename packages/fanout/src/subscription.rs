use std::cell::Cell;
use std::fmt;
use std::rc::Weak;

use crate::{Core, LazySet, Listener, Storage};

/// Removes the listener it was returned for when [`unsubscribe()`][Self::unsubscribe] is called.
///
/// A subscription removes exactly one registration, at most once. Calling
/// [`unsubscribe()`][Self::unsubscribe] again does nothing, even if the same listener has been
/// registered again since.
///
/// Dropping a subscription does not remove the listener. The subscription does not keep the event
/// alive.
pub struct Subscription<T, S = LazySet<T>> {
    core: Weak<Core<T, S>>,
    listener: Listener<T>,
    active: Cell<bool>,
}

impl<T, S> Subscription<T, S>
where
    S: Storage<T>,
{
    pub(crate) fn new(core: Weak<Core<T, S>>, listener: Listener<T>) -> Self {
        Self {
            core,
            listener,
            active: Cell::new(true),
        }
    }

    /// Removes the listener from the event.
    ///
    /// Returns whether a registration was removed. This is `false` on every call after the first,
    /// if the listener was already removed by other means or if the event no longer exists.
    pub fn unsubscribe(&self) -> bool {
        if !self.active.replace(false) {
            return false;
        }

        self.core
            .upgrade()
            .is_some_and(|core| core.off(&self.listener))
    }

    /// Whether [`unsubscribe()`][Self::unsubscribe] has not been called yet.
    ///
    /// This does not track removals made through other means, such as `off()` or `dispose()`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// The listener this subscription removes.
    #[must_use]
    pub fn listener(&self) -> &Listener<T> {
        &self.listener
    }
}

impl<T, S> fmt::Debug for Subscription<T, S> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("listener", &self.listener)
            .field("active", &self.active.get())
            .finish_non_exhaustive()
    }
}
