//! State shared by every handle to the same event.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;

#[cfg(debug_assertions)]
use std::backtrace::Backtrace;

use tracing::warn;

#[cfg(debug_assertions)]
use crate::capture_backtrace;
use crate::{Listener, Storage, invoke, run_teardown};

/// The listener registry behind an [`Event`][crate::Event].
///
/// All operations take `&self` because listeners may call back into the registry while it is
/// broadcasting. The storage is only ever borrowed for the duration of a single storage operation,
/// never while user code runs.
pub(crate) struct Core<T, S> {
    storage: RefCell<S>,

    disposed: Cell<bool>,

    /// Stop function of an external source, run by the first `dispose()`.
    teardown: Cell<Option<Box<dyn FnOnce()>>>,

    // In debug builds, we remember where the event was disposed so that use-after-dispose
    // warnings can point at it.
    #[cfg(debug_assertions)]
    disposed_at: RefCell<Option<Backtrace>>,

    _listener: PhantomData<fn(&T)>,
}

impl<T, S> Core<T, S>
where
    S: Storage<T>,
{
    pub(crate) fn new() -> Self {
        Self {
            storage: RefCell::new(S::default()),
            disposed: Cell::new(false),
            teardown: Cell::new(None),
            #[cfg(debug_assertions)]
            disposed_at: RefCell::new(None),
            _listener: PhantomData,
        }
    }

    pub(crate) fn on(&self, listener: Listener<T>) {
        // Registering after disposal is allowed and makes the event live again.
        let revived = self.disposed.replace(false);

        #[cfg(debug_assertions)]
        if revived {
            self.warn_use_after_dispose("registering a listener");
        }
        #[cfg(not(debug_assertions))]
        let _ = revived;

        self.storage.borrow_mut().insert(listener);
    }

    pub(crate) fn off(&self, listener: &Listener<T>) -> bool {
        let removed = self.storage.borrow_mut().remove(listener);

        // Dropped here, after the storage borrow has been released.
        removed.is_some()
    }

    pub(crate) fn off_all(&self) -> bool {
        let (had_listeners, detached) = {
            let mut storage = self.storage.borrow_mut();
            (!storage.is_empty(), storage.clear())
        };

        drop(detached);

        had_listeners
    }

    pub(crate) fn len(&self) -> usize {
        self.storage.borrow().len()
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub(crate) fn dispose(&self) {
        let first_disposal = !self.disposed.replace(true);

        #[cfg(debug_assertions)]
        if first_disposal {
            *self.disposed_at.borrow_mut() = Some(capture_backtrace());
        }
        #[cfg(not(debug_assertions))]
        let _ = first_disposal;

        self.off_all();

        if let Some(teardown) = self.teardown.take() {
            run_teardown(teardown);
        }
    }

    /// Composes the stop function of an external source into `dispose()`.
    pub(crate) fn set_teardown(&self, teardown: Box<dyn FnOnce()>) {
        self.teardown.set(Some(teardown));
    }

    pub(crate) fn send(&self, data: &T) {
        #[cfg(debug_assertions)]
        if self.disposed.get() {
            self.warn_use_after_dispose("sending");
        }

        S::for_each(&self.storage, &mut |listener| invoke(listener, data));
    }

    #[cfg(test)]
    pub(crate) fn has_collection(&self) -> bool {
        self.storage.borrow().has_collection()
    }

    #[cfg(debug_assertions)]
    fn warn_use_after_dispose(&self, operation: &str) {
        let disposed_at = self.disposed_at.borrow();

        match disposed_at.as_ref() {
            Some(backtrace) => {
                warn!(%backtrace, "{operation} on an event that has already been disposed");
            }
            None => warn!("{operation} on an event that has already been disposed"),
        }
    }
}

impl<T, S> fmt::Debug for Core<T, S>
where
    S: Storage<T>,
{
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core")
            .field("len", &self.len())
            .field("disposed", &self.disposed.get())
            .finish_non_exhaustive()
    }
}
