use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;
use std::rc::Rc;

/// A callback that receives every value broadcast through an [`Event`][crate::Event] it is
/// registered with.
///
/// Listeners are compared by identity, not by behavior: clones of the same `Listener` are equal,
/// while two listeners created from identical closures are distinct. Keep a clone of the listener
/// around if you want to remove it via [`Event::off()`][crate::Event::off] later.
///
/// # Example
///
/// ```
/// use fanout::{Event, Listener, send};
///
/// let event = Event::<u32>::new();
/// let listener = Listener::new(|value: &u32| println!("got {value}"));
///
/// event.on(listener.clone());
/// send(&event, 1);
///
/// assert!(event.off(&listener));
/// assert!(event.is_empty());
/// ```
pub struct Listener<T> {
    callback: Rc<dyn Fn(&T)>,
}

impl<T> Listener<T> {
    /// Wraps a callback into a listener with its own identity.
    #[must_use]
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&T) + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    pub(crate) fn call(&self, data: &T) {
        (self.callback)(data);
    }

    /// The address of the shared allocation, which is what identifies the listener.
    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.callback).cast::<()>()
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<T> PartialEq for Listener<T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::addr_eq(self.addr(), other.addr())
    }
}

impl<T> Eq for Listener<T> {}

impl<T> Hash for Listener<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T> fmt::Debug for Listener<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.addr()).finish()
    }
}

/// Conversion into a [`Listener`], accepted by the registration methods.
///
/// Implemented for closures (each call creates a new listener identity) and for [`Listener`]
/// itself (registers that exact identity).
pub trait IntoListener<T> {
    /// Performs the conversion.
    fn into_listener(self) -> Listener<T>;
}

impl<T, F> IntoListener<T> for F
where
    F: Fn(&T) + 'static,
{
    fn into_listener(self) -> Listener<T> {
        Listener::new(self)
    }
}

impl<T> IntoListener<T> for Listener<T> {
    fn into_listener(self) -> Listener<T> {
        self
    }
}
