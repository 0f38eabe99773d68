//! Bridging external push-based sources into events.

use crate::{Emitter, Event};

/// Creates an event fed by an external push-based source.
///
/// `init` is called immediately with an [`Emitter`] that forwards values to the event's
/// listeners. It typically registers the emitter with the source. If `init` returns a stop
/// function (as `Some(f)`), disposing the event also runs the stop function, detaching the event
/// from the source.
///
/// The emitter does not keep the event alive, so a source holding on to it does not leak the
/// event.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use fanout::{Emitter, Event, from_source, send};
///
/// // A toy source that pushes strings to at most one sink.
/// let sink: Rc<RefCell<Option<Emitter<String>>>> = Rc::default();
///
/// let on_content: Event<String> = from_source({
///     let sink = Rc::clone(&sink);
///     move |notify| {
///         *sink.borrow_mut() = Some(notify);
///         Some(move || {
///             sink.borrow_mut().take();
///         })
///     }
/// });
///
/// on_content.on(|content: &String| println!("content is now {content}"));
///
/// if let Some(notify) = sink.borrow().as_ref() {
///     send(notify, "data".to_string());
/// }
///
/// on_content.dispose();
/// assert!(sink.borrow().is_none());
/// ```
#[must_use]
pub fn from_source<T, F, D>(init: F) -> Event<T>
where
    F: FnOnce(Emitter<T>) -> D,
    D: Teardown,
{
    Event::from_source(init)
}

/// The result of an external source's `init` function.
///
/// * `()` - the source has nothing to stop.
/// * `Option<F>` - if `Some`, `F` is called once when the event is disposed.
pub trait Teardown {
    /// Converts into the stop function to run on disposal, if any.
    fn into_teardown(self) -> Option<Box<dyn FnOnce()>>;
}

impl Teardown for () {
    fn into_teardown(self) -> Option<Box<dyn FnOnce()>> {
        None
    }
}

impl<F> Teardown for Option<F>
where
    F: FnOnce() + 'static,
{
    fn into_teardown(self) -> Option<Box<dyn FnOnce()>> {
        self.map(|stop| -> Box<dyn FnOnce()> { Box::new(stop) })
    }
}
