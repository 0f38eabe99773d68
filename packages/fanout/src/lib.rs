#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Single-threaded publish/subscribe events.
//!
//! An [`Event<T>`] is a channel that listeners attach to. A producer broadcasts a value to every
//! listener that is registered at the time of the broadcast by calling the free function
//! [`send()`]. Dispatch is synchronous and happens on the caller's thread.
//!
//! This is part of the [Folo project](https://github.com/folo-rs/folo) that provides mechanisms for
//! high-performance hardware-aware programming in Rust.
//!
//! # Example
//!
//! ```
//! use fanout::{Event, send};
//!
//! let on_did_change = Event::<String>::new();
//!
//! let subscription = on_did_change.on(|data: &String| println!("changed: {data}"));
//! send(&on_did_change, "data".to_string());
//!
//! subscription.unsubscribe();
//! assert!(on_did_change.is_empty());
//! ```
//!
//! # Storage strategies
//!
//! The vast majority of events have zero or one listener. The default strategy, [`LazySet`],
//! stores a single listener inline and only allocates a collection once a second listener arrives.
//! Two alternative strategies are available through the second type parameter of [`Event`]:
//!
//! * [`PlainSet`] - allocates a hash set up front. Simplest, used as a correctness baseline.
//! * [`SparseVec`] - like [`LazySet`] but backs the multi-listener state with a vector whose
//!   removals leave holes that are compacted in bulk. Favors registration churn over broadcasts.
//!   Unlike the set-backed strategies, it keeps duplicate registrations of the same listener.
//!
//! ```
//! use fanout::{Event, SparseVec, send};
//!
//! let event = Event::<u32, SparseVec<u32>>::default();
//! event.on(|value: &u32| assert_eq!(*value, 42));
//! send(&event, 42);
//! ```
//!
//! # Capabilities
//!
//! The [`Event`] owner can do everything. To hand out narrower access, use:
//!
//! * [`Event::subscriber()`] - a [`Subscriber`] that can register and remove listeners but
//!   cannot broadcast.
//! * [`Event::emitter()`] - an [`Emitter`] that can only broadcast. It does not keep the event
//!   alive; broadcasting through an emitter whose event is gone is a no-op.
//!
//! # Failures
//!
//! A listener that panics does not stop the broadcast. The panic is caught, logged via
//! [`tracing`](https://docs.rs/tracing) at the error level and the remaining listeners still run.
//!
//! # Diagnostics
//!
//! In builds with `debug_assertions`, the event remembers where it was disposed and logs a
//! warning with that location if it is used again afterwards. Set `RUST_BACKTRACE=1` to capture
//! the location.

#[cfg(debug_assertions)]
mod backtrace;
mod dispatch;
mod emitter;
mod error;
mod event;
mod listener;
mod sealed;
mod shared;
mod source;
mod storage;
mod subscriber;
mod subscription;

#[cfg(debug_assertions)]
pub(crate) use backtrace::*;
pub(crate) use dispatch::*;
pub use emitter::*;
pub(crate) use error::*;
pub use event::*;
pub use listener::*;
pub(crate) use shared::*;
pub use source::*;
pub use storage::*;
pub use subscriber::*;
pub use subscription::*;
