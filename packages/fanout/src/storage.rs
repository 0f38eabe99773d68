//! Listener storage strategies.
//!
//! Every strategy satisfies the same contract and differs only in its time/space trade-offs:
//!
//! | Strategy      | 0-1 listeners     | Many listeners                    | Duplicates |
//! |---------------|-------------------|-----------------------------------|------------|
//! | [`PlainSet`]  | allocated set     | hash set                          | collapsed  |
//! | [`LazySet`]   | inline, no alloc  | hash set                          | collapsed  |
//! | [`SparseVec`] | inline, no alloc  | vector with holes, bulk compaction| kept       |

use std::cell::RefCell;

use smallvec::SmallVec;

use crate::Listener;
use crate::sealed::Sealed;

mod lazy_set;
mod plain_set;
mod sparse_vec;

pub use lazy_set::*;
pub use plain_set::*;
pub use sparse_vec::*;

/// How a strategy treats registering the same listener more than once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Duplicates {
    /// Registering an already registered listener has no effect. The listener is counted and
    /// invoked once.
    Collapse,

    /// Every registration is a separate entry. The listener is counted and invoked once per
    /// registration and each removal takes away one registration.
    Keep,
}

/// A listener storage strategy for [`Event`][crate::Event].
///
/// This trait is sealed. Pick one of the strategies provided by this crate.
pub trait Storage<T>: Default + Sealed {
    /// The duplicate registration policy of this strategy.
    const DUPLICATES: Duplicates;

    /// What [`clear()`][Self::clear] hands back. The caller drops it after releasing its borrow
    /// of the storage, so listener destructors can safely reach back into the event.
    type Detached;

    /// Registers a listener.
    fn insert(&mut self, listener: Listener<T>);

    /// Removes one registration of `listener`, returning it if there was one.
    fn remove(&mut self, listener: &Listener<T>) -> Option<Listener<T>>;

    /// Removes every listener.
    fn clear(&mut self) -> Self::Detached;

    /// The number of registrations. This is O(1) for every strategy.
    fn len(&self) -> usize;

    /// Whether there are no registrations.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the storage currently owns a heap-allocated listener collection.
    fn has_collection(&self) -> bool;

    /// Calls `visit` with every listener registered when the pass starts, honoring removals
    /// made while the pass runs.
    ///
    /// Implementations must not hold a borrow of `storage` while `visit` runs.
    fn for_each(storage: &RefCell<Self>, visit: &mut dyn FnMut(&Listener<T>));
}

/// Dispatch snapshot for the set-backed strategies. Sized so that typical small sets do not
/// allocate per broadcast.
type Snapshot<T> = SmallVec<[Listener<T>; 8]>;

/// Hands out the registration stamp for a new listener and advances the counter.
fn take_stamp(next: &mut u64) -> u64 {
    let stamp = *next;
    *next = next
        .checked_add(1)
        .expect("registration count cannot exceed u64");
    stamp
}

/// Visits a snapshot of set members taken when the pass started.
///
/// `bound` is the stamp the next registration would have received at that point. A member is
/// only visited if it is still registered with a stamp below the bound, so members removed since
/// the snapshot are skipped, and so are members that were removed and registered again (including
/// after every listener was removed at once).
fn for_each_in_snapshot<S>(
    storage: &RefCell<S>,
    snapshot: &Snapshot<S::Item>,
    bound: u64,
    visit: &mut dyn FnMut(&Listener<S::Item>),
) where
    S: Stamped,
{
    for listener in snapshot {
        let registered_before_pass = storage
            .borrow()
            .stamp_of(listener)
            .is_some_and(|stamp| stamp < bound);

        if registered_before_pass {
            visit(listener);
        }
    }
}

/// Registration stamps of the set-backed strategies.
///
/// Every registration receives the next value of a per-storage counter that is never reset, not
/// even when all listeners are removed at once.
trait Stamped {
    type Item;

    /// The stamp of the current registration of `listener`, if it is registered.
    fn stamp_of(&self, listener: &Listener<Self::Item>) -> Option<u64>;
}
