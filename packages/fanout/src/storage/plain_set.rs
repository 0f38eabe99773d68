use std::cell::RefCell;
use std::mem;

use foldhash::{HashMap, HashMapExt};

use super::{Snapshot, Stamped, for_each_in_snapshot, take_stamp};
use crate::sealed::Sealed;
use crate::{Duplicates, Listener, Storage};

/// Reserved up front so that the hash map owns its allocation from the moment the event exists.
const INITIAL_CAPACITY: usize = 4;

/// Storage that always keeps listeners in a hash map, allocated when the event is created.
///
/// This is the simplest strategy and serves as a correctness baseline for the others. It pays for
/// an allocation even when the event never gets a listener; prefer [`LazySet`][crate::LazySet].
///
/// Registering the same listener twice has no effect ([`Duplicates::Collapse`]).
#[derive(Debug)]
pub struct PlainSet<T> {
    /// Each listener maps to the stamp of its registration.
    listeners: HashMap<Listener<T>, u64>,

    next_stamp: u64,
}

impl<T> Default for PlainSet<T> {
    fn default() -> Self {
        Self {
            listeners: HashMap::with_capacity(INITIAL_CAPACITY),
            next_stamp: 0,
        }
    }
}

impl<T> Sealed for PlainSet<T> {}

impl<T> Storage<T> for PlainSet<T> {
    const DUPLICATES: Duplicates = Duplicates::Collapse;

    type Detached = HashMap<Listener<T>, u64>;

    fn insert(&mut self, listener: Listener<T>) {
        // An existing registration keeps its original stamp.
        if !self.listeners.contains_key(&listener) {
            let stamp = take_stamp(&mut self.next_stamp);
            self.listeners.insert(listener, stamp);
        }
    }

    fn remove(&mut self, listener: &Listener<T>) -> Option<Listener<T>> {
        self.listeners
            .remove_entry(listener)
            .map(|(removed, _)| removed)
    }

    fn clear(&mut self) -> Self::Detached {
        mem::replace(
            &mut self.listeners,
            HashMap::with_capacity(INITIAL_CAPACITY),
        )
    }

    fn len(&self) -> usize {
        self.listeners.len()
    }

    fn has_collection(&self) -> bool {
        true
    }

    fn for_each(storage: &RefCell<Self>, visit: &mut dyn FnMut(&Listener<T>)) {
        let (snapshot, bound) = {
            let this = storage.borrow();
            let snapshot: Snapshot<T> = this.listeners.keys().cloned().collect();
            (snapshot, this.next_stamp)
        };

        for_each_in_snapshot(storage, &snapshot, bound, visit);
    }
}

impl<T> Stamped for PlainSet<T> {
    type Item = T;

    fn stamp_of(&self, listener: &Listener<T>) -> Option<u64> {
        self.listeners.get(listener).copied()
    }
}
