use std::cell::RefCell;
use std::mem;

use foldhash::{HashMap, HashMapExt};
use tracing::trace;

use super::{Snapshot, Stamped, for_each_in_snapshot, take_stamp};
use crate::sealed::Sealed;
use crate::{Duplicates, Listener, Storage};

/// Storage that holds zero or one listener inline and upgrades to a hash map once a second
/// distinct listener is registered.
///
/// This is the default strategy of [`Event`][crate::Event]. The zero and one listener cases do not
/// allocate. Once upgraded, the map is kept even if listeners are removed one by one; only
/// removing all listeners at once (`off_all()` or `dispose()`) releases it.
///
/// Registering the same listener twice has no effect ([`Duplicates::Collapse`]).
#[derive(Debug)]
pub struct LazySet<T> {
    state: State<T>,

    /// Stamp of the next registration. Survives `clear()` so that a broadcast in progress can
    /// tell old registrations from new ones.
    next_stamp: u64,
}

#[derive(Debug)]
enum State<T> {
    Empty,
    Single(Listener<T>, u64),
    Multi(HashMap<Listener<T>, u64>),
}

impl<T> Default for LazySet<T> {
    fn default() -> Self {
        Self {
            state: State::Empty,
            next_stamp: 0,
        }
    }
}

impl<T> Sealed for LazySet<T> {}

impl<T> Storage<T> for LazySet<T> {
    const DUPLICATES: Duplicates = Duplicates::Collapse;

    type Detached = Self;

    fn insert(&mut self, listener: Listener<T>) {
        // An existing registration keeps its original stamp.
        if self.stamp_of(&listener).is_some() {
            return;
        }

        let stamp = take_stamp(&mut self.next_stamp);

        self.state = match mem::replace(&mut self.state, State::Empty) {
            State::Empty => State::Single(listener, stamp),
            State::Single(existing, existing_stamp) => {
                let mut map = HashMap::with_capacity(2);
                map.insert(existing, existing_stamp);
                map.insert(listener, stamp);

                trace!("upgraded event storage to a listener set");

                State::Multi(map)
            }
            State::Multi(mut map) => {
                map.insert(listener, stamp);
                State::Multi(map)
            }
        };
    }

    fn remove(&mut self, listener: &Listener<T>) -> Option<Listener<T>> {
        // The map is retained even when it becomes empty.
        if let State::Multi(map) = &mut self.state {
            return map.remove_entry(listener).map(|(removed, _)| removed);
        }

        self.stamp_of(listener)?;

        match mem::replace(&mut self.state, State::Empty) {
            State::Single(removed, _) => Some(removed),
            State::Empty | State::Multi(_) => None,
        }
    }

    fn clear(&mut self) -> Self::Detached {
        Self {
            state: mem::replace(&mut self.state, State::Empty),
            next_stamp: self.next_stamp,
        }
    }

    fn len(&self) -> usize {
        match &self.state {
            State::Empty => 0,
            State::Single(..) => 1,
            State::Multi(map) => map.len(),
        }
    }

    fn has_collection(&self) -> bool {
        matches!(self.state, State::Multi(_))
    }

    fn for_each(storage: &RefCell<Self>, visit: &mut dyn FnMut(&Listener<T>)) {
        let (snapshot, bound) = {
            let this = storage.borrow();

            let snapshot: Snapshot<T> = match &this.state {
                State::Empty => return,
                State::Single(listener, _) => Snapshot::from_elem(listener.clone(), 1),
                State::Multi(map) => map.keys().cloned().collect(),
            };

            (snapshot, this.next_stamp)
        };

        for_each_in_snapshot(storage, &snapshot, bound, visit);
    }
}

impl<T> Stamped for LazySet<T> {
    type Item = T;

    fn stamp_of(&self, listener: &Listener<T>) -> Option<u64> {
        match &self.state {
            State::Empty => None,
            State::Single(existing, stamp) => (existing == listener).then_some(*stamp),
            State::Multi(map) => map.get(listener).copied(),
        }
    }
}
