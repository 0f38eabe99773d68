use std::cell::RefCell;
use std::mem;

use scopeguard::defer;
use tracing::trace;

use crate::sealed::Sealed;
use crate::{Duplicates, Listener, Storage};

/// Storage that holds zero or one listener inline and upgrades to a vector of slots once a second
/// listener is registered.
///
/// Removing a listener empties its slot instead of shifting the rest of the vector. Once fewer
/// than half of the slots are occupied, the vector is compacted in one pass. This favors workloads
/// that register and remove listeners often but broadcast rarely.
///
/// Every registration gets its own slot, so registering the same listener twice means it is
/// invoked twice per broadcast ([`Duplicates::Keep`]).
///
/// # Broadcast bound
///
/// A broadcast visits the slots that existed when it started. Listeners registered during the
/// broadcast are appended after that bound and first run on the next broadcast. Compaction is
/// postponed until no broadcast is in progress, so slot positions stay put while one runs.
#[derive(Debug)]
pub struct SparseVec<T> {
    state: State<T>,

    /// Number of registrations, maintained on every change so that `len()` never has to scan.
    live: usize,

    /// Incremented whenever every listener is removed at once. A broadcast that observes a change
    /// stops, as the slots it was iterating are gone.
    generation: u64,

    /// Number of broadcasts currently iterating the slots (more than one if listeners broadcast
    /// recursively).
    active_passes: usize,
}

#[derive(Debug)]
enum State<T> {
    Empty,
    Single(Listener<T>),
    Multi(Vec<Option<Listener<T>>>),
}

impl<T> SparseVec<T> {
    fn compact_if_sparse(&mut self) {
        if self.active_passes > 0 {
            return;
        }

        let State::Multi(slots) = &mut self.state else {
            return;
        };

        if self.live.saturating_mul(2) >= slots.len() {
            return;
        }

        let slot_count = slots.len();
        slots.retain(Option::is_some);

        trace!(
            before = slot_count,
            after = slots.len(),
            "compacted event listener slots"
        );
    }

    /// The listener in the given slot, if the slot is occupied and still belongs to the
    /// generation that the caller started iterating.
    fn slot(&self, index: usize, generation: u64) -> Slot<T> {
        if self.generation != generation {
            return Slot::Ended;
        }

        match &self.state {
            State::Multi(slots) => match slots.get(index) {
                Some(Some(listener)) => Slot::Occupied(listener.clone()),
                Some(None) => Slot::Vacant,
                None => Slot::Ended,
            },
            State::Empty | State::Single(_) => Slot::Ended,
        }
    }
}

enum Slot<T> {
    Occupied(Listener<T>),
    Vacant,
    Ended,
}

/// How a broadcast proceeds, decided while the storage is borrowed.
enum Pass<T> {
    Skip,
    Single(Listener<T>),
    Slots { count: usize, generation: u64 },
}

impl<T> Default for SparseVec<T> {
    fn default() -> Self {
        Self {
            state: State::Empty,
            live: 0,
            generation: 0,
            active_passes: 0,
        }
    }
}

impl<T> Sealed for SparseVec<T> {}

impl<T> Storage<T> for SparseVec<T> {
    const DUPLICATES: Duplicates = Duplicates::Keep;

    type Detached = Vec<Listener<T>>;

    fn insert(&mut self, listener: Listener<T>) {
        self.state = match mem::replace(&mut self.state, State::Empty) {
            State::Empty => State::Single(listener),
            State::Single(existing) => {
                trace!("upgraded event storage to listener slots");

                State::Multi(vec![Some(existing), Some(listener)])
            }
            State::Multi(mut slots) => {
                slots.push(Some(listener));
                State::Multi(slots)
            }
        };

        self.live = self
            .live
            .checked_add(1)
            .expect("listener count cannot exceed the address space");
    }

    fn remove(&mut self, listener: &Listener<T>) -> Option<Listener<T>> {
        let removed = if let State::Multi(slots) = &mut self.state {
            slots
                .iter_mut()
                .find(|slot| slot.as_ref() == Some(listener))
                .and_then(Option::take)
        } else if matches!(&self.state, State::Single(existing) if existing == listener) {
            match mem::replace(&mut self.state, State::Empty) {
                State::Single(removed) => Some(removed),
                State::Empty | State::Multi(_) => None,
            }
        } else {
            None
        }?;

        self.live = self
            .live
            .checked_sub(1)
            .expect("removed a listener that was not counted");

        self.compact_if_sparse();

        Some(removed)
    }

    fn clear(&mut self) -> Self::Detached {
        self.generation = self.generation.wrapping_add(1);
        self.live = 0;

        match mem::replace(&mut self.state, State::Empty) {
            State::Empty => Vec::new(),
            State::Single(listener) => vec![listener],
            State::Multi(slots) => slots.into_iter().flatten().collect(),
        }
    }

    fn len(&self) -> usize {
        self.live
    }

    fn has_collection(&self) -> bool {
        matches!(self.state, State::Multi(_))
    }

    fn for_each(storage: &RefCell<Self>, visit: &mut dyn FnMut(&Listener<T>)) {
        let pass = {
            let this = storage.borrow();

            match &this.state {
                State::Empty => Pass::Skip,
                State::Single(listener) => Pass::Single(listener.clone()),
                State::Multi(slots) => Pass::Slots {
                    count: slots.len(),
                    generation: this.generation,
                },
            }
        };

        let (count, generation) = match pass {
            Pass::Skip => return,
            Pass::Single(listener) => {
                visit(&listener);
                return;
            }
            Pass::Slots { count, generation } => (count, generation),
        };

        {
            let mut this = storage.borrow_mut();
            this.active_passes = this
                .active_passes
                .checked_add(1)
                .expect("broadcast recursion cannot exceed the address space");
        }

        defer! {
            let mut this = storage.borrow_mut();
            this.active_passes = this
                .active_passes
                .checked_sub(1)
                .expect("ended a broadcast that was never started");
            this.compact_if_sparse();
        }

        for index in 0..count {
            let slot = storage.borrow().slot(index, generation);

            match slot {
                Slot::Occupied(listener) => visit(&listener),
                Slot::Vacant => {}
                Slot::Ended => break,
            }
        }
    }
}
