//! Compares the listener storage strategies of `fanout` on the operations that dominate real use.
//!
//! * `LazySet` (default)
//! * `PlainSet`
//! * `SparseVec`
//!
//! Most events in practice have zero or one listener, so those cases come first. The churn
//! scenarios register and remove many listeners to expose the cost of the multi-listener state.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::measurement::WallTime;
use criterion::{BenchmarkGroup, Criterion, criterion_group, criterion_main};
use fanout::{Event, LazySet, Listener, PlainSet, SparseVec, Storage, send};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const MANY_LISTENERS: usize = 100;

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fanout_strategies");

    strategy::<LazySet<u64>>(&mut group, "lazy_set");
    strategy::<PlainSet<u64>>(&mut group, "plain_set");
    strategy::<SparseVec<u64>>(&mut group, "sparse_vec");

    group.finish();
}

fn counting_listener(total: &Rc<Cell<u64>>) -> Listener<u64> {
    let total = Rc::clone(total);
    Listener::new(move |value: &u64| total.set(total.get().wrapping_add(*value)))
}

fn strategy<S: Storage<u64>>(group: &mut BenchmarkGroup<'_, WallTime>, name: &str) {
    let total = Rc::new(Cell::new(0));

    group.bench_function(format!("{name}_create"), |b| {
        b.iter(|| black_box(Event::<u64, S>::default()));
    });

    group.bench_function(format!("{name}_send_none"), |b| {
        let event = Event::<u64, S>::default();

        b.iter(|| send(&event, black_box(1)));
    });

    group.bench_function(format!("{name}_send_one"), |b| {
        let event = Event::<u64, S>::default();
        event.on(counting_listener(&total));

        b.iter(|| send(&event, black_box(1)));
    });

    group.bench_function(format!("{name}_send_many"), |b| {
        let event = Event::<u64, S>::default();
        for _ in 0..MANY_LISTENERS {
            event.on(counting_listener(&total));
        }

        b.iter(|| send(&event, black_box(1)));
    });

    group.bench_function(format!("{name}_on_off_one"), |b| {
        let event = Event::<u64, S>::default();
        let listener = counting_listener(&total);

        b.iter(|| {
            event.on(listener.clone());
            black_box(event.off(&listener));
        });
    });

    group.bench_function(format!("{name}_churn_many"), |b| {
        let listeners = (0..MANY_LISTENERS)
            .map(|_| counting_listener(&total))
            .collect::<Vec<_>>();

        b.iter(|| {
            let event = Event::<u64, S>::default();

            for listener in &listeners {
                event.on(listener.clone());
            }

            // Remove every other listener, broadcast, then remove the rest.
            for listener in listeners.iter().step_by(2) {
                event.off(listener);
            }

            send(&event, black_box(1));

            for listener in listeners.iter().skip(1).step_by(2) {
                event.off(listener);
            }

            event
        });
    });

    black_box(total.get());
}
