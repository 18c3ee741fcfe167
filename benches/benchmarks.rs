use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use watchbox::{Store, SyncStore};

#[derive(Clone)]
struct State {
    counter: usize,
    name: String,
}

fn state() -> State {
    State {
        counter: 0,
        name: "test".to_string(),
    }
}

fn store_read_benchmark(c: &mut Criterion) {
    let store = Store::new(42);
    let sync_store = SyncStore::new(42);

    c.bench_function("store_get", |b| {
        b.iter(|| {
            black_box(store.get());
        });
    });

    c.bench_function("sync_store_get", |b| {
        b.iter(|| {
            black_box(sync_store.get());
        });
    });
}

fn store_set_benchmark(c: &mut Criterion) {
    let store = Store::new(0);
    let sync_store = SyncStore::new(0);

    c.bench_function("store_set", |b| {
        let mut i = 0;
        b.iter(|| {
            store.set(black_box(i));
            i += 1;
        });
    });

    c.bench_function("sync_store_set", |b| {
        let mut i = 0;
        b.iter(|| {
            sync_store.set(black_box(i));
            i += 1;
        });
    });
}

fn store_update_benchmark(c: &mut Criterion) {
    let store = Store::new(state());

    c.bench_function("store_update", |b| {
        let mut i = 0;
        b.iter(|| {
            store.modify(|state| {
                state.counter = black_box(i);
            });
            i += 1;
        });
    });

    let sync_store = SyncStore::new(state());

    c.bench_function("sync_store_update", |b| {
        let mut i = 0;
        b.iter(|| {
            sync_store.modify(|state| {
                state.counter = black_box(i);
                black_box(&state.name);
            });
            i += 1;
        });
    });
}

fn store_subscribe_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_store_notify");

    for subscriber_count in [1, 10, 100].iter() {
        let store = SyncStore::new(state());

        for _ in 0..*subscriber_count {
            let _ = store.subscribe(|_| {
                // Empty subscriber
            });
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store.modify(|state| state.counter = black_box(i));
                    i += 1;
                });
            },
        );
    }
    group.finish();

    c.bench_function("subscribe_unsubscribe", |b| {
        let store = Store::new(0);
        b.iter(|| {
            let sub = store.subscribe(|value| {
                black_box(value);
            });
            sub.unsubscribe();
        });
    });
}

criterion_group!(
    benches,
    store_read_benchmark,
    store_set_benchmark,
    store_update_benchmark,
    store_subscribe_benchmark,
);
criterion_main!(benches);
