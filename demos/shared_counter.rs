//! A counter shared between worker threads.
//!
//! Run with `RUST_LOG=watchbox=trace cargo run --example shared_counter`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use tracing_subscriber::EnvFilter;
use watchbox::SyncStore;

const WORKERS: usize = 4;
const TICKS: usize = 25;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let counter = SyncStore::named("counter", 0usize);
    let milestones = Arc::new(AtomicUsize::new(0));

    let watcher = counter.subscribe({
        let milestones = milestones.clone();
        move |value| {
            if value % 10 == 0 {
                milestones.fetch_add(1, Ordering::SeqCst);
                println!("reached {value}");
            }
        }
    });

    let workers: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..TICKS {
                    counter.update(|n| n + 1);
                }
                println!("worker {worker} done");
            })
        })
        .collect();

    for worker in workers {
        if worker.join().is_err() {
            eprintln!("a worker panicked");
        }
    }

    watcher.unsubscribe();
    println!(
        "final value {} after {} milestones",
        counter.get(),
        milestones.load(Ordering::SeqCst)
    );
}
