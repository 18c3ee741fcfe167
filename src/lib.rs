//! # Watchbox
//!
//! A single observable value cell for Rust.
//!
//! A store holds one value of any type and a set of callbacks. Reading and
//! silently replacing the value are plain operations; [`Store::update`]
//! computes a new value from the current one and then runs every callback
//! with it, synchronously, before returning.
//!
//! Two flavours share the same contract:
//! - [`Store<T>`] - single-threaded, no locking, `!Send`
//! - [`SyncStore<T>`] - thread-safe, one reentrant lock held across each
//!   update and its notification pass
//!
//! ```
//! use watchbox::SyncStore;
//!
//! let store = SyncStore::new(1);
//! let sub = store.subscribe(|value| println!("now {value}"));
//!
//! store.update(|n| n + 1); // prints "now 2"
//! store.set(10);           // silent
//! sub.unsubscribe();
//! assert_eq!(store.get(), 10);
//! ```
//!
//! Every `update` notifies, whether or not the value changed. There is no
//! ordering among subscribers.
//!
//! Operations emit `trace`-level [`tracing`] events; install a subscriber
//! in the application to see them.

mod registry;
pub mod store;
mod subscription;
pub mod sync;

// Re-export main types for convenience
pub use registry::SubscriptionId;
pub use store::Store;
pub use subscription::{Subscription, SyncSubscription};
pub use sync::SyncStore;
