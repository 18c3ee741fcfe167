//! Thread-safe observable store.
//!
//! [`SyncStore`] has the same contract as [`Store`](crate::Store), with a
//! reentrant lock around the value and the subscriber set.

mod store;

pub use store::SyncStore;
