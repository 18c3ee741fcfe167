//! Single-threaded observable store.
//!
//! [`Store`] holds one value and a set of callbacks that run synchronously
//! on every [`Store::update`]. It does no locking and cannot leave the
//! thread that created it.

mod store;

pub use store::Store;
