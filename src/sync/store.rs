use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::ReentrantMutex;
use tracing::trace;

use crate::registry::{Registry, SubscriptionId};
use crate::subscription::{Detach, SyncSubscription};

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    subscribers: Registry<Subscriber<T>>,
}

// The `RefCell` is only ever touched while the reentrant lock is held, and
// never borrowed across a call into user code other than `read`.
struct Shared<T> {
    label: Option<String>,
    cell: ReentrantMutex<RefCell<Inner<T>>>,
}

impl<T> Detach for Shared<T> {
    fn detach(&self, id: SubscriptionId) {
        let guard = self.cell.lock();
        let removed = guard.borrow_mut().subscribers.remove(id);
        trace!(store = self.label.as_deref(), %id, removed, "unsubscribed");
    }

    fn is_attached(&self, id: SubscriptionId) -> bool {
        let guard = self.cell.lock();
        let attached = guard.borrow().subscribers.contains(id);
        attached
    }
}

/// A thread-safe observable value.
///
/// Every operation takes one lock covering both the value and the
/// subscriber set. [`update`](Self::update) keeps that lock until all
/// callbacks have returned, so concurrent updates and their notification
/// passes never interleave.
///
/// The lock is reentrant: a callback may call back into the same store
/// (`get`, `set`, `update`, `subscribe`, or a handle's `unsubscribe`) from
/// the notifying thread without deadlocking. Callbacks that block on
/// another thread which is itself waiting for this store will still
/// deadlock.
///
/// # Examples
///
/// ```
/// use std::thread;
/// use watchbox::SyncStore;
///
/// let store = SyncStore::new(0u64);
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let store = store.clone();
///         thread::spawn(move || {
///             for _ in 0..100 {
///                 store.update(|n| n + 1);
///             }
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(store.get(), 400);
/// ```
pub struct SyncStore<T> {
    shared: Arc<Shared<T>>,
}

impl<T> SyncStore<T> {
    /// Create a new store with the given initial value.
    pub fn new(initial: T) -> Self {
        Self::with_label(None, initial)
    }

    /// Create a store whose log events carry `label` in the `store` field.
    pub fn named(label: impl Into<String>, initial: T) -> Self {
        Self::with_label(Some(label.into()), initial)
    }

    fn with_label(label: Option<String>, initial: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                label,
                cell: ReentrantMutex::new(RefCell::new(Inner {
                    value: initial,
                    subscribers: Registry::new(),
                })),
            }),
        }
    }

    /// The label given to [`named`](Self::named), if any.
    pub fn label(&self) -> Option<&str> {
        self.shared.label.as_deref()
    }

    /// Replace the value without notifying subscribers.
    pub fn set(&self, value: T) {
        let guard = self.shared.cell.lock();
        guard.borrow_mut().value = value;
        trace!(store = self.label(), "value set");
    }

    /// Read the value under the lock without cloning it.
    ///
    /// `f` must not call back into this store.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.shared.cell.lock();
        let inner = guard.borrow();
        f(&inner.value)
    }

    /// Number of callbacks currently registered.
    pub fn subscriber_count(&self) -> usize {
        let guard = self.shared.cell.lock();
        let count = guard.borrow().subscribers.len();
        count
    }

    /// Store `next` and run the callbacks registered at this point.
    ///
    /// The caller holds the lock for the whole call.
    fn commit(&self, cell: &RefCell<Inner<T>>, next: T)
    where
        T: Clone,
    {
        let subscribers = {
            let mut inner = cell.borrow_mut();
            inner.value = next.clone();
            inner.subscribers.snapshot()
        };

        trace!(
            store = self.label(),
            subscribers = subscribers.len(),
            "notifying subscribers"
        );
        for subscriber in &subscribers {
            subscriber(&next);
        }
    }
}

impl<T: Clone> SyncStore<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        let guard = self.shared.cell.lock();
        let value = guard.borrow().value.clone();
        value
    }

    /// Replace the value with `updater(current)` and notify every subscriber.
    ///
    /// The updater and all callbacks run on the calling thread with the
    /// store lock held. Panics propagate to the caller; the lock does not
    /// poison, so the store stays usable with whatever value was last
    /// committed.
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(T) -> T,
    {
        let guard = self.shared.cell.lock();
        let current = guard.borrow().value.clone();
        let next = updater(current);
        self.commit(&guard, next);
    }

    /// Like [`update`](Self::update), but the updater may refuse.
    ///
    /// On `Err` the value is left untouched and nobody is notified.
    pub fn try_update<F, E>(&self, updater: F) -> Result<(), E>
    where
        F: FnOnce(T) -> Result<T, E>,
    {
        let guard = self.shared.cell.lock();
        let current = guard.borrow().value.clone();
        let next = updater(current)?;
        self.commit(&guard, next);
        Ok(())
    }

    /// Edit the value in place, then notify like [`update`](Self::update).
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.update(|mut value| {
            f(&mut value);
            value
        });
    }
}

impl<T: Send + 'static> SyncStore<T> {
    /// Register `callback` to run on every [`update`](Self::update).
    pub fn subscribe<F>(&self, callback: F) -> SyncSubscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let (id, total) = {
            let guard = self.shared.cell.lock();
            let mut inner = guard.borrow_mut();
            let id = inner.subscribers.insert(Arc::new(callback));
            (id, inner.subscribers.len())
        };
        trace!(store = self.label(), %id, subscribers = total, "subscribed");

        let target = Arc::downgrade(&self.shared) as Weak<dyn Detach + Send + Sync>;
        SyncSubscription::new(id, target)
    }
}

impl<T> Clone for SyncStore<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("SyncStore");
        out.field("label", &self.shared.label);
        let guard = self.shared.cell.lock();
        match guard.try_borrow() {
            Ok(inner) => out
                .field("value", &inner.value)
                .field("subscribers", &inner.subscribers.len()),
            Err(_) => out.field("value", &format_args!("<borrowed>")),
        };
        out.finish()
    }
}
