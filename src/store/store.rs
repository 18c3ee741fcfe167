use std::cell::RefCell;
use std::fmt;
use std::rc::{self, Rc};

use tracing::trace;

use crate::registry::{Registry, SubscriptionId};
use crate::subscription::{Detach, Subscription};

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: T,
    subscribers: Registry<Subscriber<T>>,
}

struct Shared<T> {
    label: Option<String>,
    cell: RefCell<Inner<T>>,
}

impl<T> Detach for Shared<T> {
    fn detach(&self, id: SubscriptionId) {
        let removed = self.cell.borrow_mut().subscribers.remove(id);
        trace!(store = self.label.as_deref(), %id, removed, "unsubscribed");
    }

    fn is_attached(&self, id: SubscriptionId) -> bool {
        self.cell.borrow().subscribers.contains(id)
    }
}

/// A single-threaded observable value.
///
/// Cloning a `Store` yields another handle to the same value and the same
/// subscribers. The type is `!Send`; use [`SyncStore`](crate::SyncStore)
/// to share state between threads.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use watchbox::Store;
///
/// let store = Store::new(1);
/// let seen = Rc::new(Cell::new(0));
///
/// let sub = store.subscribe({
///     let seen = seen.clone();
///     move |value| seen.set(*value)
/// });
///
/// store.update(|n| n + 1);
/// assert_eq!(seen.get(), 2);
///
/// sub.unsubscribe();
/// store.update(|_| 10);
/// assert_eq!(seen.get(), 2);
/// assert_eq!(store.get(), 10);
/// ```
pub struct Store<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Store<T> {
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
            shared: Rc::new(Shared {
                label,
                cell: RefCell::new(Inner {
                    value: initial,
                    subscribers: Registry::new(),
                }),
            }),
        }
    }

    /// The label given to [`named`](Self::named), if any.
    pub fn label(&self) -> Option<&str> {
        self.shared.label.as_deref()
    }

    /// Replace the value without notifying subscribers.
    pub fn set(&self, value: T) {
        self.shared.cell.borrow_mut().value = value;
        trace!(store = self.label(), "value set");
    }

    /// Read the value without cloning it.
    ///
    /// `f` must not call back into this store.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let inner = self.shared.cell.borrow();
        f(&inner.value)
    }

    /// Number of callbacks currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.shared.cell.borrow().subscribers.len()
    }

    fn commit(&self, next: T)
    where
        T: Clone,
    {
        let subscribers = {
            let mut inner = self.shared.cell.borrow_mut();
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

impl<T: Clone> Store<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.shared.cell.borrow().value.clone()
    }

    /// Replace the value with `updater(current)` and notify every subscriber.
    ///
    /// Subscribers are notified even when the new value equals the old one.
    /// The callbacks registered when notification starts are the ones that
    /// run; registrations made by those callbacks take effect from the next
    /// update. A panic in `updater` or in a subscriber propagates to the
    /// caller and is not rolled back.
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(T) -> T,
    {
        let next = updater(self.get());
        self.commit(next);
    }

    /// Like [`update`](Self::update), but the updater may refuse.
    ///
    /// On `Err` the value is left untouched and nobody is notified.
    pub fn try_update<F, E>(&self, updater: F) -> Result<(), E>
    where
        F: FnOnce(T) -> Result<T, E>,
    {
        let next = updater(self.get())?;
        self.commit(next);
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

impl<T: 'static> Store<T> {
    /// Register `callback` to run on every [`update`](Self::update).
    ///
    /// The callback is not run for the current value, only for later
    /// updates.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let (id, total) = {
            let mut inner = self.shared.cell.borrow_mut();
            let id = inner.subscribers.insert(Rc::new(callback));
            (id, inner.subscribers.len())
        };
        trace!(store = self.label(), %id, subscribers = total, "subscribed");

        let target = Rc::downgrade(&self.shared) as rc::Weak<dyn Detach>;
        Subscription::new(id, target)
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Store");
        out.field("label", &self.shared.label);
        match self.shared.cell.try_borrow() {
            Ok(inner) => out
                .field("value", &inner.value)
                .field("subscribers", &inner.subscribers.len()),
            Err(_) => out.field("value", &format_args!("<borrowed>")),
        };
        out.finish()
    }
}
