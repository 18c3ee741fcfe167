//! Removal handles returned by `subscribe`.

use std::fmt;
use std::rc;
use std::sync;

use crate::registry::SubscriptionId;

/// Something a subscriber can be detached from.
pub(crate) trait Detach {
    fn detach(&self, id: SubscriptionId);

    fn is_attached(&self, id: SubscriptionId) -> bool;
}

/// Handle for a callback registered on a [`Store`](crate::Store).
///
/// Dropping the handle does **not** unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe) for that. The handle only holds a
/// weak reference, so it never keeps the store alive.
pub struct Subscription {
    id: SubscriptionId,
    target: rc::Weak<dyn Detach>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, target: rc::Weak<dyn Detach>) -> Self {
        Self { id, target }
    }

    /// The identity this callback was registered under.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the callback from its store.
    ///
    /// Safe to call any number of times, and after the store is gone.
    pub fn unsubscribe(&self) {
        if let Some(target) = self.target.upgrade() {
            target.detach(self.id);
        }
    }

    /// Whether the callback is still registered on a live store.
    pub fn is_active(&self) -> bool {
        self.target
            .upgrade()
            .is_some_and(|target| target.is_attached(self.id))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Handle for a callback registered on a [`SyncStore`](crate::SyncStore).
///
/// Same semantics as [`Subscription`], but can be moved to and used from
/// any thread.
pub struct SyncSubscription {
    id: SubscriptionId,
    target: sync::Weak<dyn Detach + Send + Sync>,
}

impl SyncSubscription {
    pub(crate) fn new(id: SubscriptionId, target: sync::Weak<dyn Detach + Send + Sync>) -> Self {
        Self { id, target }
    }

    /// The identity this callback was registered under.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the callback from its store. Idempotent.
    ///
    /// Takes the store lock; calling this from inside a notification on the
    /// same thread is fine, the lock is reentrant.
    pub fn unsubscribe(&self) {
        if let Some(target) = self.target.upgrade() {
            target.detach(self.id);
        }
    }

    /// Whether the callback is still registered on a live store.
    pub fn is_active(&self) -> bool {
        self.target
            .upgrade()
            .is_some_and(|target| target.is_attached(self.id))
    }
}

impl fmt::Debug for SyncSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSubscription")
            .field("id", &self.id)
            .finish()
    }
}
