use std::collections::BTreeMap;
use std::fmt;

/// Opaque identity of one subscriber registration.
///
/// IDs come from a per-store counter and are never reused, so a stale
/// handle can never remove somebody else's callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Subscriber bookkeeping shared by both store flavours.
///
/// `C` is the callback handle type: `Rc<dyn Fn(&T)>` for the local store
/// and `Arc<dyn Fn(&T) + Send + Sync>` for the synchronized one.
pub(crate) struct Registry<C> {
    next_id: u64,
    entries: BTreeMap<SubscriptionId, C>,
}

impl<C> Registry<C> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, callback: C) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, callback);
        id
    }

    /// Returns whether `id` was registered. Unknown IDs are ignored.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub(crate) fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<C: Clone> Registry<C> {
    /// Callbacks registered right now.
    ///
    /// They come out in registration order, which callers must not rely on.
    /// Notification iterates this copy so that callbacks are free to
    /// subscribe or unsubscribe while the pass is running.
    pub(crate) fn snapshot(&self) -> Vec<C> {
        self.entries.values().cloned().collect()
    }
}
