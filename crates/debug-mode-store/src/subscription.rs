//! Observer registration
//!
//! Callbacks live in a [`SubscriberRegistry`] shared between the store and
//! every [`Subscription`] guard. The registry lock is never held while a
//! callback runs, so callbacks may subscribe, unsubscribe or query the store.

use crate::snapshot::DebugModeSnapshot;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Boxed observer callback
pub type Observer = Arc<dyn Fn(&DebugModeSnapshot) + Send + Sync>;

/// Identifier of a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw numeric id
    #[inline]
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Registered observers, notified in registration order
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    next_id: AtomicU64,
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
}

impl SubscriberRegistry {
    pub(crate) fn register(&self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.lock().push((id, observer));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.lock().len()
    }

    /// Invoke every observer registered at the time of the call
    pub(crate) fn notify(&self, snapshot: &DebugModeSnapshot) {
        let observers: Vec<Observer> = self
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer(snapshot);
        }
    }
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("observers", &self.len())
            .finish_non_exhaustive()
    }
}

/// Guard for a registered observer
///
/// The observer is removed when the guard is dropped. Use [`detach`] to keep
/// it registered for the lifetime of the store instead.
///
/// [`detach`]: Subscription::detach
#[must_use = "dropping a Subscription unregisters its observer"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<SubscriberRegistry>,
    active: bool,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, registry: &Arc<SubscriberRegistry>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
            active: true,
        }
    }

    /// Id of the underlying observer
    #[inline]
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the observer now
    ///
    /// Returns false if it was already removed or the store is gone.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    /// Keep the observer registered after the guard goes away
    pub fn detach(mut self) -> SubscriptionId {
        self.active = false;
        self.id
    }

    fn release(&mut self) -> bool {
        if !std::mem::replace(&mut self.active, false) {
            return false;
        }
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.remove(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
