//! The debug mode store
//!
//! [`DebugModeStore`] owns the enabled-key set. Every mutation replaces the
//! whole set under one lock, then publishes the new snapshot to the `watch`
//! channel and to callback observers before returning.

use crate::keys::{DebugModeKey, IntoKeys};
use crate::snapshot::{DebugModeSnapshot, EnabledKeys};
use crate::subscription::{SubscriberRegistry, Subscription};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Lock-protected state: the current snapshot plus snapshots not yet
/// delivered to callback observers
#[derive(Debug, Default)]
struct StoreState {
    current: DebugModeSnapshot,
    pending: VecDeque<DebugModeSnapshot>,
    delivering: bool,
}

/// Resets the delivery flag when the outermost notification pass ends,
/// including by unwinding out of an observer
struct DeliveryGuard<'a>(&'a RefCell<StoreState>);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.0.borrow_mut();
        state.delivering = false;
        state.pending.clear();
    }
}

/// Observable set of enabled diagnostic keys
///
/// Construct one per process and share it by reference or `Arc`. Reads are
/// consistent with the latest completed write on any thread.
///
/// The state lock is re-entrant so an observer may query or mutate the store
/// from inside its callback. A nested mutation takes effect immediately but
/// its notification is queued behind the pass in progress, so every observer
/// receives snapshots in version order.
pub struct DebugModeStore {
    state: ReentrantMutex<RefCell<StoreState>>,
    subscribers: Arc<SubscriberRegistry>,
    publisher: watch::Sender<DebugModeSnapshot>,
}

impl DebugModeStore {
    /// Store with nothing enabled
    #[must_use]
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(DebugModeSnapshot::default());
        Self {
            state: ReentrantMutex::new(RefCell::new(StoreState::default())),
            subscribers: Arc::new(SubscriberRegistry::default()),
            publisher,
        }
    }

    /// Store seeded with `keys`, as if `enable_keys` ran before any observer
    #[must_use]
    pub fn with_keys(keys: impl IntoKeys) -> Self {
        let store = Self::new();
        store.enable_keys(keys);
        store
    }

    // ACCESSORS

    /// True when any key is enabled
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        let guard = self.state.lock();
        let active = guard.borrow().current.enabled.is_active();
        active
    }

    /// True when at least one of `keys` is enabled
    ///
    /// Short-circuits to false when nothing is enabled. An empty key list is
    /// never enabled.
    #[must_use]
    pub fn is_any_enabled(&self, keys: impl IntoKeys) -> bool {
        let guard = self.state.lock();
        let state = guard.borrow();
        if state.current.enabled.is_empty() {
            return false;
        }
        let keys = keys.into_keys();
        let hit = state.current.enabled.contains_any(&keys);
        hit
    }

    /// Copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> DebugModeSnapshot {
        let guard = self.state.lock();
        let snapshot = guard.borrow().current.clone();
        snapshot
    }

    /// Enabled keys in insertion order
    #[must_use]
    pub fn enabled_keys(&self) -> Vec<DebugModeKey> {
        let guard = self.state.lock();
        let keys = guard.borrow().current.enabled.to_vec();
        keys
    }

    // API

    /// Enable every key
    pub fn enable_all(&self) {
        self.apply("enable_all", |_| EnabledKeys::all());
    }

    /// Disable every key
    pub fn disable_all(&self) {
        self.apply("disable_all", |_| EnabledKeys::new());
    }

    /// Add `keys` to the enabled set
    pub fn enable_keys(&self, keys: impl IntoKeys) {
        let keys = keys.into_keys();
        if keys.is_empty() {
            return;
        }
        self.apply("enable_keys", |current| current.union(&keys));
    }

    /// Remove `keys` from the enabled set
    pub fn disable_keys(&self, keys: impl IntoKeys) {
        let keys = keys.into_keys();
        self.apply("disable_keys", |current| current.difference(&keys));
    }

    /// Make `keys` the exact enabled set
    pub fn replace_enabled_keys(&self, keys: impl IntoKeys) {
        let keys = keys.into_keys();
        self.apply("replace_enabled_keys", |_| keys.iter().copied().collect());
    }

    // OBSERVATION

    /// Register a callback run after every effective change
    ///
    /// The callback runs on the mutating thread before the outermost mutating
    /// call returns, once per change and in version order. It is not called
    /// for the current state at registration time.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&DebugModeSnapshot) + Send + Sync + 'static,
    {
        let id = self.subscribers.register(Arc::new(observer));
        tracing::trace!(subscription = %id, "debug mode observer registered");
        Subscription::new(id, &self.subscribers)
    }

    /// Receiver that always holds the latest snapshot
    ///
    /// The channel closes when the store is dropped.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<DebugModeSnapshot> {
        self.publisher.subscribe()
    }

    /// Number of registered callback observers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn apply(&self, operation: &'static str, next: impl FnOnce(&EnabledKeys) -> EnabledKeys) {
        let guard = self.state.lock();

        let outermost = {
            let mut state = guard.borrow_mut();
            let enabled = next(&state.current.enabled);
            if enabled == state.current.enabled {
                tracing::trace!(operation, keys = %state.current.enabled, "debug mode unchanged");
                return;
            }
            state.current.enabled = enabled;
            state.current.version += 1;
            let snapshot = state.current.clone();

            tracing::debug!(
                operation,
                keys = %snapshot.enabled,
                version = snapshot.version,
                "debug mode updated"
            );

            self.publisher.send_replace(snapshot.clone());
            state.pending.push_back(snapshot);
            !std::mem::replace(&mut state.delivering, true)
        };

        // A nested call leaves its snapshot for the outer pass to deliver.
        if outermost {
            self.deliver_pending(&guard);
        }
    }

    fn deliver_pending(&self, state: &RefCell<StoreState>) {
        let _reset = DeliveryGuard(state);
        while let Some(snapshot) = next_pending(state) {
            self.subscribers.notify(&snapshot);
        }
    }
}

fn next_pending(state: &RefCell<StoreState>) -> Option<DebugModeSnapshot> {
    let mut state = state.borrow_mut();
    state.pending.pop_front()
}

impl Default for DebugModeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DebugModeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugModeStore")
            .field("state", &self.snapshot())
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use DebugModeKey::{LocalStorage, Snippets};

    #[test]
    fn is_disabled_by_default() {
        let store = DebugModeStore::new();
        assert!(!store.is_enabled());
        assert!(!store.is_any_enabled(Snippets));
        assert!(!store.is_any_enabled(LocalStorage));
    }

    #[test]
    fn enable_all_toggles_every_key_on() {
        let store = DebugModeStore::new();
        store.enable_all();

        assert!(store.is_enabled());
        for key in DebugModeKey::ALL {
            assert!(store.is_any_enabled(key));
        }
    }

    #[test]
    fn disable_all_clears_previous_keys() {
        let store = DebugModeStore::new();
        store.enable_all();
        store.disable_all();

        assert!(!store.is_enabled());
        for key in DebugModeKey::ALL {
            assert!(!store.is_any_enabled(key));
        }
    }

    #[test]
    fn enable_keys_on_empty_store() {
        let store = DebugModeStore::new();
        store.enable_keys([Snippets]);

        assert!(store.is_enabled());
        assert!(store.is_any_enabled(Snippets));
        assert!(!store.is_any_enabled(LocalStorage));
    }

    #[test]
    fn enable_keys_is_additive() {
        let store = DebugModeStore::new();
        store.enable_keys(LocalStorage);
        store.enable_keys(Snippets);

        assert!(store.is_any_enabled(LocalStorage));
        assert!(store.is_any_enabled(Snippets));
        assert_eq!(store.enabled_keys(), vec![LocalStorage, Snippets]);
    }

    #[test]
    fn enable_keys_when_all_enabled_is_a_no_op() {
        let store = DebugModeStore::new();
        store.enable_all();
        let before = store.snapshot();

        store.enable_keys(Snippets);

        assert_eq!(store.snapshot(), before);
        assert!(store.is_any_enabled(Snippets));
    }

    #[test]
    fn enable_keys_with_empty_list_does_nothing() {
        let store = DebugModeStore::new();
        store.enable_keys(Vec::new());
        assert_eq!(store.snapshot().version, 0);
        assert!(!store.is_enabled());
    }

    #[test]
    fn disable_keys_removing_everything_turns_debug_mode_off() {
        let store = DebugModeStore::new();
        store.enable_all();
        store.disable_keys([LocalStorage, Snippets]);

        assert!(!store.is_enabled());
    }

    #[test]
    fn disable_keys_leaves_other_keys() {
        let store = DebugModeStore::new();
        store.enable_all();
        store.disable_keys(Snippets);

        assert!(store.is_enabled());
        assert!(!store.is_any_enabled(Snippets));
        assert!(store.is_any_enabled(LocalStorage));
    }

    #[test]
    fn replace_enabled_keys_overwrites() {
        let store = DebugModeStore::new();
        store.enable_keys(LocalStorage);
        store.replace_enabled_keys(Snippets);

        assert!(store.is_enabled());
        assert!(!store.is_any_enabled(LocalStorage));
        assert!(store.is_any_enabled(Snippets));
    }

    #[test]
    fn replace_enabled_keys_deduplicates() {
        let store = DebugModeStore::new();
        store.replace_enabled_keys([Snippets, Snippets]);
        assert_eq!(store.enabled_keys(), vec![Snippets]);
    }

    #[test]
    fn is_any_enabled_is_an_or_over_arguments() {
        let store = DebugModeStore::with_keys(Snippets);
        assert!(store.is_any_enabled([LocalStorage, Snippets]));
        assert!(!store.is_any_enabled([LocalStorage]));
        assert!(!store.is_any_enabled(Vec::new()));
    }

    #[test]
    fn observers_see_the_write_before_the_call_returns() {
        let store = DebugModeStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |snapshot| sink.lock().push(snapshot.enabled.to_vec()));

        store.enable_keys(Snippets);
        assert_eq!(*seen.lock(), vec![vec![Snippets]]);

        store.disable_all();
        assert_eq!(*seen.lock(), vec![vec![Snippets], vec![]]);
    }

    #[test]
    fn no_op_mutations_do_not_notify() {
        let store = DebugModeStore::new();
        let count = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&count);
        let _sub = store.subscribe(move |_| *counter.lock() += 1);

        store.disable_all();
        store.disable_keys(Snippets);
        store.enable_all();
        store.enable_all();
        store.replace_enabled_keys([Snippets, LocalStorage]);

        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn observer_can_read_the_store_reentrantly() {
        let store = Arc::new(DebugModeStore::new());
        let observed = Arc::new(Mutex::new(None));

        let inner = Arc::clone(&store);
        let slot = Arc::clone(&observed);
        store
            .subscribe(move |_| *slot.lock() = Some(inner.is_any_enabled(LocalStorage)))
            .detach();

        store.enable_keys(LocalStorage);
        assert_eq!(*observed.lock(), Some(true));
    }

    #[test]
    fn nested_mutation_is_delivered_after_the_outer_pass() {
        let store = Arc::new(DebugModeStore::new());
        let first_seen = Arc::new(Mutex::new(Vec::new()));
        let second_seen = Arc::new(Mutex::new(Vec::new()));

        let inner = Arc::clone(&store);
        let first = Arc::clone(&first_seen);
        store
            .subscribe(move |snapshot| {
                first.lock().push(snapshot.version);
                if snapshot.is_any_enabled(&[Snippets]) {
                    inner.disable_all();
                }
            })
            .detach();
        let second = Arc::clone(&second_seen);
        store
            .subscribe(move |snapshot| second.lock().push((snapshot.version, snapshot.is_enabled())))
            .detach();

        store.enable_keys(Snippets);

        assert!(!store.is_enabled());
        assert_eq!(*first_seen.lock(), vec![1, 2]);
        assert_eq!(*second_seen.lock(), vec![(1, true), (2, false)]);
    }

    #[test]
    fn chained_nested_mutations_keep_version_order() {
        let store = Arc::new(DebugModeStore::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner = Arc::clone(&store);
        store
            .subscribe(move |snapshot| match snapshot.version {
                1 => inner.enable_keys(LocalStorage),
                2 => inner.disable_keys(Snippets),
                _ => {}
            })
            .detach();
        let sink = Arc::clone(&seen);
        store
            .subscribe(move |snapshot| sink.lock().push(snapshot.enabled.to_vec()))
            .detach();

        store.enable_keys(Snippets);

        assert_eq!(
            *seen.lock(),
            vec![vec![Snippets], vec![Snippets, LocalStorage], vec![LocalStorage]]
        );
        assert_eq!(store.snapshot().version, 3);
    }

    #[test]
    fn panicking_observer_does_not_wedge_delivery() {
        let store = DebugModeStore::new();
        let count = Arc::new(Mutex::new(0usize));
        let panicking = store.subscribe(|snapshot| {
            assert!(snapshot.version > 1, "first change rejected");
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| store.enable_all()));
        assert!(result.is_err());
        drop(panicking);

        let counter = Arc::clone(&count);
        let _sub = store.subscribe(move |_| *counter.lock() += 1);
        store.disable_all();
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn watch_receiver_tracks_latest_snapshot() {
        let store = DebugModeStore::new();
        let rx = store.watch();
        store.enable_all();
        store.disable_keys(LocalStorage);

        let latest = rx.borrow().clone();
        assert_eq!(latest.enabled.to_vec(), vec![Snippets]);
        assert_eq!(latest.version, 2);
    }

    #[test]
    fn store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DebugModeStore>();
    }
}
