//! Toast lifecycle
//!
//! While debug mode is on a single persistent toast is shown; it is dismissed
//! as soon as the store empties. [`ToastController`] is the state machine,
//! [`attach_toast`] and [`spawn_toast_driver`] wire it to a store.

use crate::config::DebugModeConfig;
use debug_mode_store::{DebugModeSnapshot, DebugModeStore, Subscription};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle returned by a [`ToastSink`] for a shown toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastHandle(pub u64);

impl fmt::Display for ToastHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// Notification surface the toast is rendered on
pub trait ToastSink: Send + Sync {
    /// Show a persistent toast with `id`
    fn show(&self, id: &str) -> ToastHandle;

    /// Dismiss a toast previously returned by [`show`](Self::show)
    fn dismiss(&self, handle: ToastHandle);
}

impl<S: ToastSink + ?Sized> ToastSink for Arc<S> {
    fn show(&self, id: &str) -> ToastHandle {
        (**self).show(id)
    }

    fn dismiss(&self, handle: ToastHandle) {
        (**self).dismiss(handle);
    }
}

/// Outcome of [`ToastController::sync`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastAction {
    /// A toast was shown
    Shown(ToastHandle),

    /// The live toast was dismissed
    Dismissed(ToastHandle),

    /// Nothing to do
    Unchanged,
}

/// Keeps at most one toast alive, matching the enabled state
#[derive(Debug)]
pub struct ToastController<S> {
    sink: S,
    toast_id: String,
    live: Option<ToastHandle>,
    seen_version: Option<u64>,
}

impl<S: ToastSink> ToastController<S> {
    /// Controller with no live toast
    #[must_use]
    pub fn new(sink: S, config: &DebugModeConfig) -> Self {
        Self {
            sink,
            toast_id: config.toast_id.clone(),
            live: None,
            seen_version: None,
        }
    }

    /// Bring the toast in line with `snapshot`
    ///
    /// Snapshots older than one already observed are ignored, so a late
    /// delivery never resurrects a dismissed toast.
    pub fn observe(&mut self, snapshot: &DebugModeSnapshot) -> ToastAction {
        if self.seen_version.is_some_and(|seen| snapshot.version < seen) {
            tracing::trace!(
                version = snapshot.version,
                seen = ?self.seen_version,
                "stale debug mode snapshot ignored"
            );
            return ToastAction::Unchanged;
        }
        self.seen_version = Some(snapshot.version);
        self.sync(snapshot.is_enabled())
    }

    /// Bring the toast in line with `enabled`
    pub fn sync(&mut self, enabled: bool) -> ToastAction {
        match (enabled, self.live) {
            (true, None) => {
                let handle = self.sink.show(&self.toast_id);
                tracing::debug!(toast = %handle, id = %self.toast_id, "debug mode toast shown");
                self.live = Some(handle);
                ToastAction::Shown(handle)
            }
            (false, Some(handle)) => {
                self.sink.dismiss(handle);
                tracing::debug!(toast = %handle, "debug mode toast dismissed");
                self.live = None;
                ToastAction::Dismissed(handle)
            }
            _ => ToastAction::Unchanged,
        }
    }

    /// Handle of the toast currently shown
    #[inline]
    #[must_use]
    pub fn live(&self) -> Option<ToastHandle> {
        self.live
    }

    /// Borrow the sink
    #[inline]
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Drive a toast from `store` through a callback subscription
///
/// The toast is synced to the current state immediately and then on every
/// change until the returned [`Subscription`] is dropped.
pub fn attach_toast<S>(store: &DebugModeStore, sink: S, config: &DebugModeConfig) -> Subscription
where
    S: ToastSink + 'static,
{
    let controller = Arc::new(Mutex::new(ToastController::new(sink, config)));

    let observer = Arc::clone(&controller);
    let subscription = store.subscribe(move |snapshot| {
        observer.lock().observe(snapshot);
    });

    // Never hold the controller while waiting on the store lock.
    let current = store.snapshot();
    controller.lock().observe(&current);
    subscription
}

/// Drive a toast from `store` on a tokio task
///
/// The task follows [`DebugModeStore::watch`], so rapid changes may be
/// coalesced into the latest state. It finishes once the store is dropped
/// and hands back its controller.
pub fn spawn_toast_driver<S>(
    store: &DebugModeStore,
    sink: S,
    config: &DebugModeConfig,
) -> JoinHandle<ToastController<S>>
where
    S: ToastSink + 'static,
{
    let mut updates = store.watch();
    let mut controller = ToastController::new(sink, config);

    tokio::spawn(async move {
        loop {
            let snapshot = updates.borrow_and_update().clone();
            controller.observe(&snapshot);

            if updates.changed().await.is_err() {
                break;
            }
        }
        tracing::trace!("debug mode store dropped, toast driver stopping");
        controller
    })
}
