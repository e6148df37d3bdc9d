//! Testing utilities for the debug mode workspace
//!
//! Shared fixtures, recorders and proptest strategies.

#![allow(missing_docs)]

use debug_mode_activation::{ToastHandle, ToastSink};
use debug_mode_store::{DebugModeKey, DebugModeSnapshot, DebugModeStore, Subscription};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

/// Records every snapshot a store publishes to callback observers
#[derive(Debug)]
pub struct RecordingObserver {
    seen: Arc<Mutex<Vec<DebugModeSnapshot>>>,
    _subscription: Subscription,
}

impl RecordingObserver {
    pub fn attach(store: &DebugModeStore) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |snapshot| sink.lock().push(snapshot.clone()));
        Self {
            seen,
            _subscription: subscription,
        }
    }

    pub fn snapshots(&self) -> Vec<DebugModeSnapshot> {
        self.seen.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn last(&self) -> Option<DebugModeSnapshot> {
        self.seen.lock().last().cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastEvent {
    Shown { handle: ToastHandle },
    Dismissed { handle: ToastHandle },
}

/// [`ToastSink`] that logs calls and hands out sequential handles from 1
#[derive(Debug, Default)]
pub struct RecordingToastSink {
    events: Mutex<Vec<ToastEvent>>,
    ids: Mutex<Vec<String>>,
}

impl RecordingToastSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ToastEvent> {
        self.events.lock().clone()
    }

    pub fn shown_ids(&self) -> Vec<String> {
        self.ids.lock().clone()
    }

    /// Toasts shown and not yet dismissed
    pub fn visible(&self) -> usize {
        self.events.lock().iter().fold(0usize, |n, event| match event {
            ToastEvent::Shown { .. } => n + 1,
            ToastEvent::Dismissed { .. } => n.saturating_sub(1),
        })
    }
}

impl ToastSink for RecordingToastSink {
    fn show(&self, id: &str) -> ToastHandle {
        let mut ids = self.ids.lock();
        ids.push(id.to_string());
        let handle = ToastHandle(ids.len() as u64);
        self.events.lock().push(ToastEvent::Shown { handle });
        handle
    }

    fn dismiss(&self, handle: ToastHandle) {
        self.events.lock().push(ToastEvent::Dismissed { handle });
    }
}

/// Store seeded with `keys`
pub fn store_with(keys: &[DebugModeKey]) -> DebugModeStore {
    DebugModeStore::with_keys(keys)
}

pub fn any_key() -> impl Strategy<Value = DebugModeKey> {
    prop_oneof![Just(DebugModeKey::LocalStorage), Just(DebugModeKey::Snippets)]
}

pub fn key_list(max: usize) -> impl Strategy<Value = Vec<DebugModeKey>> {
    proptest::collection::vec(any_key(), 0..=max)
}

/// One store operation, for sequence-based property tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    EnableAll,
    DisableAll,
    Enable(Vec<DebugModeKey>),
    Disable(Vec<DebugModeKey>),
    Replace(Vec<DebugModeKey>),
}

impl StoreOp {
    pub fn apply(&self, store: &DebugModeStore) {
        match self {
            Self::EnableAll => store.enable_all(),
            Self::DisableAll => store.disable_all(),
            Self::Enable(keys) => store.enable_keys(keys),
            Self::Disable(keys) => store.disable_keys(keys),
            Self::Replace(keys) => store.replace_enabled_keys(keys),
        }
    }
}

pub fn store_op() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        Just(StoreOp::EnableAll),
        Just(StoreOp::DisableAll),
        key_list(3).prop_map(StoreOp::Enable),
        key_list(3).prop_map(StoreOp::Disable),
        key_list(3).prop_map(StoreOp::Replace),
    ]
}

/// Query-safe parameter names and values
pub fn query_token() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}
