//! Debug Mode Store
//!
//! Process-wide set of enabled diagnostic keys with change notification.
//!
//! # Overview
//!
//! - **DebugModeKey**: closed set of toggleable diagnostic facilities
//! - **DebugModeStore**: owns the enabled set; query and mutation API
//! - **Subscription**: callback observers notified synchronously on change
//!
//! "Debug mode is on" means exactly "at least one key is enabled".
//!
//! # Example
//!
//! ```rust
//! use debug_mode_store::{DebugModeKey, DebugModeStore};
//!
//! let store = DebugModeStore::new();
//! let _sub = store.subscribe(|snapshot| println!("debug keys: {}", snapshot.enabled));
//!
//! store.enable_keys(DebugModeKey::Snippets);
//! assert!(store.is_enabled());
//! assert!(store.is_any_enabled(DebugModeKey::Snippets));
//! assert!(!store.is_any_enabled(DebugModeKey::LocalStorage));
//!
//! store.disable_all();
//! assert!(!store.is_enabled());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod snapshot;
pub mod store;
pub mod subscription;

// Re-exports
pub use error::KeyError;
pub use keys::{DebugModeKey, IntoKeys, KeyList};
pub use snapshot::{DebugModeSnapshot, EnabledKeys};
pub use store::DebugModeStore;
pub use subscription::{Observer, Subscription, SubscriptionId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for debug mode consumers
    pub use crate::{
        DebugModeKey, DebugModeSnapshot, DebugModeStore, EnabledKeys, IntoKeys, Subscription,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
