//! Debug Mode Activation
//!
//! Collaborators around the [`DebugModeStore`](debug_mode_store::DebugModeStore):
//!
//! - **activation**: seed the store from the `debug` URL parameter
//! - **deactivation**: disable everything and scrub the parameter in place
//! - **toast**: keep one toast visible while debug mode is on
//! - **config**: parameter name, toast id and log filter
//!
//! # Example
//!
//! ```rust
//! use debug_mode_activation::{disable_and_scrub, init_from_url, DebugModeConfig, MemoryHistory};
//! use debug_mode_store::{DebugModeKey, DebugModeStore};
//!
//! let config = DebugModeConfig::default();
//! let store = DebugModeStore::new();
//!
//! init_from_url(&store, "/project?debug=snippets,bogus", &config);
//! assert!(store.is_any_enabled(DebugModeKey::Snippets));
//!
//! let mut history = MemoryHistory::new("/project?tab=logs&debug=snippets");
//! let url = disable_and_scrub(&store, &mut history, &config);
//! assert_eq!(url, "/project?tab=logs");
//! assert!(!store.is_enabled());
//! ```

#![warn(missing_docs)]

pub mod activation;
pub mod config;
pub mod deactivation;
pub mod error;
pub mod query;
pub mod toast;

// Re-exports
pub use activation::{init_from_url, parse_debug_param, resolve_activation, resolve_url, Activation};
pub use config::DebugModeConfig;
pub use deactivation::{disable_and_scrub, remove_query_param, History, MemoryHistory};
pub use error::ConfigError;
pub use toast::{attach_toast, spawn_toast_driver, ToastAction, ToastController, ToastHandle, ToastSink};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hosts wiring up debug mode
    pub use crate::{
        disable_and_scrub, init_from_url, Activation, DebugModeConfig, History, MemoryHistory,
        ToastSink,
    };
    pub use debug_mode_store::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
