//! Error types for activation and configuration
//!
//! URL activation and deactivation never fail; unknown values simply resolve
//! to no keys. Only loading configuration can go wrong.

use std::path::PathBuf;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`DebugModeConfig`](crate::DebugModeConfig)
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}
