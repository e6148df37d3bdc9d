//! Debug mode configuration
//!
//! Defaults match the console: the parameter is `debug` and the toast id is
//! `debug-mode-toast`. Everything can be overridden from TOML:
//!
//! ```toml
//! param_name = "diag"
//! toast_id = "diag-toast"
//! log_filter = "debug_mode_store=debug,info"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default query parameter name
pub const DEFAULT_PARAM_NAME: &str = "debug";

/// Default toast id
pub const DEFAULT_TOAST_ID: &str = "debug-mode-toast";

/// Default tracing filter directive
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings shared by activation, deactivation and the toast driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebugModeConfig {
    /// Query parameter that seeds and is scrubbed from the URL
    pub param_name: String,

    /// Id given to the toast shown while debug mode is on
    pub toast_id: String,

    /// Tracing filter used by hosts that install a subscriber
    pub log_filter: String,
}

impl DebugModeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With query parameter name
    #[inline]
    #[must_use]
    pub fn with_param_name(mut self, name: impl Into<String>) -> Self {
        self.param_name = name.into();
        self
    }

    /// With toast id
    #[inline]
    #[must_use]
    pub fn with_toast_id(mut self, id: impl Into<String>) -> Self {
        self.toast_id = id.into();
        self
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown fields and
    /// [`ConfigError::InvalidValue`] when validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), param = %config.param_name, "loaded debug mode config");
        Ok(config)
    }

    /// Check field values
    ///
    /// # Errors
    /// Rejects empty or whitespace-only names, and names containing the
    /// query delimiters `&`, `=` or `#`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_token("param_name", &self.param_name)?;
        if self.param_name.contains(['&', '=', '#']) {
            return Err(ConfigError::InvalidValue {
                field: "param_name",
                reason: format!("{:?} contains a query delimiter", self.param_name),
            });
        }
        validate_token("toast_id", &self.toast_id)?;
        Ok(())
    }
}

impl Default for DebugModeConfig {
    fn default() -> Self {
        Self {
            param_name: DEFAULT_PARAM_NAME.to_string(),
            toast_id: DEFAULT_TOAST_ID.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn validate_token(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
