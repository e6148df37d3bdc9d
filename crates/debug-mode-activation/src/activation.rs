//! URL-driven activation
//!
//! The `debug` parameter seeds the store once at startup:
//!
//! | value            | keys                                  |
//! |------------------|---------------------------------------|
//! | absent or empty  | none, nothing requested               |
//! | `false`          | none, explicit opt-out                |
//! | `true`           | every key                             |
//! | anything else    | comma list, trimmed, unknown dropped  |

use crate::config::DebugModeConfig;
use crate::query::{get_param, UrlParts};
use debug_mode_store::{DebugModeKey, DebugModeStore};
use serde::{Deserialize, Serialize};

/// What the activation parameter asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "keys", rename_all = "snake_case")]
pub enum Activation {
    /// Parameter absent or empty
    Unspecified,

    /// Parameter was `false`
    OptOut,

    /// Keys recognized from the value; may be empty if nothing matched
    Keys(Vec<DebugModeKey>),
}

impl Activation {
    /// Resolve a raw parameter value
    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::Unspecified,
            Some("false") => Self::OptOut,
            Some(value) => Self::Keys(parse_debug_param(value)),
        }
    }

    /// Keys to enable; empty for [`Unspecified`](Self::Unspecified) and
    /// [`OptOut`](Self::OptOut)
    #[must_use]
    pub fn keys(&self) -> &[DebugModeKey] {
        match self {
            Self::Keys(keys) => keys.as_slice(),
            Self::Unspecified | Self::OptOut => &[],
        }
    }

    /// True when applying this activation would enable something
    #[inline]
    #[must_use]
    pub fn enables_any(&self) -> bool {
        !self.keys().is_empty()
    }
}

/// Keys named by a `debug` parameter value
///
/// `"false"` yields nothing and `"true"` yields every key. Any other value is
/// split on commas; pieces are trimmed and unknown pieces dropped. Input order
/// is kept.
#[must_use]
pub fn parse_debug_param(value: &str) -> Vec<DebugModeKey> {
    match value {
        "false" => Vec::new(),
        "true" => DebugModeKey::ALL.to_vec(),
        _ => value
            .split(',')
            .map(str::trim)
            .filter_map(DebugModeKey::from_name)
            .collect(),
    }
}

/// Activation requested by a query string
#[must_use]
pub fn resolve_activation(query: &str, param_name: &str) -> Activation {
    Activation::from_value(get_param(query, param_name).as_deref())
}

/// Activation requested by a full URL or path
#[must_use]
pub fn resolve_url(url: &str, param_name: &str) -> Activation {
    match UrlParts::parse(url).query {
        Some(query) => resolve_activation(query, param_name),
        None => Activation::Unspecified,
    }
}

/// Seed `store` from `url`
///
/// Calls [`DebugModeStore::enable_keys`] once when the parameter names at
/// least one known key and leaves the store untouched otherwise. Returns the
/// resolved activation either way.
pub fn init_from_url(store: &DebugModeStore, url: &str, config: &DebugModeConfig) -> Activation {
    let activation = resolve_url(url, &config.param_name);

    match &activation {
        Activation::Keys(keys) if !keys.is_empty() => {
            tracing::info!(param = %config.param_name, ?keys, "debug mode activated from url");
            store.enable_keys(keys.as_slice());
        }
        Activation::Keys(_) => {
            tracing::debug!(param = %config.param_name, "debug parameter named no known keys");
        }
        Activation::OptOut => {
            tracing::debug!(param = %config.param_name, "debug mode explicitly disabled in url");
        }
        Activation::Unspecified => {}
    }

    activation
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use DebugModeKey::{LocalStorage, Snippets};

    #[test]
    fn false_resolves_to_nothing() {
        assert!(parse_debug_param("false").is_empty());
    }

    #[test]
    fn true_resolves_to_every_key() {
        assert_eq!(parse_debug_param("true"), DebugModeKey::ALL.to_vec());
    }

    #[test]
    fn list_is_trimmed_and_filtered_in_order() {
        assert_eq!(
            parse_debug_param("snippets, bogus ,localStorage"),
            vec![Snippets, LocalStorage]
        );
    }

    #[test]
    fn unknown_only_resolves_to_nothing() {
        assert!(parse_debug_param("bogus,,  ").is_empty());
        assert!(parse_debug_param("TRUE").is_empty());
    }

    #[test]
    fn duplicates_are_kept_in_parse_output() {
        assert_eq!(parse_debug_param("snippets,snippets"), vec![Snippets, Snippets]);
    }

    #[test]
    fn activation_distinguishes_absent_from_opt_out() {
        assert_eq!(Activation::from_value(None), Activation::Unspecified);
        assert_eq!(Activation::from_value(Some("")), Activation::Unspecified);
        assert_eq!(Activation::from_value(Some("false")), Activation::OptOut);
        assert!(!Activation::OptOut.enables_any());
        assert!(!Activation::Unspecified.enables_any());
    }

    #[test]
    fn resolve_url_reads_encoded_lists() {
        let activation = resolve_url("/project?debug=localStorage%2Csnippets#logs", "debug");
        assert_eq!(activation, Activation::Keys(vec![LocalStorage, Snippets]));
    }

    #[test]
    fn resolve_url_without_query_is_unspecified() {
        assert_eq!(resolve_url("/project#debug=true", "debug"), Activation::Unspecified);
    }

    #[test]
    fn init_enables_requested_keys() {
        let store = DebugModeStore::new();
        let activation = init_from_url(&store, "/p?debug=snippets", &DebugModeConfig::default());

        assert_eq!(activation.keys(), &[Snippets]);
        assert!(store.is_any_enabled(Snippets));
        assert!(!store.is_any_enabled(LocalStorage));
    }

    #[test]
    fn init_with_custom_param_name() {
        let store = DebugModeStore::new();
        let config = DebugModeConfig::new().with_param_name("diag");
        init_from_url(&store, "/p?debug=true&diag=localStorage", &config);

        assert_eq!(store.enabled_keys(), vec![LocalStorage]);
    }

    #[test]
    fn init_never_disables_existing_keys() {
        let store = DebugModeStore::with_keys(Snippets);
        init_from_url(&store, "/p?debug=false", &DebugModeConfig::default());
        assert!(store.is_any_enabled(Snippets));
    }

    #[test]
    fn activation_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Activation::Keys(vec![Snippets])).unwrap();
        assert_eq!(json, r#"{"kind":"keys","keys":["snippets"]}"#);
        let json = serde_json::to_string(&Activation::OptOut).unwrap();
        assert_eq!(json, r#"{"kind":"opt_out"}"#);
    }
}
