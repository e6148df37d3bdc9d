//! Deactivation flow
//!
//! Turning debug mode off clears the store and removes the activation
//! parameter from the current URL in place, so a reload does not bring it
//! back. The URL swap goes through [`History`], which must not navigate.

use crate::config::DebugModeConfig;
use crate::query::{without_param, UrlParts};
use debug_mode_store::DebugModeStore;

/// In-place access to the current location
pub trait History {
    /// Current URL (path, query and fragment at minimum)
    fn location(&self) -> String;

    /// Replace the current URL without navigating or reloading
    fn replace_state(&mut self, url: &str);
}

/// [`History`] held in memory, for headless hosts and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryHistory {
    current: String,
    replacements: usize,
}

impl MemoryHistory {
    /// Start at `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            current: url.into(),
            replacements: 0,
        }
    }

    /// How many times `replace_state` ran
    #[inline]
    #[must_use]
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        self.current.clone()
    }

    fn replace_state(&mut self, url: &str) {
        url.clone_into(&mut self.current);
        self.replacements += 1;
    }
}

/// `url` without any `name` parameter
///
/// Other parameters keep their order and encoding; base and fragment are
/// unchanged. The `?` is dropped when no parameter remains.
#[must_use]
pub fn remove_query_param(url: &str, name: &str) -> String {
    let parts = UrlParts::parse(url);
    let query = parts
        .query
        .map(|query| without_param(query, name))
        .unwrap_or_default();
    parts.with_query(&query)
}

/// Disable every key and scrub the activation parameter from `history`
///
/// Returns the URL now current.
pub fn disable_and_scrub<H>(store: &DebugModeStore, history: &mut H, config: &DebugModeConfig) -> String
where
    H: History + ?Sized,
{
    store.disable_all();

    let current = history.location();
    let scrubbed = remove_query_param(&current, &config.param_name);
    if scrubbed != current {
        history.replace_state(&scrubbed);
    }

    tracing::info!(from = %current, to = %scrubbed, "debug mode disabled");
    scrubbed
}

#[cfg(test)]
mod tests {
    use super::*;
    use debug_mode_store::DebugModeKey;
    use pretty_assertions::assert_eq;

    #[test]
    fn scrub_keeps_other_params_and_fragment() {
        assert_eq!(
            remove_query_param("/page?x=1&debug=true&y=2#frag", "debug"),
            "/page?x=1&y=2#frag"
        );
    }

    #[test]
    fn scrub_drops_question_mark_when_empty() {
        assert_eq!(remove_query_param("/page?debug=true", "debug"), "/page");
        assert_eq!(remove_query_param("/page?debug=true#top", "debug"), "/page#top");
    }

    #[test]
    fn scrub_without_param_is_identity_for_clean_urls() {
        assert_eq!(remove_query_param("/page?x=1#frag", "debug"), "/page?x=1#frag");
        assert_eq!(remove_query_param("/page", "debug"), "/page");
    }

    #[test]
    fn scrub_does_not_touch_prefixed_names() {
        assert_eq!(
            remove_query_param("/p?debugger=1&debug=true", "debug"),
            "/p?debugger=1"
        );
    }

    #[test]
    fn disable_and_scrub_clears_store_and_replaces_location() {
        let store = DebugModeStore::new();
        store.enable_all();
        let mut history = MemoryHistory::new("/project/abc?ref=nav&debug=true#logs");

        let url = disable_and_scrub(&store, &mut history, &DebugModeConfig::default());

        assert!(!store.is_enabled());
        assert_eq!(url, "/project/abc?ref=nav#logs");
        assert_eq!(history.location(), "/project/abc?ref=nav#logs");
        assert_eq!(history.replacements(), 1);
    }

    #[test]
    fn disable_and_scrub_on_clean_url_skips_replace() {
        let store = DebugModeStore::with_keys(DebugModeKey::Snippets);
        let mut history = MemoryHistory::new("/project");

        disable_and_scrub(&store, &mut history, &DebugModeConfig::default());

        assert!(!store.is_enabled());
        assert_eq!(history.replacements(), 0);
    }
}
