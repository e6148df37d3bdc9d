//! Diagnostic key identifiers
//!
//! [`DebugModeKey`] is the one definition of the closed key set. The wire name
//! returned by [`DebugModeKey::as_str`] is used for display, parsing and serde
//! alike, so the store and the URL parser always agree on what is valid.

use crate::error::KeyError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Independently toggleable diagnostic facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DebugModeKey {
    /// Local-storage inspection
    #[serde(rename = "localStorage")]
    LocalStorage,

    /// Snippet diagnostics
    #[serde(rename = "snippets")]
    Snippets,
}

impl DebugModeKey {
    /// Every key, once, in declaration order
    pub const ALL: [DebugModeKey; 2] = [DebugModeKey::LocalStorage, DebugModeKey::Snippets];

    /// Wire name of the key
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalStorage => "localStorage",
            Self::Snippets => "snippets",
        }
    }

    /// Look up a key by its exact wire name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for DebugModeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebugModeKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| KeyError::Unknown {
            name: s.to_string(),
        })
    }
}

/// Inline buffer used when passing keys into the store
pub type KeyList = SmallVec<[DebugModeKey; 4]>;

/// Conversion for arguments that accept one key or many
///
/// Implemented for a bare [`DebugModeKey`] and for arrays, slices and vectors
/// of keys, so callers can write `store.enable_keys(DebugModeKey::Snippets)`
/// or `store.enable_keys([a, b])` interchangeably.
pub trait IntoKeys {
    /// Collect the supplied keys
    fn into_keys(self) -> KeyList;
}

impl IntoKeys for DebugModeKey {
    fn into_keys(self) -> KeyList {
        let mut keys = KeyList::new();
        keys.push(self);
        keys
    }
}

impl<const N: usize> IntoKeys for [DebugModeKey; N] {
    fn into_keys(self) -> KeyList {
        self.into_iter().collect()
    }
}

impl IntoKeys for &[DebugModeKey] {
    fn into_keys(self) -> KeyList {
        self.iter().copied().collect()
    }
}

impl<const N: usize> IntoKeys for &[DebugModeKey; N] {
    fn into_keys(self) -> KeyList {
        self.iter().copied().collect()
    }
}

impl IntoKeys for Vec<DebugModeKey> {
    fn into_keys(self) -> KeyList {
        self.into_iter().collect()
    }
}

impl IntoKeys for &Vec<DebugModeKey> {
    fn into_keys(self) -> KeyList {
        self.iter().copied().collect()
    }
}

impl IntoKeys for KeyList {
    fn into_keys(self) -> KeyList {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for key in DebugModeKey::ALL {
            assert_eq!(key.as_str().parse::<DebugModeKey>().unwrap(), key);
        }
    }

    #[test]
    fn from_str_is_case_sensitive() {
        assert!("localstorage".parse::<DebugModeKey>().is_err());
        assert!("Snippets".parse::<DebugModeKey>().is_err());
    }

    #[test]
    fn unknown_name_reports_the_name() {
        let err = "bogus".parse::<DebugModeKey>().unwrap_err();
        assert_eq!(
            err,
            KeyError::Unknown {
                name: "bogus".to_string()
            }
        );
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&DebugModeKey::LocalStorage).unwrap();
        assert_eq!(json, "\"localStorage\"");

        let key: DebugModeKey = serde_json::from_str("\"snippets\"").unwrap();
        assert_eq!(key, DebugModeKey::Snippets);
    }

    #[test]
    fn all_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for key in DebugModeKey::ALL {
            assert!(seen.insert(key));
        }
    }

    #[test]
    fn single_key_and_collections_convert() {
        assert_eq!(DebugModeKey::Snippets.into_keys().as_slice(), &[DebugModeKey::Snippets]);
        assert_eq!(DebugModeKey::ALL.into_keys().len(), 2);
        assert!(Vec::<DebugModeKey>::new().into_keys().is_empty());

        let slice: &[DebugModeKey] = &[DebugModeKey::LocalStorage];
        assert_eq!(slice.into_keys().as_slice(), &[DebugModeKey::LocalStorage]);
    }
}
