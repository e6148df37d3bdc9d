//! Enabled-key set and read snapshots
//!
//! [`EnabledKeys`] is the value the store owns. Observers only ever see it
//! through an immutable [`DebugModeSnapshot`].

use crate::keys::DebugModeKey;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Duplicate-free set of enabled keys
///
/// Iteration follows insertion order; equality ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnabledKeys {
    keys: IndexSet<DebugModeKey>,
}

impl EnabledKeys {
    /// Empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding every key
    #[must_use]
    pub fn all() -> Self {
        DebugModeKey::ALL.into_iter().collect()
    }

    /// True when at least one key is enabled
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.keys.is_empty()
    }

    /// True when no key is enabled
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of enabled keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Membership test
    #[inline]
    #[must_use]
    pub fn contains(&self, key: DebugModeKey) -> bool {
        self.keys.contains(&key)
    }

    /// True when any of `keys` is a member
    ///
    /// Returns false without looking at `keys` when the set is empty.
    #[must_use]
    pub fn contains_any(&self, keys: &[DebugModeKey]) -> bool {
        if self.keys.is_empty() {
            return false;
        }
        keys.iter().any(|key| self.keys.contains(key))
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = DebugModeKey> + '_ {
        self.keys.iter().copied()
    }

    /// Copy out as a vector
    #[must_use]
    pub fn to_vec(&self) -> Vec<DebugModeKey> {
        self.iter().collect()
    }

    /// Set with `keys` appended; members already present keep their position
    #[must_use]
    pub fn union(&self, keys: &[DebugModeKey]) -> Self {
        let mut next = self.clone();
        next.keys.extend(keys.iter().copied());
        next
    }

    /// Set with `keys` removed; remaining members keep their order
    #[must_use]
    pub fn difference(&self, keys: &[DebugModeKey]) -> Self {
        self.iter().filter(|key| !keys.contains(key)).collect()
    }
}

impl FromIterator<DebugModeKey> for EnabledKeys {
    fn from_iter<I: IntoIterator<Item = DebugModeKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for EnabledKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for key in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(key.as_str())?;
            first = false;
        }
        Ok(())
    }
}

/// Immutable view of the store at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugModeSnapshot {
    /// Enabled keys
    pub enabled: EnabledKeys,

    /// Number of effective changes applied before this snapshot
    pub version: u64,
}

impl DebugModeSnapshot {
    /// True when debug mode is on
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.is_active()
    }

    /// True when any of `keys` is enabled
    #[inline]
    #[must_use]
    pub fn is_any_enabled(&self, keys: &[DebugModeKey]) -> bool {
        self.enabled.contains_any(keys)
    }
}
