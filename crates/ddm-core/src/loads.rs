//! Per-asset load tracking
//!
//! Each scene element reveals itself independently once its own asset
//! arrives. This tracker is the explicit aggregate on top of those
//! independent loads: how many are outstanding, whether everything has
//! settled, and which loads failed.

use std::collections::BTreeMap;

/// State of a single asset request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Ready,
    Failed(String),
}

impl LoadStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, LoadStatus::Pending)
    }
}

/// Load status keyed by resolved asset URL
#[derive(Debug, Clone, Default)]
pub struct AssetLoads {
    entries: BTreeMap<String, LoadStatus>,
}

impl AssetLoads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request. Returns `false` if the URL was already tracked, in
    /// which case its status is left untouched.
    pub fn begin(&mut self, url: &str) -> bool {
        if self.entries.contains_key(url) {
            return false;
        }
        self.entries.insert(url.to_string(), LoadStatus::Pending);
        true
    }

    pub fn mark_ready(&mut self, url: &str) {
        self.entries.insert(url.to_string(), LoadStatus::Ready);
    }

    pub fn mark_failed(&mut self, url: &str, reason: impl Into<String>) {
        self.entries
            .insert(url.to_string(), LoadStatus::Failed(reason.into()));
    }

    /// Stop tracking a URL nothing in the scene requests any more.
    /// Returns whether it was tracked.
    pub fn forget(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    pub fn status(&self, url: &str) -> Option<&LoadStatus> {
        self.entries.get(url)
    }

    pub fn outstanding(&self) -> usize {
        self.entries.values().filter(|s| !s.is_settled()).count()
    }

    /// URLs still waiting on their asset
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, s)| !s.is_settled())
            .map(|(url, _)| url.as_str())
    }

    /// Failed URLs with their reasons
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(url, status)| match status {
            LoadStatus::Failed(reason) => Some((url.as_str(), reason.as_str())),
            _ => None,
        })
    }

    /// True once every tracked load has either succeeded or failed
    pub fn all_settled(&self) -> bool {
        self.entries.values().all(LoadStatus::is_settled)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
