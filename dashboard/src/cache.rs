//! Query cache and view memoization.
//!
//! [`QueryCache`] maps a request identity to its last payload, fetch time and
//! status. It is an explicit handle passed to whoever fetches, so normalizers
//! never see it. [`Memo`] keeps one derived view per query and recomputes it
//! only when the payload checksum changes.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};


/// Cached admin queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QueryKey {
    Analytics,
    Stock,
    Schedule,
    Menu,
    Distribution,
    Students,
}

impl QueryKey {
    pub const ALL: [QueryKey; 6] = [
        QueryKey::Analytics,
        QueryKey::Stock,
        QueryKey::Schedule,
        QueryKey::Menu,
        QueryKey::Distribution,
        QueryKey::Students,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            QueryKey::Analytics => "admin-analytics",
            QueryKey::Stock => "admin-stock",
            QueryKey::Schedule => "admin-schedule",
            QueryKey::Menu => "admin-menu",
            QueryKey::Distribution => "admin-distribution",
            QueryKey::Students => "admin-students",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Request identity: the query plus its parameters (e.g. a date).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryId {
    pub key: QueryKey,
    /// Empty for unparameterized requests.
    pub scope: String,
}

impl QueryId {
    pub fn new(key: QueryKey) -> Self {
        Self {
            key,
            scope: String::new(),
        }
    }

    pub fn scoped(key: QueryKey, scope: impl Into<String>) -> Self {
        Self {
            key,
            scope: scope.into(),
        }
    }
}

impl From<QueryKey> for QueryId {
    fn from(key: QueryKey) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}[{}]", self.key, self.scope)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum CacheStatus {
    Success,
    Error(String),
    Invalidated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Last successful payload; kept across failed refreshes.
    pub data: Option<Value>,
    pub checksum: Option<String>,
    pub fetched_at: DateTime<Utc>,
    pub status: CacheStatus,
}

impl CacheEntry {
    /// Fresh if the last fetch succeeded less than `ttl` before `now`.
    pub fn is_fresh_at(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        if self.status != CacheStatus::Success {
            return false;
        }
        match now.signed_duration_since(self.fetched_at).to_std() {
            Ok(age) => age < ttl,
            // fetched_at in the future
            Err(_) => true,
        }
    }
}

/// Shared keyed store of query results.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryId, CacheEntry>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &QueryId) -> Option<CacheEntry> {
        self.entries.read().get(id).cloned()
    }

    /// Store a fresh payload under the checksum the caller already computed.
    /// Returns true if it differs from the previous one.
    pub fn record_success(&self, id: &QueryId, data: Value, checksum: String) -> bool {
        let mut entries = self.entries.write();
        let changed = entries
            .get(id)
            .and_then(|e| e.checksum.as_deref())
            .map_or(true, |previous| previous != checksum);
        entries.insert(
            id.clone(),
            CacheEntry {
                data: Some(data),
                checksum: Some(checksum),
                fetched_at: Utc::now(),
                status: CacheStatus::Success,
            },
        );
        log::debug!("cache {} stored (changed: {})", id, changed);
        changed
    }

    /// Mark a failed refresh, keeping whatever data was there.
    pub fn record_error(&self, id: &QueryId, message: impl Into<String>) {
        let message = message.into();
        let mut entries = self.entries.write();
        match entries.get_mut(id) {
            Some(entry) => entry.status = CacheStatus::Error(message),
            None => {
                entries.insert(
                    id.clone(),
                    CacheEntry {
                        data: None,
                        checksum: None,
                        fetched_at: Utc::now(),
                        status: CacheStatus::Error(message),
                    },
                );
            }
        }
    }

    /// Invalidate every scope of `key`. Returns the number of entries touched.
    pub fn invalidate(&self, key: QueryKey) -> usize {
        let mut entries = self.entries.write();
        let mut touched = 0;
        for (id, entry) in entries.iter_mut() {
            if id.key == key {
                entry.status = CacheStatus::Invalidated;
                touched += 1;
            }
        }
        log::debug!("cache {} invalidated ({} entries)", key, touched);
        touched
    }

    pub fn invalidate_all(&self, keys: &[QueryKey]) -> usize {
        keys.iter().map(|k| self.invalidate(*k)).sum()
    }

    pub fn is_fresh(&self, id: &QueryId, ttl: Duration) -> bool {
        self.entries
            .read()
            .get(id)
            .is_some_and(|e| e.is_fresh_at(ttl, Utc::now()))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// Derived view cached against the checksum of the payload it came from.
pub struct Memo<V> {
    slot: RwLock<Option<(String, V)>>,
}

impl<V: Clone> Memo<V> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Return the cached view if `checksum` matches, else compute and store.
    pub fn get_or_compute(&self, checksum: &str, compute: impl FnOnce() -> V) -> V {
        if let Some((ref cached, ref view)) = *self.slot.read() {
            if cached == checksum {
                return view.clone();
            }
        }
        let view = compute();
        *self.slot.write() = Some((checksum.to_string(), view.clone()));
        view
    }

    pub fn checksum(&self) -> Option<String> {
        self.slot.read().as_ref().map(|(c, _)| c.clone())
    }

    pub fn clear(&self) {
        *self.slot.write() = None;
    }
}

impl<V: Clone> Default for Memo<V> {
    fn default() -> Self {
        Self::new()
    }
}
