//! Shared-data store the GUI layer polls or subscribes to
//!
//! Single DashMap design with lock-free concurrent access. Individual key
//! writes are serialized by the map; there is no cross-key transactionality.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

/// One store mutation, published to subscribers
#[derive(Debug, Clone)]
pub struct SharedDataChange {
    /// Full (prefixed) key
    pub key: String,
    /// New value, `None` when the key was removed
    pub value: Option<Value>,
}

/// Thread-safe key-value store for dashboard state
#[derive(Clone)]
pub struct SharedData {
    entries: Arc<DashMap<String, Value>>,
    changes: broadcast::Sender<SharedDataChange>,
}

impl SharedData {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(256);
        Self {
            entries: Arc::new(DashMap::new()),
            changes,
        }
    }

    /// Get a value by full key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|v| v.clone())
    }

    /// Set a value, overwriting any previous entry
    pub fn set(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        debug!(%key, "shared-data set");
        self.entries.insert(key.clone(), value.clone());
        let _ = self.changes.send(SharedDataChange {
            key,
            value: Some(value),
        });
    }

    /// Remove a key entirely
    pub fn remove(&self, key: &str) {
        debug!(%key, "shared-data remove");
        self.entries.remove(key);
        let _ = self.changes.send(SharedDataChange {
            key: key.to_string(),
            value: None,
        });
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscribe to store mutations
    ///
    /// Lagging receivers lose events; the store never blocks on them.
    pub fn subscribe(&self) -> broadcast::Receiver<SharedDataChange> {
        self.changes.subscribe()
    }

    /// All entries, sorted by key
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Create a prefixed view of this store
    pub fn namespace(&self, prefix: impl Into<String>) -> Namespace {
        Namespace {
            prefix: prefix.into(),
            store: self.clone(),
        }
    }
}

impl Default for SharedData {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedData").field("len", &self.len()).finish()
    }
}

/// Prefixed handle over a [`SharedData`] store
///
/// Mirrors the host's `api.namespace(prefix)`: every key passed to
/// `get`/`set`/`remove` gets the prefix prepended.
#[derive(Clone, Debug)]
pub struct Namespace {
    prefix: String,
    store: SharedData,
}

impl Namespace {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.get(&self.full_key(key))
    }

    pub fn set(&self, key: &str, value: Value) {
        self.store.set(self.full_key(key), value);
    }

    pub fn remove(&self, key: &str) {
        self.store.remove(&self.full_key(key));
    }
}
