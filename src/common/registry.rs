//! Unbounded in-memory registry for deployed nodes.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, RwLock},
};

use crate::ShareLock;

/// Thread-safe map of everything deployed on an engine.
///
/// Holds:
/// - Configuration nodes (`Registry<String, ConfigNode>`)
/// - Action nodes (`Registry<NodeId, Arc<ActionNode>>`)
///
/// Entries stay until removed; nothing is evicted.
pub struct Registry<K, V> {
    entries: ShareLock<HashMap<K, V>>,
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K, V> Registry<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &self,
        key: K,
        value: V,
    ) {
        self.entries.write().unwrap().insert(key, value);
    }

    /// Insert every entry under a single write lock.
    pub fn extend(
        &self,
        entries: impl IntoIterator<Item = (K, V)>,
    ) {
        self.entries.write().unwrap().extend(entries);
    }

    pub fn get(
        &self,
        key: &K,
    ) -> Option<V> {
        self.entries.read().unwrap().get(key).cloned()
    }

    /// Remove `key`, returning the value it held.
    pub fn remove(
        &self,
        key: &K,
    ) -> Option<V> {
        self.entries.write().unwrap().remove(key)
    }

    pub fn contains(
        &self,
        key: &K,
    ) -> bool {
        self.entries.read().unwrap().contains_key(key)
    }

    /// Every key currently registered, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.entries.read().unwrap().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}
