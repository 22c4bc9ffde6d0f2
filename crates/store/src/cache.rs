use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::keygen::{KeyGenerator, RandomKeyGenerator};
use crate::snapshot::{Snapshot, SnapshotStore};

/// In-memory authoritative key-value map with write-through persistence.
///
/// All reads are served from the cache; it is always at least as fresh as the
/// backing store. Mutations update the cache under the write lock first, then
/// dispatch a full-snapshot save as a detached task, so the caller never
/// waits on durability and a failed save leaves the cache as the leading
/// copy.
///
/// Saves are not serialized against each other: two overlapping mutations
/// start two save tasks that race on the same backing file, and the last
/// serialize-and-write pair wins. The on-disk state is therefore best-effort
/// and may briefly trail the cache (see DESIGN.md).
#[derive(Clone)]
pub struct KvStore {
    cache: Arc<RwLock<HashMap<String, Value>>>,
    store: Arc<dyn SnapshotStore>,
    keygen: Arc<dyn KeyGenerator>,
}

impl KvStore {
    /// Build the coordinator and populate the cache from the backing store.
    /// Completes the initial load before returning, so callers can hold off
    /// serving requests until the cache is authoritative.
    pub async fn open(store: Arc<dyn SnapshotStore>) -> Self {
        Self::open_with_generator(store, Arc::new(RandomKeyGenerator::default())).await
    }

    /// Same as [`open`](Self::open) with a caller-supplied key generator.
    pub async fn open_with_generator(
        store: Arc<dyn SnapshotStore>,
        keygen: Arc<dyn KeyGenerator>,
    ) -> Self {
        let entries = store.load().await;
        debug!(entries = entries.len(), "cache populated from storage");
        let cache: HashMap<String, Value> = entries.into_iter().collect();
        Self { cache: Arc::new(RwLock::new(cache)), store, keygen }
    }

    /// Current in-memory value for `key`. Never consults storage.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let cache = self.cache.read().await;
        cache.get(key).cloned()
    }

    /// Insert or update `key`, generating one when none was supplied.
    /// Returns the effective key. The save runs detached; the cache update
    /// is already visible when this returns.
    pub async fn put(&self, key: Option<String>, value: Value) -> String {
        let key = match key {
            Some(k) if !k.is_empty() => k,
            _ => self.keygen.generate(),
        };
        let mut cache = self.cache.write().await;
        cache.insert(key.clone(), value);
        drop(cache);
        self.spawn_save();
        key
    }

    /// Remove `key` unconditionally; an absent key is not an error.
    pub async fn delete(&self, key: &str) {
        let mut cache = self.cache.write().await;
        cache.remove(key);
        drop(cache);
        self.spawn_save();
    }

    /// Dispatch a fire-and-forget full-store save. The snapshot is taken
    /// when the task runs, not when it is spawned; failures are logged by
    /// the backing store and never surfaced to the mutating caller.
    fn spawn_save(&self) {
        let cache = Arc::clone(&self.cache);
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let snapshot: Snapshot = {
                let cache = cache.read().await;
                cache.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            };
            let _ = store.save(snapshot).await;
        });
    }
}
