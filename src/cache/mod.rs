use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use tokio::sync::RwLock;

use crate::config::CACHE_KEY_PREFIX;
use crate::models::CompositeRecord;


pub struct CacheEntry {
    pub record: CompositeRecord,
    pub stored_at: SystemTime,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        // A clock that moved backwards reads as zero elapsed.
        self.stored_at.elapsed().unwrap_or_default() < ttl
    }
}

/// Composite records keyed by username, valid for a fixed TTL.
///
/// Expiry is only checked on read; stale entries stay in the map until the
/// next successful fetch for the same key replaces them.
pub struct ResponseCache {
    pub(crate) entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn key_for(username: &str) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, username)
    }

    pub async fn get(&self, key: &str) -> Option<CompositeRecord> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.record.clone())
    }

    pub async fn set(&self, key: &str, record: CompositeRecord) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                record,
                stored_at: SystemTime::now(),
            },
        );
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}
