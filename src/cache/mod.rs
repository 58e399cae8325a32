//! Short-lived key-value caches
//!
//! Titles are published to a namespaced cache with a time-to-live so a client
//! polling for the freshly generated title can pick it up. Expired entries are
//! dropped lazily on read and purged on write.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Cache namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKeys {
    /// Generated conversation titles
    GenTitle,
}

impl CacheKeys {
    /// Namespace name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenTitle => "GEN_TITLE",
        }
    }
}

impl fmt::Display for CacheKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache key for a conversation title: `{user_id}-{conversation_id}`
///
/// # Examples
///
/// ```
/// use titler::cache::title_key;
///
/// assert_eq!(title_key("user1", "convo9"), "user1-convo9");
/// ```
pub fn title_key(user_id: &str, conversation_id: &str) -> String {
    format!("{}-{}", user_id, conversation_id)
}

/// A key-value cache with per-entry expiry
#[async_trait]
pub trait TitleCache: Send + Sync {
    /// Store `value` under `key` for `ttl`, replacing any previous value
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Read a live value
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove a value, returning whether one was present
    async fn delete(&self, key: &str) -> Result<bool>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process TTL cache for one namespace
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use titler::cache::{CacheKeys, MemoryCache, TitleCache};
///
/// # #[tokio::main]
/// # async fn main() -> titler::error::Result<()> {
/// let cache = MemoryCache::new(CacheKeys::GenTitle);
/// cache.set("u1-c1", "Trip Planning", Duration::from_secs(120)).await?;
/// assert_eq!(cache.get("u1-c1").await?.as_deref(), Some("Trip Planning"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryCache {
    namespace: CacheKeys,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// Create an empty cache for a namespace
    pub fn new(namespace: CacheKeys) -> Self {
        Self {
            namespace,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Namespace this cache serves
    pub fn namespace(&self) -> CacheKeys {
        self.namespace
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    /// Whether there are no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait]
impl TitleCache for MemoryCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| !e.is_expired(now));
        entries.insert(
            self.namespaced(key),
            CacheEntry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = self.namespaced(key);
        let now = Instant::now();

        let expired = {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            tracing::debug!(key = %key, "Cache entry expired, removing");
            self.entries.write().await.remove(&key);
        }
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        let removed = self.entries.write().await.remove(&self.namespaced(key));
        Ok(removed.is_some_and(|e| !e.is_expired(now)))
    }
}
