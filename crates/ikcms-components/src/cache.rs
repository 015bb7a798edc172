//! Key-value cache component
//!
//! [`CacheComponent`] prefixes every key before handing it to a
//! [`CacheClient`]. The bundled client, [`MemoryCacheClient`], keeps entries
//! in process using moka with a capacity bound and per-entry expiry.
//!
//! Keys follow memcached rules: at most 250 bytes after prefixing, no
//! whitespace or control characters. An `expire` of zero means the entry
//! never expires.

use crate::component::{Component, Environment};
use crate::error::{CacheError, CacheResult};
use moka::sync::Cache;
use moka::Expiry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest key the cache accepts, prefix included
pub const MAX_KEY_LEN: usize = 250;

/// Cache settings (`[cache]` section of the application config)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Prepended to every key
    pub prefix: String,
    /// Maximum number of entries kept
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With key prefix
    #[inline]
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// With capacity
    #[inline]
    #[must_use]
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            max_capacity: 10_000,
        }
    }
}

/// Client for a key-value cache service
///
/// Keys reaching a client are already prefixed and checked.
#[cfg_attr(test, mockall::automock)]
pub trait CacheClient: Send + Sync {
    /// Fetch a value
    fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Store a value; zero `expire` keeps it until evicted
    fn set(&self, key: &str, value: Value, expire: Duration) -> CacheResult<bool>;

    /// Remove a value, reporting whether it existed
    fn delete(&self, key: &str) -> CacheResult<bool>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    ttl: Option<Duration>,
}

/// Per-entry time to live taken from the entry itself
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// In-process cache client backed by moka
#[derive(Debug, Clone)]
pub struct MemoryCacheClient {
    inner: Cache<String, CacheEntry>,
}

impl MemoryCacheClient {
    /// Create client with max capacity
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(EntryExpiry)
                .build(),
        }
    }

    /// Get approximate entry count
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl Default for MemoryCacheClient {
    /// Create client with default capacity (10,000 entries)
    fn default() -> Self {
        Self::new(CacheConfig::default().max_capacity)
    }
}

impl CacheClient for MemoryCacheClient {
    fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        Ok(self.inner.get(key).map(|entry| entry.value))
    }

    fn set(&self, key: &str, value: Value, expire: Duration) -> CacheResult<bool> {
        let ttl = (!expire.is_zero()).then_some(expire);
        self.inner.insert(key.to_string(), CacheEntry { value, ttl });
        Ok(true)
    }

    fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(self.inner.remove(key).is_some())
    }
}

/// Cache component: a client plus a key prefix
#[derive(Clone)]
pub struct CacheComponent {
    client: Arc<dyn CacheClient>,
    prefix: String,
}

impl CacheComponent {
    /// Name the component registers under
    pub const NAME: &'static str = "cache";

    /// Wrap a client
    pub fn new(client: Arc<dyn CacheClient>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    /// Create from configuration with an in-process client
    #[must_use]
    pub fn create(config: &CacheConfig) -> Self {
        Self::new(
            Arc::new(MemoryCacheClient::new(config.max_capacity)),
            config.prefix.clone(),
        )
    }

    /// Key prefix
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fetch a value
    pub fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let key = self.key(key)?;
        let value = self.client.get(&key)?;
        tracing::trace!(key = %key, hit = value.is_some(), "cache get");
        Ok(value)
    }

    /// Store a value; zero `expire` keeps it until evicted
    pub fn set(&self, key: &str, value: Value, expire: Duration) -> CacheResult<bool> {
        let key = self.key(key)?;
        tracing::trace!(key = %key, expire_secs = expire.as_secs(), "cache set");
        self.client.set(&key, value, expire)
    }

    /// Remove a value, reporting whether it existed
    pub fn delete(&self, key: &str) -> CacheResult<bool> {
        let key = self.key(key)?;
        tracing::trace!(key = %key, "cache delete");
        self.client.delete(&key)
    }

    fn key(&self, key: &str) -> CacheResult<String> {
        let full = format!("{}{}", self.prefix, key);
        if full.is_empty() {
            return Err(CacheError::invalid_key(full, "empty key"));
        }
        if full.len() > MAX_KEY_LEN {
            return Err(CacheError::invalid_key(full, "longer than 250 bytes"));
        }
        if full.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CacheError::invalid_key(
                full,
                "contains whitespace or control characters",
            ));
        }
        Ok(full)
    }
}

impl fmt::Debug for CacheComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheComponent")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Component for CacheComponent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Environment {
    /// The registered cache component, if any
    #[must_use]
    pub fn cache(&self) -> Option<&CacheComponent> {
        self.component::<CacheComponent>(CacheComponent::NAME)
    }
}
