//! Result cache for listing fetches.
//!
//! Entries are keyed by a canonical request key (method, endpoint and the
//! query parameters sorted by name) so the same query spelled with its
//! parameters in a different order hits the same entry. The cache is bounded:
//! least-recently-used entries are evicted past the configured capacity and
//! entries older than the configured TTL are dropped when read.

use std::fmt;
use std::num::NonZeroUsize;

use chrono::{DateTime, TimeDelta, Utc};
use lru::LruCache;

use crate::domain::query::encode_pairs;
use crate::http::Method;

/// Canonical identity of a cacheable request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for `method endpoint?params`.
    ///
    /// Parameters are sorted by name (then value), so their order does not
    /// matter.
    ///
    /// # Examples
    ///
    /// ```
    /// use bike_rental::cache::CacheKey;
    /// use bike_rental::http::Method;
    ///
    /// let a = CacheKey::new(Method::Get, "bikes/", &[("status", "available"), ("type", "Mountain")]);
    /// let b = CacheKey::new(Method::Get, "bikes/", &[("type", "Mountain"), ("status", "available")]);
    /// assert_eq!(a, b);
    /// ```
    pub fn new<K, V>(method: Method, endpoint: &str, params: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut sorted: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect();
        sorted.sort_unstable();
        Self(format!("{method} {endpoint}?{}", encode_pairs(sorted)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// Bounded LRU cache of fetched results with optional expiry.
pub struct ResultCache<V> {
    entries: LruCache<CacheKey, CacheEntry<V>>,
    ttl: Option<TimeDelta>,
}

impl<V: Clone> ResultCache<V> {
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    ///
    /// `ttl` of `None` keeps entries until they are evicted by capacity.
    #[must_use]
    pub fn new(capacity: usize, ttl: Option<TimeDelta>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Looks up `key`, refreshing its recency.
    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    /// Stores `value` under `key`, evicting the least recently used entry if full.
    pub fn set(&mut self, key: CacheKey, value: V) {
        self.set_at(key, value, Utc::now());
    }

    /// Looks up `key` as of `now`; an expired entry is removed and reported absent.
    pub fn get_at(&mut self, key: &CacheKey, now: DateTime<Utc>) -> Option<V> {
        let expired = {
            let entry = self.entries.get(key)?;
            self.ttl.is_some_and(|ttl| now - entry.inserted_at >= ttl)
        };

        if expired {
            tracing::debug!(key = %key, "cache entry expired");
            self.entries.pop(key);
            return None;
        }

        tracing::trace!(key = %key, "cache hit");
        self.entries.peek(key).map(|entry| entry.value.clone())
    }

    pub fn set_at(&mut self, key: CacheKey, value: V, now: DateTime<Utc>) {
        if let Some((evicted, _)) = self.entries.push(
            key.clone(),
            CacheEntry {
                value,
                inserted_at: now,
            },
        ) {
            if evicted != key {
                tracing::debug!(evicted = %evicted, "cache entry evicted");
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> fmt::Debug for ResultCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.entries.cap())
            .field("ttl", &self.ttl)
            .finish()
    }
}
