//! LRU caching decorator for descriptor sources.
//!
//! The engine itself never caches: it fetches once per operation. Hosts
//! that read many resources of the same family in one run wrap their
//! source in [`CachingDescriptorSource`] to turn those fetches into cache
//! hits. Failed fetches are never cached.

use async_trait::async_trait;
use lru::LruCache;
use plugin_config_core::traits::DescriptorSource;
use plugin_config_core::{Descriptor, Error, PluginFamily, Result};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::Mutex;

/// Descriptor source that remembers the last `capacity` families fetched.
///
/// # Examples
///
/// ```
/// use plugin_config_core::traits::DescriptorSource;
/// use plugin_config_core::PluginFamily;
/// use plugin_config_engine::{CachingDescriptorSource, StaticDescriptorSource};
///
/// # #[tokio::main]
/// # async fn main() -> plugin_config_core::Result<()> {
/// let source = CachingDescriptorSource::with_capacity(
///     StaticDescriptorSource::new().with_family("a", vec![]),
///     16,
/// )?;
///
/// let family = PluginFamily::new("a");
/// source.descriptors(&family).await?;
/// source.descriptors(&family).await?;
///
/// let stats = source.stats().await;
/// assert_eq!(stats.hits, 1);
/// assert_eq!(stats.misses, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CachingDescriptorSource<S> {
    inner: S,
    cache: Arc<Mutex<LruCache<PluginFamily, Vec<Descriptor>>>>,

    // Statistics counters (thread-safe atomics)
    hits: Arc<AtomicU32>,
    misses: Arc<AtomicU32>,
}

impl<S: DescriptorSource> CachingDescriptorSource<S> {
    /// Wraps `inner` with a cache holding up to `capacity` families.
    #[must_use]
    pub fn new(inner: S, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            hits: Arc::new(AtomicU32::new(0)),
            misses: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Wraps `inner` with a cache holding up to `capacity` families.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if `capacity` is 0.
    pub fn with_capacity(inner: S, capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| Error::ConfigError {
            message: "Descriptor cache capacity must be greater than 0".to_string(),
        })?;
        Ok(Self::new(inner, capacity))
    }

    /// Drops the cached descriptors of one family.
    ///
    /// Returns `true` if the family was cached.
    pub async fn invalidate(&self, family: &PluginFamily) -> bool {
        let removed = self.cache.lock().await.pop(family).is_some();
        if removed {
            tracing::debug!("Invalidated cached descriptors for {}", family);
        }
        removed
    }

    /// Drops every cached family.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
        tracing::debug!("Cleared descriptor cache");
    }

    /// Returns cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let cache = self.cache.lock().await;
        CacheStats {
            size: cache.len(),
            capacity: cache.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Returns the wrapped source.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: DescriptorSource> DescriptorSource for CachingDescriptorSource<S> {
    async fn descriptors(&self, family: &PluginFamily) -> Result<Vec<Descriptor>> {
        let cached = self.cache.lock().await.get(family).cloned();
        if let Some(descriptors) = cached {
            tracing::debug!("Descriptor cache hit for {}", family);
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(descriptors);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let descriptors = self.inner.descriptors(family).await?;
        self.cache
            .lock()
            .await
            .put(family.clone(), descriptors.clone());
        Ok(descriptors)
    }
}

/// Descriptor cache statistics.
///
/// # Examples
///
/// ```
/// use plugin_config_engine::CacheStats;
///
/// let stats = CacheStats { size: 2, capacity: 8, hits: 3, misses: 1 };
/// assert_eq!(stats.hit_rate(), 0.75);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of cached families
    pub size: usize,
    /// Maximum cache capacity
    pub capacity: usize,
    /// Lookups answered from the cache
    pub hits: u32,
    /// Lookups forwarded to the wrapped source
    pub misses: u32,
}

impl CacheStats {
    /// Returns the fraction of lookups answered from the cache (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits.saturating_add(self.misses);
        if total == 0 {
            0.0
        } else {
            f64::from(self.hits) / f64::from(total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticDescriptorSource;
    use plugin_config_core::ConfigField;

    fn source() -> StaticDescriptorSource {
        StaticDescriptorSource::new()
            .with_family(
                "a",
                vec![Descriptor::new("A", "A", vec![ConfigField::plain("host", true)])],
            )
            .with_family("b", vec![])
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = CachingDescriptorSource::with_capacity(source(), 0).unwrap_err();
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn test_hit_after_miss() {
        let cache = CachingDescriptorSource::with_capacity(source(), 4).unwrap();
        let family = PluginFamily::new("a");

        let first = cache.descriptors(&family).await.unwrap();
        let second = cache.descriptors(&family).await.unwrap();

        assert_eq!(first, second);
        let stats = cache.stats().await;
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_errors_not_cached() {
        let cache = CachingDescriptorSource::with_capacity(source(), 4).unwrap();
        let family = PluginFamily::new("missing");

        assert!(cache.descriptors(&family).await.is_err());
        assert!(cache.descriptors(&family).await.is_err());

        let stats = cache.stats().await;
        assert_eq!((stats.hits, stats.misses, stats.size), (0, 2, 0));
    }

    #[tokio::test]
    async fn test_eviction_at_capacity() {
        let cache = CachingDescriptorSource::with_capacity(source(), 1).unwrap();
        cache.descriptors(&PluginFamily::new("a")).await.unwrap();
        cache.descriptors(&PluginFamily::new("b")).await.unwrap();
        cache.descriptors(&PluginFamily::new("a")).await.unwrap();

        let stats = cache.stats().await;
        assert_eq!(stats.misses, 3);
        assert_eq!(stats.size, 1);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = CachingDescriptorSource::with_capacity(source(), 4).unwrap();
        let a = PluginFamily::new("a");
        cache.descriptors(&a).await.unwrap();
        cache.descriptors(&PluginFamily::new("b")).await.unwrap();

        assert!(cache.invalidate(&a).await);
        assert!(!cache.invalidate(&a).await);
        assert_eq!(cache.stats().await.size, 1);

        cache.clear().await;
        assert_eq!(cache.stats().await.size, 0);
    }

    #[test]
    fn test_hit_rate_empty() {
        let stats = CacheStats {
            size: 0,
            capacity: 1,
            hits: 0,
            misses: 0,
        };
        assert!(stats.hit_rate().abs() < f64::EPSILON);
    }
}
