//! Short-lived client-side caches for rarely changing content
//!
//! Only marketing content goes through here. A stale entry costs nothing but
//! an outdated banner, so entries simply expire after a fixed TTL.

use crate::client::error::ClientError;
use crate::types::Banner;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Banners keyed by content language
#[derive(Debug, Clone)]
pub struct BannerCache {
    inner: Cache<String, Arc<Vec<Banner>>>,
}

impl BannerCache {
    /// Cache with time-based expiration
    pub fn new(max_languages: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_languages)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Cached banners for `language`, if still fresh
    pub async fn get(&self, language: &str) -> Option<Arc<Vec<Banner>>> {
        self.inner.get(language).await
    }

    /// Cached banners for `language`, fetching and storing them when missing.
    ///
    /// Fetch errors are returned and nothing is cached.
    pub async fn try_get_or_fetch<F, Fut>(
        &self,
        language: &str,
        fetch: F,
    ) -> Result<Arc<Vec<Banner>>, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Banner>, ClientError>>,
    {
        if let Some(cached) = self.get(language).await {
            debug!(language, "banner cache hit");
            return Ok(cached);
        }

        debug!(language, "banner cache miss");
        let banners = Arc::new(fetch().await?);
        self.inner
            .insert(language.to_string(), Arc::clone(&banners))
            .await;
        Ok(banners)
    }

    /// Drop the entry for `language`
    pub async fn invalidate(&self, language: &str) {
        self.inner.invalidate(language).await;
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn banner(id: u64) -> Banner {
        Banner {
            id,
            title: None,
            image: format!("/media/banner-{id}.png"),
            link: None,
        }
    }

    #[tokio::test]
    async fn test_fetches_once_while_fresh() {
        let cache = BannerCache::new(4, Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        let fetches = &counter;
        let fetch = move || async move {
            fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![banner(1)])
        };

        let first = cache.try_get_or_fetch("en", fetch).await.unwrap();
        let second = cache.try_get_or_fetch("en", fetch).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = BannerCache::new(4, Duration::from_secs(60));

        let result = cache
            .try_get_or_fetch("en", || async {
                Err(ClientError::NotFound("banners".into()))
            })
            .await;
        assert!(matches!(result, Err(ClientError::NotFound(_))));
        assert!(cache.get("en").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = BannerCache::new(4, Duration::from_secs(60));
        cache
            .try_get_or_fetch("ru", || async { Ok(vec![banner(1)]) })
            .await
            .unwrap();

        cache.invalidate("ru").await;
        assert!(cache.get("ru").await.is_none());
    }
}
