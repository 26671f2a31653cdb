//! Public catalog: products and localized banners
//!
//! The banner cache lives in memory and belongs to the [`Catalog`] value.
//! Long-running embedders keep one catalog (or clones of it, which share the
//! cache) for the lifetime of the process; a one-shot process fetches fresh.

use crate::cache::BannerCache;
use crate::client::{ApiClient, error::ClientError};
use crate::types::{Banner, Product};
use std::sync::Arc;
use storefront_core::StorefrontConfig;

/// Catalog service backed by the public endpoints
///
/// Clones share one banner cache.
#[derive(Clone, Debug)]
pub struct Catalog {
    client: ApiClient,
    banners: BannerCache,
    language: String,
}

impl Catalog {
    /// Create a catalog over `client` with its own banner cache
    pub fn new(client: ApiClient, banners: BannerCache, language: impl Into<String>) -> Self {
        Self {
            client,
            banners,
            language: language.into(),
        }
    }

    /// Create a catalog from loaded configuration
    pub fn from_config(client: ApiClient, config: &StorefrontConfig) -> Self {
        Self::new(
            client,
            BannerCache::new(config.cache.banner_capacity, config.cache.banner_ttl()),
            &config.api.language,
        )
    }

    /// Default content language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// List products
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        self.client.products().await
    }

    /// Get a single product
    pub async fn product(&self, id: u64) -> Result<Product, ClientError> {
        self.client.product(id).await
    }

    /// Banners in the default language
    pub async fn banners(&self) -> Result<Arc<Vec<Banner>>, ClientError> {
        self.banners_for(&self.language).await
    }

    /// Banners in `language`, served from cache while fresh
    pub async fn banners_for(&self, language: &str) -> Result<Arc<Vec<Banner>>, ClientError> {
        self.banners
            .try_get_or_fetch(language, || self.client.banners(language))
            .await
    }

    /// Forget cached banners, e.g. after the user switches language
    pub fn invalidate_banners(&self) {
        self.banners.invalidate_all();
    }
}
