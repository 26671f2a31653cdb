//! Catalog API client methods

use super::{ApiClient, ClientError};
use crate::types::{Banner, Product};
use reqwest::{Method, header};

impl ApiClient {
    /// List products
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        let request = self.request(Method::GET, "/products/");
        self.execute(request).await
    }

    /// Get a single product
    pub async fn product(&self, id: u64) -> Result<Product, ClientError> {
        let request = self.request(Method::GET, &format!("/products/{id}/"));
        self.execute(request).await
    }

    /// List banners localized for `language`
    pub async fn banners(&self, language: &str) -> Result<Vec<Banner>, ClientError> {
        let request = self
            .request(Method::GET, "/banners/")
            .header(header::ACCEPT_LANGUAGE, language);
        self.execute(request).await
    }
}
