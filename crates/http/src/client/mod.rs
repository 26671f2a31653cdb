//! Storefront API transport

pub mod auth;
pub mod catalog;
pub mod error;

use error::ClientError;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;
use storefront_core::ApiConfig;

const DEFAULT_USER_AGENT: &str = concat!("storefront-client/", env!("CARGO_PKG_VERSION"));

/// Storefront API client
///
/// Holds no credentials. Bearer tokens are supplied per request by the
/// caller, usually [`crate::Session`].
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_prefix: String,
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        Self::builder()
            .base_url(&config.base_url)
            .auth_prefix(&config.auth_prefix)
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Path of an auth endpoint, e.g. `auth_path("/token/")` -> `/auth/token/`
    pub fn auth_path(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.auth_prefix)
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Create a request builder carrying `token` as a bearer credential, if any
    pub fn request_with_token(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let request = self.request(method, path);
        match token {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Execute a request and handle common errors
    ///
    /// An empty success body (e.g. `204 No Content`) deserializes as JSON `null`,
    /// so `T = ()` or `Option<_>` can be used for endpoints without a payload.
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            if body.is_empty() {
                Ok(serde_json::from_value(serde_json::Value::Null)?)
            } else {
                Ok(serde_json::from_slice(&body)?)
            }
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    auth_prefix: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the auth endpoint prefix (defaults to `/auth`)
    pub fn auth_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auth_prefix = Some(prefix.into());
        self
    }

    /// Set the request timeout
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        let auth_prefix = self
            .auth_prefix
            .map_or_else(|| "/auth".to_string(), |p| p.trim_end_matches('/').to_string());

        let mut client_builder = ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        );

        let client = client_builder.build()?;

        Ok(ApiClient {
            client,
            base_url,
            auth_prefix,
        })
    }
}
