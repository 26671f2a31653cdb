//! Authenticated session against the storefront API
//!
//! A [`Session`] ties together the transport, a shared [`TokenStore`] and the
//! [`Refresher`]. Cloning a session is cheap and clones share everything,
//! including any refresh in progress.

pub mod call;
pub mod error;
pub mod refresh;
pub mod storefront;
pub mod store;

pub use call::{AuthenticatedRequest, CallState};
pub use error::{RefreshError, SessionError};
pub use refresh::{ExpiryHandler, Refresher, exchange_refresh_token};
pub use store::{FileTokenStore, MemoryTokenStore, SessionIdentity, StoreError, TokenStore};

use crate::client::ApiClient;
use crate::types::{ConfirmRequest, LoginRequest, RegisterRequest, TokenPair};
use std::sync::Arc;
use tracing::info;

/// Authenticated storefront session
#[derive(Clone)]
pub struct Session {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    refresher: Refresher,
}

impl Session {
    /// Create a session without an expiry handler
    pub fn new(client: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self::builder(client, store).build()
    }

    /// Create a session builder
    pub fn builder(client: ApiClient, store: Arc<dyn TokenStore>) -> SessionBuilder {
        SessionBuilder {
            client,
            store,
            on_expired: None,
        }
    }

    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    pub const fn refresher(&self) -> &Refresher {
        &self.refresher
    }

    /// Whether an access token is stored. Says nothing about its validity.
    pub fn is_authenticated(&self) -> bool {
        self.store.access().is_some()
    }

    /// Display identity of the signed-in user
    pub fn identity(&self) -> SessionIdentity {
        self.store.identity()
    }

    /// Sign in with phone and password
    pub async fn login(
        &self,
        phone: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<SessionIdentity, SessionError> {
        let request = LoginRequest {
            phone: phone.into(),
            password: password.into(),
        };
        let pair = self.client.obtain_token(&request).await?;
        let identity = self.establish(pair, request.phone)?;
        info!("signed in");
        Ok(identity)
    }

    /// Register a new account. Credentials are issued by [`Self::confirm`].
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<serde_json::Value, SessionError> {
        Ok(self.client.register(request).await?)
    }

    /// Confirm a phone number with the SMS code and sign in
    pub async fn confirm(
        &self,
        phone: impl Into<String>,
        code: impl Into<String>,
    ) -> Result<SessionIdentity, SessionError> {
        let request = ConfirmRequest {
            phone: phone.into(),
            code: code.into(),
        };
        let response = self.client.confirm_code(&request).await?;
        let status = response.status.to_string();
        let pair = response
            .into_token()
            .ok_or(SessionError::ConfirmationRejected(status))?;
        let identity = self.establish(pair, request.phone)?;
        info!("phone confirmed, signed in");
        Ok(identity)
    }

    /// Forget the stored credentials. No network call, no refresh attempt.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.clear()?;
        info!("signed out");
        Ok(())
    }

    fn establish(&self, pair: TokenPair, phone: String) -> Result<SessionIdentity, SessionError> {
        if pair.access.is_empty() {
            return Err(SessionError::IncompleteCredentials("access token missing"));
        }
        if pair.refresh.is_empty() {
            return Err(SessionError::IncompleteCredentials("refresh token missing"));
        }
        let identity = SessionIdentity {
            first_name: pair.first_name,
            phone: Some(phone),
        };
        self.store.set_pair(&pair.access, &pair.refresh)?;
        self.store.set_identity(identity.clone())?;
        Ok(identity)
    }
}

/// Builder for [`Session`]
pub struct SessionBuilder {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    on_expired: Option<Arc<dyn ExpiryHandler>>,
}

impl SessionBuilder {
    /// Called once per failed refresh, after the store has been cleared
    #[must_use]
    pub fn on_session_expired(mut self, handler: Arc<dyn ExpiryHandler>) -> Self {
        self.on_expired = Some(handler);
        self
    }

    /// Build the session
    pub fn build(self) -> Session {
        let mut refresher = Refresher::new(self.client.clone(), Arc::clone(&self.store));
        if let Some(handler) = self.on_expired {
            refresher = refresher.with_expiry_handler(handler);
        }
        Session {
            client: self.client,
            store: self.store,
            refresher,
        }
    }
}
