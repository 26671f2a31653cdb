//! Authentication API client methods
//!
//! All of these are public endpoints: they never carry a bearer token.

use super::{ApiClient, ClientError};
use crate::types::{
    ConfirmRequest, ConfirmResponse, LoginRequest, RefreshRequest, RefreshResponse,
    RegisterRequest, TokenPair,
};
use reqwest::Method;

impl ApiClient {
    /// Exchange phone and password for a credential pair
    pub async fn obtain_token(&self, request: &LoginRequest) -> Result<TokenPair, ClientError> {
        let req = self
            .request(Method::POST, &self.auth_path("/token/"))
            .json(request);
        self.execute(req).await
    }

    /// Create an account; it stays inactive until the SMS code is confirmed
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<serde_json::Value, ClientError> {
        let req = self
            .request(Method::POST, &self.auth_path("/register/"))
            .json(request);
        self.execute(req).await
    }

    /// Confirm a phone number with the code sent by SMS
    pub async fn confirm_code(
        &self,
        request: &ConfirmRequest,
    ) -> Result<ConfirmResponse, ClientError> {
        let req = self
            .request(Method::POST, &self.auth_path("/confirm/"))
            .json(request);
        self.execute(req).await
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh_access(&self, refresh: &str) -> Result<RefreshResponse, ClientError> {
        let req = self
            .request(Method::POST, &self.auth_path("/token/refresh/"))
            .json(&RefreshRequest {
                refresh: refresh.to_string(),
            });
        self.execute(req).await
    }
}
