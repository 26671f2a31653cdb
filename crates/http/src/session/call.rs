//! Authenticated call wrapper
//!
//! A call that needs a bearer token is sent with the stored access token. If
//! the server answers 401 the refresh protocol runs once and the call is
//! reissued once with the new token. Nothing else triggers a refresh, and no
//! path through [`CallState`] refreshes twice.

use super::{Session, SessionError};
use crate::client::error::ClientError;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Description of a request, rebuilt for each attempt
#[derive(Debug, Clone)]
pub struct AuthenticatedRequest {
    method: Method,
    path: String,
    payload: Option<serde_json::Value>,
    requires_auth: bool,
}

impl AuthenticatedRequest {
    /// Request requiring a bearer token
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: None,
            requires_auth: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        self.payload = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Send without a bearer token; a 401 is then returned as-is
    #[must_use]
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    pub const fn requires_auth(&self) -> bool {
        self.requires_auth
    }
}

/// Progress of one authenticated call.
///
/// `Initial -> Refreshing -> Retried` and then done. A successful or
/// non-401 first attempt finishes from `Initial`; a failed refresh finishes
/// from `Refreshing` with [`SessionError::SessionExpired`].
#[derive(Clone, PartialEq, Eq)]
pub enum CallState {
    /// First attempt with the stored access token
    Initial,
    /// First attempt got 401 with the given token, renewing it
    Refreshing(Option<String>),
    /// Second and last attempt, with the renewed token
    Retried(String),
}

impl CallState {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Refreshing(_) => "refreshing",
            Self::Retried(_) => "retried",
        }
    }
}

impl std::fmt::Debug for CallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Session {
    /// Execute `request`, recovering once from an expired access token
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: &AuthenticatedRequest,
    ) -> Result<T, SessionError> {
        let mut state = CallState::Initial;
        loop {
            debug!(
                method = %request.method(),
                path = request.path(),
                state = state.label(),
                "authenticated call"
            );
            state = match state {
                CallState::Initial => {
                    let token = if request.requires_auth() {
                        self.store().access()
                    } else {
                        None
                    };
                    let outcome = self.attempt(request, token.as_deref()).await;
                    match outcome {
                        Err(error) if request.requires_auth() && error.is_unauthorized() => {
                            CallState::Refreshing(token)
                        }
                        outcome => return outcome.map_err(SessionError::from),
                    }
                }
                CallState::Refreshing(rejected) => match self
                    .refresher()
                    .refresh(rejected.as_deref())
                    .await
                {
                    Ok(token) => CallState::Retried(token),
                    Err(cause) => return Err(SessionError::SessionExpired(cause)),
                },
                CallState::Retried(token) => {
                    return self
                        .attempt(request, Some(&token))
                        .await
                        .map_err(SessionError::from);
                }
            };
        }
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        request: &AuthenticatedRequest,
        token: Option<&str>,
    ) -> Result<T, ClientError> {
        let mut builder =
            self.client()
                .request_with_token(request.method().clone(), request.path(), token);
        if let Some(payload) = request.payload() {
            builder = builder.json(payload);
        }
        self.client().execute(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_description() {
        let request = AuthenticatedRequest::post("/cart/")
            .json(&json!({"product": 1, "quantity": 2}))
            .unwrap();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/cart/");
        assert_eq!(request.payload().unwrap()["quantity"], 2);
        assert!(request.requires_auth());
        assert!(!request.public().requires_auth());
    }

    #[test]
    fn test_states_hide_tokens() {
        let state = CallState::Retried("secret-access".to_string());
        assert_eq!(format!("{state:?}"), "retried");
        let state = CallState::Refreshing(Some("stale-access".to_string()));
        assert_eq!(format!("{state:?}"), "refreshing");
    }
}
