//! Session error types

use super::store::StoreError;
use crate::client::error::ClientError;
use thiserror::Error;

/// Why a refresh did not yield a new access token
///
/// `Clone` because one outcome is handed to every caller waiting on the same
/// in-flight refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// No refresh token was stored
    #[error("No refresh token available")]
    NoRefreshToken,

    /// The refresh exchange was rejected or errored
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),
}

/// Errors returned by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// The access token was rejected and could not be renewed.
    /// Stored credentials have been cleared; the user has to sign in again.
    #[error("Session expired: {0}")]
    SessionExpired(#[source] RefreshError),

    /// Any other failure of the wrapped call, passed through unchanged
    #[error(transparent)]
    RequestFailed(#[from] ClientError),

    /// The SMS confirmation response carried no credentials
    #[error("Confirmation rejected: {0}")]
    ConfirmationRejected(String),

    /// Sign-in answered with only one half of the credential pair
    #[error("Incomplete credentials: {0}")]
    IncompleteCredentials(&'static str),

    /// The token store could not be written
    #[error("Token store error: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Whether the user needs to authenticate again.
    ///
    /// True for an expired session and for a call that was still rejected
    /// with 401 after its one refresh-and-retry.
    pub const fn is_auth_expired(&self) -> bool {
        match self {
            Self::SessionExpired(_) => true,
            Self::RequestFailed(error) => error.is_unauthorized(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_expired_classification() {
        assert!(SessionError::SessionExpired(RefreshError::NoRefreshToken).is_auth_expired());
        assert!(
            SessionError::RequestFailed(ClientError::AuthenticationFailed(String::new()))
                .is_auth_expired()
        );
        assert!(
            !SessionError::RequestFailed(ClientError::BadRequest("quantity".into()))
                .is_auth_expired()
        );
        assert!(!SessionError::ConfirmationRejected("false".into()).is_auth_expired());
    }

    #[test]
    fn test_expired_message_names_cause() {
        let error = SessionError::SessionExpired(RefreshError::RefreshFailed("401".into()));
        assert_eq!(error.to_string(), "Session expired: Token refresh failed: 401");
    }
}
