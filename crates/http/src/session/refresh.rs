//! Refresh protocol: trade the stored refresh token for a new access token
//!
//! Any failure is fail-closed: the store is cleared and the registered
//! [`ExpiryHandler`] is told the session is gone. Concurrent refresh requests
//! share one in-flight exchange, so the refresh endpoint is hit once and the
//! handler runs once per failed exchange. A caller whose 401 arrives after
//! that exchange settled picks up its result instead of starting another.

use super::error::RefreshError;
use super::store::TokenStore;
use crate::client::ApiClient;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Reaction to a session that could not be renewed, typically sending the
/// user to the login entry point.
pub trait ExpiryHandler: Send + Sync {
    fn on_session_expired(&self, cause: &RefreshError);
}

impl<F> ExpiryHandler for F
where
    F: Fn(&RefreshError) + Send + Sync,
{
    fn on_session_expired(&self, cause: &RefreshError) {
        self(cause);
    }
}

type RefreshFlight = Shared<BoxFuture<'static, Result<String, RefreshError>>>;

/// The refresh currently in progress, if any. A flight removes itself once
/// it has settled, so a finished outcome is never handed to a later caller.
#[derive(Default)]
struct FlightSlot {
    generation: u64,
    current: Option<RefreshFlight>,
}

/// Exchange `refresh` for a new access token. Touches nothing but the network.
pub async fn exchange_refresh_token(
    client: &ApiClient,
    refresh: &str,
) -> Result<String, RefreshError> {
    let response = client
        .refresh_access(refresh)
        .await
        .map_err(|e| RefreshError::RefreshFailed(e.to_string()))?;

    if response.access.is_empty() {
        return Err(RefreshError::RefreshFailed(
            "refresh endpoint returned an empty access token".to_string(),
        ));
    }
    Ok(response.access)
}

/// Runs the refresh protocol against a token store
#[derive(Clone)]
pub struct Refresher {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    on_expired: Option<Arc<dyn ExpiryHandler>>,
    in_flight: Arc<Mutex<FlightSlot>>,
}

impl Refresher {
    /// Create a refresher without an expiry handler
    pub fn new(client: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            store,
            on_expired: None,
            in_flight: Arc::new(Mutex::new(FlightSlot::default())),
        }
    }

    /// Notify `handler` whenever a refresh fails
    #[must_use]
    pub fn with_expiry_handler(mut self, handler: Arc<dyn ExpiryHandler>) -> Self {
        self.on_expired = Some(handler);
        self
    }

    /// Obtain a new access token after `rejected` was refused by the server,
    /// joining a refresh already in progress.
    ///
    /// If the stored access token is no longer `rejected`, another refresh has
    /// already settled since: its new token is returned without a network
    /// call, or, when it failed and cleared the store, `NoRefreshToken` is
    /// returned without notifying the expiry handler a second time.
    ///
    /// On success the token is already written to the store. On failure the
    /// store has been cleared.
    pub async fn refresh(&self, rejected: Option<&str>) -> Result<String, RefreshError> {
        let flight = {
            let mut slot = self.in_flight.lock().await;
            if let Some(flight) = slot.current.as_ref() {
                debug!("joining in-flight token refresh");
                flight.clone()
            } else {
                let current = self.store.access();
                if current.as_deref() != rejected {
                    return match current {
                        Some(access) => {
                            debug!("access token already renewed");
                            Ok(access)
                        }
                        None => {
                            debug!("session already cleared");
                            Err(RefreshError::NoRefreshToken)
                        }
                    };
                }

                slot.generation = slot.generation.wrapping_add(1);
                let flight = settle(
                    Arc::clone(&self.in_flight),
                    slot.generation,
                    run_refresh(
                        self.client.clone(),
                        Arc::clone(&self.store),
                        self.on_expired.clone(),
                    ),
                )
                .boxed()
                .shared();
                slot.current = Some(flight.clone());
                flight
            }
        };

        flight.await
    }
}

/// Run `refresh` and vacate the slot before anyone sees the outcome
async fn settle(
    in_flight: Arc<Mutex<FlightSlot>>,
    generation: u64,
    refresh: impl Future<Output = Result<String, RefreshError>>,
) -> Result<String, RefreshError> {
    let outcome = refresh.await;
    let mut slot = in_flight.lock().await;
    if slot.generation == generation {
        slot.current = None;
    }
    outcome
}

async fn run_refresh(
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    on_expired: Option<Arc<dyn ExpiryHandler>>,
) -> Result<String, RefreshError> {
    let outcome = match store.refresh() {
        None => Err(RefreshError::NoRefreshToken),
        Some(refresh) => match exchange_refresh_token(&client, &refresh).await {
            Ok(access) => store.set_access(&access).map(|()| access).map_err(|e| {
                RefreshError::RefreshFailed(format!("could not store new access token: {e}"))
            }),
            Err(error) => Err(error),
        },
    };

    match &outcome {
        Ok(_) => info!("access token refreshed"),
        Err(error) => {
            warn!(%error, "token refresh failed, clearing session");
            if let Err(store_error) = store.clear() {
                warn!(error = %store_error, "failed to clear token store");
            }
            if let Some(handler) = &on_expired {
                handler.on_session_expired(error);
            }
        }
    }
    outcome
}
