//! Storefront HTTP client
//!
//! - [`client`]: transport over `reqwest`, endpoint methods and error mapping
//! - [`session`]: token store, refresh protocol and the authenticated call wrapper
//! - [`catalog`]: public catalog endpoints with a short-lived banner cache
//! - [`types`]: request and response payloads

pub mod cache;
pub mod catalog;
pub mod client;
pub mod session;
pub mod types;

pub use catalog::Catalog;
pub use client::{ApiClient, error::ClientError};
pub use session::{
    AuthenticatedRequest, ExpiryHandler, FileTokenStore, MemoryTokenStore, RefreshError, Session,
    SessionError, SessionIdentity, TokenStore,
};
