//! Storefront core types and utilities

pub mod config;
pub mod error;
pub mod tracing;

pub use config::{ApiConfig, CacheConfig, SessionConfig, StorefrontConfig};
pub use error::{CoreError, CoreResult};
