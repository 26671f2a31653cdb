//! Tracing setup shared by the storefront binaries
//!
//! Library crates only emit `tracing` events; the subscriber is installed
//! once by the embedding application through [`init_tracing`].

pub mod config;
pub mod init;

pub use config::{InstrumentationConfig, LogFileConfig};
pub use init::init_tracing;
