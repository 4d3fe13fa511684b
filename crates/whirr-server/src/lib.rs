//! The whois TCP transport of the whirr routing registry.
//!
//! One lightweight task per client connection; the core crates underneath
//! are synchronous and stateless, so concurrency lives entirely here.
//! Signature verification runs off the async scheduler via
//! `spawn_blocking`.

pub mod config;
pub mod connection;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use connection::AppContext;
pub use error::{ServerError, ServerResult};
pub use server::WhoisServer;
