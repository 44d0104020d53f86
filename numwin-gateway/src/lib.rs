//! HTTP gateway for numwin.
//!
//! Serves `GET /numbers/{numberid}` by fetching a batch from the upstream
//! test server, merging it into the category's window and answering with the
//! previous window, current window, raw batch and rolling average.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod server;

pub use config::{ConfigOverrides, EndpointsConfig, GatewayConfig, UpstreamConfig};
pub use error::{ConfigError, GatewayError};
pub use fetcher::HttpFetcher;
pub use server::{router, GatewayState, NumberGateway};
