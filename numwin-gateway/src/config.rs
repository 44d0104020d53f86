//! Gateway configuration.
//!
//! Loaded once at startup from an optional TOML file, then overridden by CLI
//! flags and environment variables. Immutable for the process lifetime.

use std::path::Path;
use std::time::Duration;

use numwin::{Category, WindowStore};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9876";
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 500;
pub const DEFAULT_UPSTREAM_URL: &str = "http://20.244.56.144/test";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub bind_addr: String,
    /// Maximum number of values kept per category window.
    pub window_capacity: usize,
    /// Upper bound for one upstream fetch, body read included.
    pub fetch_timeout_ms: u64,
    pub upstream: UpstreamConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            window_capacity: WindowStore::<numwin::Number>::DEFAULT_CAPACITY,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            upstream: UpstreamConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: GatewayConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_capacity == 0 {
            return Err(ConfigError::Invalid(
                "window_capacity must be greater than zero".to_string(),
            ));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.upstream.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "upstream.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// TOML rendering with the auth token masked.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.upstream.auth_token.is_some() {
            shown.upstream.auth_token = Some("<redacted>".to_string());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    pub endpoints: EndpointsConfig,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            auth_token: None,
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl UpstreamConfig {
    pub fn url_for(&self, category: Category) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.endpoints.path_for(category);
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// Upstream path per category, relative to `base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub primes: String,
    pub fibonacci: String,
    pub even: String,
    pub random: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            primes: Category::Primes.default_endpoint().to_string(),
            fibonacci: Category::Fibonacci.default_endpoint().to_string(),
            even: Category::Even.default_endpoint().to_string(),
            random: Category::Random.default_endpoint().to_string(),
        }
    }
}

impl EndpointsConfig {
    pub fn path_for(&self, category: Category) -> &str {
        match category {
            Category::Primes => &self.primes,
            Category::Fibonacci => &self.fibonacci,
            Category::Even => &self.even,
            Category::Random => &self.random,
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_addr: Option<String>,
    pub port: Option<u16>,
    pub window_capacity: Option<usize>,
    pub fetch_timeout_ms: Option<u64>,
    pub upstream_url: Option<String>,
    pub auth_token: Option<String>,
}

impl ConfigOverrides {
    /// Apply on top of `config`. `port` replaces the port of whichever bind
    /// address wins.
    pub fn apply(self, config: &mut GatewayConfig) {
        if let Some(bind_addr) = self.bind_addr {
            config.bind_addr = bind_addr;
        }
        if let Some(port) = self.port {
            let host = config
                .bind_addr
                .rsplit_once(':')
                .map(|(host, _)| host)
                .unwrap_or("0.0.0.0");
            config.bind_addr = format!("{}:{}", host, port);
        }
        if let Some(capacity) = self.window_capacity {
            config.window_capacity = capacity;
        }
        if let Some(timeout_ms) = self.fetch_timeout_ms {
            config.fetch_timeout_ms = timeout_ms;
        }
        if let Some(url) = self.upstream_url {
            config.upstream.base_url = url;
        }
        if let Some(token) = self.auth_token {
            config.upstream.auth_token = Some(token);
        }
    }
}
