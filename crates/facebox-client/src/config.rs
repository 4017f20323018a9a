//! Client configuration.

use std::time::Duration;

/// Default facebox address.
pub const DEFAULT_ADDR: &str = "http://localhost:8080";

/// Facebox client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceboxConfig {
    /// Base address of the facebox service, e.g. `http://localhost:8080`
    pub addr: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for FaceboxConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl FaceboxConfig {
    /// Config pointing at `addr` with default timeouts.
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    ///
    /// The address is not validated here; an unusable address surfaces as a
    /// configuration error on the first call.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            addr: std::env::var("FACEBOX_ADDR").unwrap_or(defaults.addr),
            timeout: std::env::var("FACEBOX_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            connect_timeout: std::env::var("FACEBOX_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
        }
    }
}
