use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::director::DirectorConfig;
use crate::profile::ModeProfile;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub director: DirectorConfig,
    pub backend: BackendConfig,
    pub allocator: AllocatorConfig,
    #[serde(default)]
    pub notifier: Option<NotifierConfig>,
    pub profiles: Vec<ModeProfile>,
}

/// HTTP server configuration for the status and metrics endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Ticket backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the ticket service (e.g. "http://tickets:8080")
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Allocator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllocatorConfig {
    /// Endpoint allocation requests are posted to
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Player notification configuration. When absent, notifications are
/// silently discarded.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    /// Base URL of the notification service
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Upper bound on in-flight per-player deliveries
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    5
}

fn default_max_in_flight() -> usize {
    32
}
