//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default, so an empty file yields the stock two-listener
//! setup.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Shutdown coordination settings.
    pub shutdown: ShutdownConfig,

    /// Listeners to run as one group.
    pub listeners: Vec<ListenerConfig>,

    /// Settings shared by every HTTP listener.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shutdown: ShutdownConfig::default(),
            listeners: default_listeners(),
            http: HttpConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Shutdown coordination settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Time each listener gets to stop gracefully, in milliseconds.
    pub grace_period_ms: u64,

    /// Shut down on SIGINT, SIGTERM and SIGHUP.
    pub handle_signals: bool,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 5_000,
            handle_signals: true,
        }
    }
}

/// A single listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    /// Name served at `/` and used in logs and metrics.
    pub name: String,

    /// Bind address (e.g., "0.0.0.0:8848").
    pub bind_address: String,
}

impl ListenerConfig {
    pub fn new(name: impl Into<String>, bind_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bind_address: bind_address.into(),
        }
    }
}

/// Listener set used when the config file has no `[[listeners]]`.
pub fn default_listeners() -> Vec<ListenerConfig> {
    vec![
        ListenerConfig::new("index1", "0.0.0.0:8848"),
        ListenerConfig::new("index2", "0.0.0.0:8899"),
    ]
}

/// HTTP settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
