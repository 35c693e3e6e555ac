//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Upstream target configuration.
    pub upstream: UpstreamConfig,

    /// Diagnostic log settings.
    pub diagnostics: DiagnosticsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum inbound body size in bytes. Bodies are fully buffered
    /// before forwarding, so this bounds per-request memory.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            // Telegram caps uploads at 50 MB; leave headroom for the
            // multipart framing around them.
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Upstream target configuration.
///
/// The base URL is a deploy-time constant: one upstream per instance,
/// no routing. The mount prefix is the path segment under which this
/// relay is deployed; it is stripped from inbound URIs before the
/// upstream URL is built. It is always an explicit config value, never
/// inferred from ambient state at request time.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Absolute base URL of the upstream API, without a trailing slash.
    pub base_url: String,

    /// Path prefix stripped from inbound request URIs. Empty means the
    /// relay is mounted at the server root and nothing is stripped.
    pub mount_prefix: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.telegram.org".to_string(),
            mount_prefix: String::new(),
        }
    }
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Enable the per-transaction diagnostic log.
    pub enabled: bool,

    /// Path of the append-only log file.
    pub log_path: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: "relay.log".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for one inbound request, including the
    /// upstream round trip. Large file uploads need generous values.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 120 }
    }
}
