//! Client configuration types.
//!
//! `ClientConfig` represents `config.toml`, which controls where the agent
//! service lives, how often it is probed, and how the consultation opens.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the consultation client.
///
/// Loaded from `~/.medassist/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Opening agent turn shown before the user types anything.
    #[serde(default)]
    pub greeting: Option<String>,

    #[serde(default)]
    pub agent: AgentEndpointConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Location of the agent service and its endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    #[serde(default = "default_chat_path")]
    pub chat_path: String,
    #[serde(default = "default_chat_json_path")]
    pub chat_json_path: String,
    /// Upper bound for a single chat request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_chat_path() -> String {
    "/agent/chat".to_string()
}

fn default_chat_json_path() -> String {
    "/agent/chat-json".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for AgentEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            health_path: default_health_path(),
            chat_path: default_chat_path(),
            chat_json_path: default_chat_json_path(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AgentEndpointConfig {
    /// Base URL without trailing slashes.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Join an endpoint path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base())
        } else {
            format!("{}/{path}", self.base())
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Connectivity probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

fn default_probe_timeout_secs() -> u64 {
    5
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

impl MonitorConfig {
    /// Probe interval, never shorter than one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.max(1))
    }
}
