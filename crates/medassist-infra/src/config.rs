//! Client configuration loader for MedAssist.
//!
//! Reads `config.toml` from `~/.medassist/` (or an explicit path) and
//! deserializes it into [`ClientConfig`]. The default location falls back to
//! defaults when the file is missing or malformed; an explicit path must
//! exist and parse.

use std::path::{Path, PathBuf};

use medassist_types::config::ClientConfig;
use medassist_types::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";

/// Resolve the MedAssist data directory.
///
/// Priority:
/// 1. `MEDASSIST_DATA_DIR` environment variable
/// 2. `~/.medassist/`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MEDASSIST_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".medassist")
}

/// Path of the default config file.
pub fn default_config_path() -> PathBuf {
    resolve_data_dir().join(CONFIG_FILE)
}

/// Load configuration from `explicit`, or from the default location.
pub async fn load_client_config(explicit: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    match explicit {
        Some(path) => load_required(path).await,
        None => Ok(load_or_default(&default_config_path()).await),
    }
}

/// Load `path`, treating a missing or malformed file as defaults.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
pub async fn load_or_default(path: &Path) -> ClientConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ClientConfig::default()
        }
    }
}

async fn load_required(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let config = toml::from_str::<ClientConfig>(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_or_default_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_or_default(&tmp.path().join(CONFIG_FILE)).await;
        assert_eq!(config.agent.base_url, "http://localhost:8080");
        assert_eq!(config.monitor.interval_secs, 30);
        assert!(config.greeting.is_none());
    }

    #[tokio::test]
    async fn load_or_default_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_or_default(&path).await;
        assert_eq!(config.agent.chat_path, "/agent/chat");
    }

    #[tokio::test]
    async fn load_client_config_explicit_valid_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        tokio::fs::write(
            &path,
            r#"
greeting = "Hello doctor, what can I help with?"

[agent]
base_url = "http://agent.internal:9000/"
request_timeout_secs = 30

[monitor]
interval_secs = 10
"#,
        )
        .await
        .unwrap();

        let config = load_client_config(Some(&path)).await.unwrap();
        assert_eq!(
            config.greeting.as_deref(),
            Some("Hello doctor, what can I help with?")
        );
        assert_eq!(config.agent.base(), "http://agent.internal:9000");
        assert_eq!(config.agent.chat_json_path, "/agent/chat-json");
        assert_eq!(config.monitor.interval_secs, 10);
        assert_eq!(config.monitor.probe_timeout_secs, 5);
    }

    #[tokio::test]
    async fn load_client_config_explicit_missing_file_errors() {
        let tmp = TempDir::new().unwrap();
        let err = load_client_config(Some(&tmp.path().join("absent.toml")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn load_client_config_explicit_malformed_file_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, "[agent\nbase_url = 1").await.unwrap();

        let err = load_client_config(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
