use anyhow::{Context, Result};
use serde::Deserialize;

use crate::endpoint::API_BASE_URL;

/// Complete configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstasentConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Upstream API client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// API base URL (override for staging or tests)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional per-request timeout; unset means the HTTP client default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// User-Agent header sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    API_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("instasent-nodes/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Batch execution defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchConfig {
    /// Record per-item errors and keep going instead of stopping
    #[serde(default)]
    pub continue_on_fail: bool,
}

/// Host API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3002
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<InstasentConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: InstasentConfig =
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = InstasentConfig::default();
        assert_eq!(config.api.base_url, "https://api.instasent.com/v1");
        assert_eq!(config.api.timeout_secs, None);
        assert!(config.api.user_agent.starts_with("instasent-nodes/"));
        assert!(!config.batch.continue_on_fail);
        assert_eq!(config.server.port, 3002);
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
            [api]
            base_url = "http://localhost:9000/v1"
            timeout_secs = 30

            [batch]
            continue_on_fail = true

            [server]
            port = 8080
        "#;

        let config: InstasentConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000/v1");
        assert_eq!(config.api.timeout_secs, Some(30));
        assert!(config.api.user_agent.starts_with("instasent-nodes/"));
        assert!(config.batch.continue_on_fail);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: InstasentConfig = toml::from_str("[batch]\ncontinue_on_fail = true\n").unwrap();
        assert_eq!(config.api.base_url, API_BASE_URL);
        assert_eq!(config.server.port, 3002);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 4000").unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/instasent.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/instasent.toml"));
    }
}
