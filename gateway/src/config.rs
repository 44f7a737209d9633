//! Gateway configuration with TOML file support.

use petition_worldid::{ActionApiVersion, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::GatewayError;

/// Which petition store backs the gateway.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// A single JSON array file on local disk.
    #[default]
    Json,
    /// Process memory; lost on restart.
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Json => f.write_str("json"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "file" => Ok(StoreBackend::Json),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// Configuration for the gateway.
///
/// Can be loaded from a TOML file via [`GatewayConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Secrets are optional: a missing
/// `api_key` locks `/actions`, a missing `hmac_secret` disables `/auth/nonce`,
/// and a missing `id_secret` falls back to a built-in key with a warning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Interface to bind.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Petition store backend.
    #[serde(default)]
    pub store: StoreBackend,

    /// Backing file of the JSON store.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// World ID application identifier (`app_...`).
    #[serde(default)]
    pub app_id: Option<String>,

    /// Key clients must present to `POST /actions`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Bearer key for the World ID developer API. Falls back to `api_key`.
    #[serde(default)]
    pub world_id_api_key: Option<String>,

    /// Base URL of the World ID developer API.
    #[serde(default = "default_world_id_base_url")]
    pub world_id_base_url: String,

    /// Create-action API generation.
    #[serde(default)]
    pub action_api_version: ActionApiVersion,

    /// Key of the petition id HMAC.
    #[serde(default)]
    pub id_secret: Option<String>,

    /// Key of the wallet-auth nonce HMAC.
    #[serde(default)]
    pub hmac_secret: Option<String>,

    /// Chain RPC endpoint handed to the SIWE verifier.
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Whether to expose `GET /metrics`.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Timeout of upstream World ID requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./petitions.json")
}

fn default_world_id_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GatewayConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, GatewayError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GatewayError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GatewayError> {
        toml::from_str(s).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GatewayError> {
        toml::to_string_pretty(self).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// `bind_address:port`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Bearer key sent upstream when registering actions.
    pub fn upstream_api_key(&self) -> Option<&str> {
        self.world_id_api_key
            .as_deref()
            .or(self.api_key.as_deref())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            store: StoreBackend::default(),
            data_file: default_data_file(),
            app_id: None,
            api_key: None,
            world_id_api_key: None,
            world_id_base_url: default_world_id_base_url(),
            action_api_version: ActionApiVersion::default(),
            id_secret: None,
            hmac_secret: None,
            rpc_url: None,
            enable_metrics: false,
            log_level: default_log_level(),
            log_format: default_log_format(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = GatewayConfig {
            app_id: Some("app_staging_123".into()),
            ..GatewayConfig::default()
        };
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = GatewayConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.port, config.port);
        assert_eq!(parsed.app_id, config.app_id);
        assert_eq!(parsed.store, StoreBackend::Json);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = GatewayConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_file, PathBuf::from("./petitions.json"));
        assert_eq!(config.world_id_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.action_api_version, ActionApiVersion::V2);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            port = 8080
            store = "memory"
            action_api_version = "v1"
        "#;
        let config = GatewayConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.action_api_version, ActionApiVersion::V1);
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn upstream_key_falls_back_to_api_key() {
        let mut config = GatewayConfig {
            api_key: Some("inbound".into()),
            ..GatewayConfig::default()
        };
        assert_eq!(config.upstream_api_key(), Some("inbound"));
        config.world_id_api_key = Some("upstream".into());
        assert_eq!(config.upstream_api_key(), Some("upstream"));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = GatewayConfig::from_toml_file("/nonexistent/petitions.toml");
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn store_backend_parses() {
        assert_eq!("JSON".parse::<StoreBackend>(), Ok(StoreBackend::Json));
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }
}
