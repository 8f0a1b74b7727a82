//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MCP_FETCH_*)
//! 2. TOML config file (if MCP_FETCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// User agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str =
    "ModelContextProtocol/1.0 (Autonomous; +https://github.com/modelcontextprotocol/servers)";

/// How the server talks to MCP clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// Streamable HTTP (with SSE streams) served at `/mcp` on `bind_addr`.
    Http,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MCP_FETCH_*)
/// 2. TOML config file (if MCP_FETCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for both robots.txt and page requests.
    ///
    /// Set via MCP_FETCH_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Page fetch timeout in milliseconds.
    ///
    /// Set via MCP_FETCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// robots.txt fetch timeout in milliseconds.
    ///
    /// Set via MCP_FETCH_ROBOTS_TIMEOUT_MS environment variable.
    #[serde(default = "default_robots_timeout_ms")]
    pub robots_timeout_ms: u64,

    /// Maximum number of redirects to follow.
    ///
    /// Set via MCP_FETCH_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Number of characters returned when a tool call omits `max_length`.
    ///
    /// Set via MCP_FETCH_DEFAULT_MAX_LENGTH environment variable.
    #[serde(default = "default_max_length")]
    pub default_max_length: usize,

    /// Proxy used when a request does not name one.
    ///
    /// Set via MCP_FETCH_PROXY_URL environment variable.
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Whether to respect robots.txt rules.
    ///
    /// Set via MCP_FETCH_RESPECT_ROBOTS environment variable.
    #[serde(default = "default_true")]
    pub respect_robots: bool,

    /// Transport the server listens on.
    ///
    /// Set via MCP_FETCH_TRANSPORT environment variable (`stdio` or `http`).
    #[serde(default)]
    pub transport: Transport,

    /// Socket address for the HTTP transport.
    ///
    /// Set via MCP_FETCH_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_robots_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_max_length() -> usize {
    5000
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".into()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            robots_timeout_ms: default_robots_timeout_ms(),
            max_redirects: default_max_redirects(),
            default_max_length: default_max_length(),
            proxy_url: None,
            respect_robots: true,
            transport: Transport::default(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl AppConfig {
    /// Page timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// robots.txt timeout as Duration for use with reqwest.
    pub fn robots_timeout(&self) -> Duration {
        Duration::from_millis(self.robots_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MCP_FETCH_`
    /// 2. TOML file from `MCP_FETCH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MCP_FETCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MCP_FETCH_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
