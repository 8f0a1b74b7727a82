//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` or `robots_timeout_ms` is below 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `default_max_length` is 0
    /// - `max_redirects` exceeds 50
    /// - `proxy_url` is set but is not an absolute URL
    /// - `bind_addr` is not a socket address
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_timeout("timeout_ms", self.timeout_ms)?;
        check_timeout("robots_timeout_ms", self.robots_timeout_ms)?;

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.default_max_length == 0 {
            return Err(ConfigError::Invalid {
                field: "default_max_length".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.max_redirects > 50 {
            return Err(ConfigError::Invalid { field: "max_redirects".into(), reason: "must not exceed 50".into() });
        }

        if let Some(proxy) = &self.proxy_url
            && let Err(e) = url::Url::parse(proxy)
        {
            return Err(ConfigError::Invalid { field: "proxy_url".into(), reason: e.to_string() });
        }

        if let Err(e) = self.bind_addr.parse::<SocketAddr>() {
            return Err(ConfigError::Invalid { field: "bind_addr".into(), reason: e.to_string() });
        }

        if !self.respect_robots {
            tracing::warn!("respect_robots is disabled; robots.txt will not be consulted for any request");
        }

        Ok(())
    }
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < MIN_TIMEOUT_MS {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
    }
    if value > MAX_TIMEOUT_MS {
        return Err(ConfigError::Invalid {
            field: field.into(),
            reason: "must not exceed 5 minutes (300000ms)".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_robots_timeout_exceeds_limit() {
        let config = AppConfig { robots_timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "robots_timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: "  ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_zero_max_length() {
        let config = AppConfig { default_max_length: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "default_max_length"));
    }

    #[test]
    fn test_validate_too_many_redirects() {
        let config = AppConfig { max_redirects: 51, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_redirects"));
    }

    #[test]
    fn test_validate_bad_proxy() {
        let config = AppConfig { proxy_url: Some("not a url".into()), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "proxy_url"));
    }

    #[test]
    fn test_validate_bad_bind_addr() {
        let config = AppConfig { bind_addr: "localhost".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "bind_addr"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            timeout_ms: 100,
            robots_timeout_ms: 300_000,
            default_max_length: 1,
            max_redirects: 0,
            proxy_url: Some("http://127.0.0.1:3128".into()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
