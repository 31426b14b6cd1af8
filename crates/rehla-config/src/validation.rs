//! Configuration validation.
//!
//! Collects every problem in one pass so a misconfigured deployment fails at
//! startup with the full list.

use crate::AppConfig;
use std::fmt;
use std::path::Path;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Web and dashboard listen on the same address.
    PortConflict { port: u16 },
    /// Redis is enabled but has no URL.
    MissingRedisUrl,
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String },
    /// Configured snapshot file does not exist.
    MissingDataFile { path: String },
    /// Cookie name is empty.
    EmptyCookieName { name: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::PortConflict { port } => {
                write!(f, "Web and dashboard cannot both listen on port {}", port)
            }
            Self::MissingRedisUrl => write!(f, "Redis URL is required when redis is enabled"),
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveTimeout { name } => {
                write!(f, "Timeout '{}' must be positive", name)
            }
            Self::MissingDataFile { path } => {
                write!(f, "Store data file does not exist: {}", path)
            }
            Self::EmptyCookieName { name } => write!(f, "Cookie name '{}' cannot be empty", name),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(config, &mut errors);
        Self::validate_redis(config, &mut errors);
        Self::validate_store(config, &mut errors);
        Self::validate_urls(config, &mut errors);
        Self::validate_session(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let server = &config.server;
        for (name, value) in [("web_port", server.web_port), ("dashboard_port", server.dashboard_port)] {
            if value == 0 {
                errors.push(ConfigValidationError::InvalidPort {
                    name: name.to_string(),
                    value,
                });
            }
        }

        if server.web_host == server.dashboard_host && server.web_port == server.dashboard_port {
            errors.push(ConfigValidationError::PortConflict {
                port: server.web_port,
            });
        }

        if server.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "server.request_timeout_secs".to_string(),
            });
        }
    }

    fn validate_redis(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let redis = &config.redis;
        if !redis.enabled {
            return;
        }

        if redis.url.trim().is_empty() {
            errors.push(ConfigValidationError::MissingRedisUrl);
        } else if !redis.url.starts_with("redis://") && !redis.url.starts_with("rediss://") {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            });
        }

        if redis.op_timeout_ms == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "redis.op_timeout_ms".to_string(),
            });
        }
    }

    fn validate_store(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        if let Some(ref path) = config.store.data_file {
            if !Path::new(path).exists() {
                errors.push(ConfigValidationError::MissingDataFile { path: path.clone() });
            }
        }
    }

    fn validate_urls(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        for (url_type, value) in [
            ("storage.public_base_url", &config.storage.public_base_url),
            ("video.api_base_url", &config.video.api_base_url),
        ] {
            if let Err(e) = Url::parse(value) {
                errors.push(ConfigValidationError::InvalidUrl {
                    url_type: url_type.to_string(),
                    message: format!("{}: {}", value, e),
                });
            }
        }
    }

    fn validate_session(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let session = &config.session;
        for (name, value) in [
            ("session.web_cookie", &session.web_cookie),
            ("session.dashboard_cookie", &session.dashboard_cookie),
        ] {
            if value.trim().is_empty() {
                errors.push(ConfigValidationError::EmptyCookieName {
                    name: name.to_string(),
                });
            }
        }
        if session.lifetime_hours == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "session.lifetime_hours".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_redis_url_rejected_only_when_enabled() {
        let mut config = AppConfig::default();
        config.redis.url = String::new();
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors, vec![ConfigValidationError::MissingRedisUrl]);

        config.redis.enabled = false;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let mut config = AppConfig::default();
        config.server.request_timeout_secs = 0;
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigValidationError::NonPositiveTimeout {
            name: "server.request_timeout_secs".to_string(),
        }));
    }

    #[test]
    fn test_missing_data_file_rejected() {
        let mut config = AppConfig::default();
        config.store.data_file = Some("/definitely/not/here.json".to_string());
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(errors[0], ConfigValidationError::MissingDataFile { .. }));
    }

    #[test]
    fn test_port_conflict() {
        let mut config = AppConfig::default();
        config.server.dashboard_port = config.server.web_port;
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors, vec![ConfigValidationError::PortConflict { port: 4000 }]);
    }
}
