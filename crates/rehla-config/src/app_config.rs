//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration shared by both backends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Listener configuration for the web site and the dashboard.
    #[serde(default)]
    pub server: ServerConfig,

    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Authoritative document store configuration.
    #[serde(default)]
    pub store: StoreConfig,

    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Video host configuration.
    #[serde(default)]
    pub video: VideoConfig,

    /// Session cookie configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Dashboard configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "rehla".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

impl AppMetadata {
    /// Returns true in production.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Public web site host.
    pub web_host: String,
    /// Public web site port.
    pub web_port: u16,
    /// Dashboard host.
    pub dashboard_host: String,
    /// Dashboard port.
    pub dashboard_port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes (uploads included).
    pub max_body_size: usize,
    /// Mark session cookies `Secure`.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            web_host: "0.0.0.0".to_string(),
            web_port: 4000,
            dashboard_host: "0.0.0.0".to_string(),
            dashboard_port: 4001,
            request_timeout_secs: 30,
            max_body_size: 32 * 1024 * 1024, // 32MB
            secure_cookies: false,
        }
    }
}

impl ServerConfig {
    /// Returns the web site address.
    #[must_use]
    pub fn web_addr(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }

    /// Returns the dashboard address.
    #[must_use]
    pub fn dashboard_addr(&self) -> String {
        format!("{}:{}", self.dashboard_host, self.dashboard_port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Enable Redis. When disabled an in-process cache is used.
    pub enabled: bool,
    /// Redis URL.
    pub url: String,
    /// Connection pool size.
    pub pool_size: usize,
    /// Upper bound for a single cache call in milliseconds.
    pub op_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "redis://localhost:6379".to_string(),
            pool_size: 16,
            op_timeout_ms: 500,
        }
    }
}

impl RedisConfig {
    /// Returns the per-operation timeout as a Duration.
    #[must_use]
    pub const fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON snapshot loaded into the store at startup.
    pub data_file: Option<String>,
}

/// Object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket name.
    pub bucket: String,
    /// Base URL that signed and public URLs are built on.
    pub public_base_url: String,
    /// Lifetime of signed URLs in seconds.
    pub signed_url_ttl_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: "rehla".to_string(),
            public_base_url: "http://localhost:4000/files".to_string(),
            signed_url_ttl_secs: 15 * 60,
        }
    }
}

impl StorageConfig {
    /// Returns the signed URL lifetime as a Duration.
    #[must_use]
    pub const fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }
}

/// Video host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// API base URL.
    pub api_base_url: String,
    /// API token. Without it no video folders are created.
    pub api_token: Option<String>,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.wistia.com/v1".to_string(),
            api_token: None,
            timeout_secs: 10,
        }
    }
}

impl VideoConfig {
    /// Returns the HTTP timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie carrying the web session token.
    pub web_cookie: String,
    /// Cookie carrying the dashboard session token.
    pub dashboard_cookie: String,
    /// Session lifetime in hours, applied to the cookie and the session cache entry.
    pub lifetime_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            web_cookie: "session_id".to_string(),
            dashboard_cookie: "dashboard_session_id".to_string(),
            lifetime_hours: 24,
        }
    }
}

impl SessionConfig {
    /// Returns the session lifetime as a Duration.
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_hours * 60 * 60)
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Username of the admin created when no staff account exists.
    pub admin_username: String,
    /// Password of that admin. Without it no admin is created.
    pub admin_password: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directives used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Emit JSON log lines.
    pub json_logs: bool,
    /// Enable metrics.
    pub metrics_enabled: bool,
    /// Metrics endpoint path.
    pub metrics_path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "info,rehla=debug,tower_http=debug".to_string(),
            json_logs: false,
            metrics_enabled: true,
            metrics_path: "/debug/metrics".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        let config = ServerConfig::default();
        assert_eq!(config.web_addr(), "0.0.0.0:4000");
        assert_eq!(config.dashboard_addr(), "0.0.0.0:4001");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_session_lifetime_is_one_day() {
        assert_eq!(SessionConfig::default().lifetime(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"redis": {"enabled": false}}"#).unwrap();
        assert!(!config.redis.enabled);
        assert_eq!(config.redis.op_timeout(), Duration::from_millis(500));
        assert_eq!(config.session.lifetime_hours, 24);
    }
}
