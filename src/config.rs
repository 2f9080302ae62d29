//! Runtime configuration: defaults overridden by `CABIN_*` environment
//! variables. Secrets are injected into the services that need them
//! rather than read from a global.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 1717;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub security: SecurityConfig,
    pub limits: LimitConfig,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct LimitConfig {
    /// Upper bound for CSV import request bodies.
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("."),
            security: SecurityConfig {
                jwt_secret: "cabin-insecure-dev-secret".to_string(),
                session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            },
            limits: LimitConfig {
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variable overrides to this configuration
    fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = env::var("CABIN_PORT").or_else(|_| env::var("PORT")) {
            self.port = port.parse().unwrap_or(self.port);
        }
        if let Ok(dir) = env::var("CABIN_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(secret) = env::var("CABIN_JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Ok(hours) = env::var("CABIN_SESSION_TTL_HOURS") {
            self.security.session_ttl_hours = hours.parse().unwrap_or(self.security.session_ttl_hours);
        }
        if let Ok(bytes) = env::var("CABIN_MAX_UPLOAD_BYTES") {
            self.limits.max_upload_bytes = bytes.parse().unwrap_or(self.limits.max_upload_bytes);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.port, 1717);
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.security.session_ttl_hours, 24);
        assert_eq!(config.limits.max_upload_bytes, 10 * 1024 * 1024);
        assert!(!config.security.jwt_secret.is_empty());
    }
}
