//! Server configuration for the LDP HTTP front end.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LDP_SERVER_PORT` | 8080 | Server port |
//! | `LDP_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `LDP_LOG_LEVEL` | info | Log level |
//! | `LDP_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `LDP_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `LDP_ENABLE_CORS` | true | Enable CORS |
//! | `LDP_CORS_ORIGINS` | * | Allowed origins |
//! | `LDP_CORS_METHODS` | GET,HEAD,OPTIONS,POST,PUT,PATCH,DELETE | Allowed methods |
//! | `LDP_CORS_HEADERS` | Content-Type,Authorization,Accept,Link,Slug,Prefer,If-Match,If-None-Match,If-Modified-Since | Allowed headers |
//! | `LDP_BASE_URL` | http://localhost:8080/rest | IRI of the root container |
//! | `LDP_STORAGE_BACKEND` | sqlite | Storage backend (`sqlite` or `memory`) |
//! | `LDP_DATABASE_URL` | ldp.db | SQLite database path (`:memory:` for in-memory) |
//! | `LDP_AUTH_ENABLED` | false | Require HTTP Basic authentication |
//! | `LDP_USERS` | | Users as `name:password:role`, comma-separated |
//! | `LDP_REQUIRE_MEMBERSHIP_TRIPLES` | false | Reject Direct/Indirect containers without membership triples |
//!
//! # Example
//!
//! ```rust
//! use ldp_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     base_url: "http://example.org/ldp".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.mount_path(), "/ldp");
//! ```

use std::fmt;
use std::str::FromStr;

use clap::Parser;
use url::Url;

use crate::auth::StaticUserProvider;

/// Which storage backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackendMode {
    /// SQLite database (file or `:memory:`).
    #[default]
    Sqlite,
    /// Process-local map, lost on shutdown.
    Memory,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Sqlite => write!(f, "sqlite"),
            StorageBackendMode::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageBackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackendMode::Sqlite),
            "memory" | "in-memory" => Ok(StorageBackendMode::Memory),
            other => Err(format!(
                "unknown storage backend '{}' (expected sqlite or memory)",
                other
            )),
        }
    }
}

/// Server configuration for the LDP HTTP front end.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "ldp-server")]
#[command(about = "Linked Data Platform resource server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "LDP_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "LDP_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "LDP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "LDP_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "LDP_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "LDP_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "LDP_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "LDP_CORS_METHODS",
        default_value = "GET,HEAD,OPTIONS,POST,PUT,PATCH,DELETE"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "LDP_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept,Link,Slug,Prefer,If-Match,If-None-Match,If-Modified-Since"
    )]
    pub cors_headers: String,

    /// IRI of the root container. Its path is where resources are served,
    /// and every resource IRI is built from it.
    #[arg(long, env = "LDP_BASE_URL", default_value = "http://localhost:8080/rest")]
    pub base_url: String,

    /// Storage backend (sqlite or memory).
    #[arg(long, env = "LDP_STORAGE_BACKEND", default_value = "sqlite")]
    pub storage_backend: String,

    /// SQLite database path.
    #[arg(long, env = "LDP_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Require HTTP Basic authentication.
    #[arg(long, env = "LDP_AUTH_ENABLED", default_value = "false")]
    pub auth_enabled: bool,

    /// Users as `name:password:role`, comma-separated.
    #[arg(long, env = "LDP_USERS", default_value = "")]
    pub users: String,

    /// Reject Direct and Indirect containers that do not assert their
    /// membership triples instead of applying the LDP defaults.
    #[arg(long, env = "LDP_REQUIRE_MEMBERSHIP_TRIPLES", default_value = "false")]
    pub require_membership_triples: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,HEAD,OPTIONS,POST,PUT,PATCH,DELETE".to_string(),
            cors_headers: "Content-Type,Authorization,Accept,Link,Slug,Prefer,If-Match,If-None-Match,If-Modified-Since".to_string(),
            base_url: "http://localhost:8080/rest".to_string(),
            storage_backend: "sqlite".to_string(),
            database_url: None,
            auth_enabled: false,
            users: String::new(),
            require_membership_triples: false,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the root container IRI without a trailing slash.
    pub fn base_iri(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Returns the URL path resources are served under, without a trailing
    /// slash. The empty string means resources are served from `/`.
    pub fn mount_path(&self) -> String {
        match Url::parse(&self.base_url) {
            Ok(url) => url.path().trim_end_matches('/').to_string(),
            Err(_) => String::new(),
        }
    }

    /// Returns the parsed storage backend.
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, String> {
        self.storage_backend.parse()
    }

    /// Returns the SQLite database path.
    pub fn database_path(&self) -> &str {
        self.database_url.as_deref().unwrap_or("ldp.db")
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        match Url::parse(&self.base_url) {
            Ok(url) => {
                if url.query().is_some() || url.fragment().is_some() {
                    errors.push("Base URL cannot have a query or fragment".to_string());
                }
            }
            Err(e) => errors.push(format!("Invalid base URL '{}': {}", self.base_url, e)),
        }

        if let Err(e) = self.storage_backend_mode() {
            errors.push(e);
        }

        match StaticUserProvider::parse(&self.users) {
            Ok(provider) => {
                if self.auth_enabled && provider.is_empty() {
                    errors.push("Authentication is enabled but no users are configured".to_string());
                }
            }
            Err(e) => errors.push(e),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables features that might interfere
    /// with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost/rest".to_string(),
            storage_backend: "memory".to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.enable_cors);
        assert!(!config.auth_enabled);
        assert_eq!(config.database_path(), "ldp.db");
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_mount_path() {
        let mut config = ServerConfig::default();
        assert_eq!(config.mount_path(), "/rest");
        assert_eq!(config.base_iri(), "http://localhost:8080/rest");

        config.base_url = "http://localhost:8080/".to_string();
        assert_eq!(config.mount_path(), "");
        assert_eq!(config.base_iri(), "http://localhost:8080");

        config.base_url = "https://example.org/a/b/".to_string();
        assert_eq!(config.mount_path(), "/a/b");
    }

    #[test]
    fn test_validate_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().iter().any(|e| e.contains("Port")));
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let config = ServerConfig {
            base_url: "not a url".to_string(),
            storage_backend: "postgres".to_string(),
            auth_enabled: true,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validate_users() {
        let config = ServerConfig {
            auth_enabled: true,
            users: "alice:secret:writer,bob".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            users: "alice:secret:writer".to_string(),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_backend_mode() {
        assert_eq!(
            "MEMORY".parse::<StorageBackendMode>(),
            Ok(StorageBackendMode::Memory)
        );
        assert_eq!(StorageBackendMode::Sqlite.to_string(), "sqlite");
        assert!("mongodb".parse::<StorageBackendMode>().is_err());
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
        assert_eq!(
            config.storage_backend_mode(),
            Ok(StorageBackendMode::Memory)
        );
    }
}
