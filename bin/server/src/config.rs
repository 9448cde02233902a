//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables. An optional
//! env file is read into the environment first.
//!
//! See [`OidcConfig`](gatehouse_access::OidcConfig) for the identity
//! provider settings.

use gatehouse_access::OidcConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable naming the env file to load at startup.
pub const ENV_FILE_VAR: &str = "GATEHOUSE_ENV_FILE";

/// Paths owned by the gateway itself; pages cannot be mounted on them.
const RESERVED_PATHS: &[&str] = &["/", "/login", "/auth", "/logout"];

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// OIDC authentication configuration.
    pub oidc: OidcConfig,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Where the public and protected pages are mounted.
    #[serde(default)]
    pub routes: RouteConfig,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the signed session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Lifetime of the session cookie in seconds.
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: i64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true for production safety; set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,

    /// Base64-encoded signing secret (at least 64 bytes once decoded).
    ///
    /// When unset a key is generated at startup, so sessions do not survive
    /// a restart and are not shared between instances.
    #[serde(default)]
    pub secret: Option<String>,
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_max_age_seconds() -> i64 {
    14 * 24 * 60 * 60
}

fn default_secure_cookies() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age_seconds: default_max_age_seconds(),
            secure_cookies: default_secure_cookies(),
            secret: None,
        }
    }
}

/// Mount points for the two page sets.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    /// Page shown to authenticated visitors.
    #[serde(default = "default_protected_path")]
    pub protected_path: String,

    /// Page shown to anonymous visitors.
    #[serde(default = "default_public_path")]
    pub public_path: String,
}

fn default_protected_path() -> String {
    "/app".to_string()
}

fn default_public_path() -> String {
    "/welcome".to_string()
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            protected_path: default_protected_path(),
            public_path: default_public_path(),
        }
    }
}

impl RouteConfig {
    /// Checks that both paths are absolute, distinct, and not claimed by the gateway.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid path.
    pub fn validate(&self) -> Result<(), String> {
        for (name, path) in [
            ("protected_path", &self.protected_path),
            ("public_path", &self.public_path),
        ] {
            if !path.starts_with('/') {
                return Err(format!("routes.{name} '{path}' must start with '/'"));
            }
            if RESERVED_PATHS.contains(&path.as_str()) {
                return Err(format!("routes.{name} '{path}' is reserved by the gateway"));
            }
        }
        if self.protected_path == self.public_path {
            return Err("routes.protected_path and routes.public_path must differ".to_string());
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the server cannot start with.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::Message` naming the offending setting.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.oidc
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        self.routes.validate().map_err(config::ConfigError::Message)?;
        if self.session.cookie_name.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "session.cookie_name must not be empty".to_string(),
            ));
        }
        if self.session.max_age_seconds <= 0 {
            return Err(config::ConfigError::Message(
                "session.max_age_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads the env file named by `GATEHOUSE_ENV_FILE` (default `.env`) into
/// the process environment.
///
/// A missing file is not an error; variables already set take precedence.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_env_file() -> Result<Option<PathBuf>, dotenvy::Error> {
    let path = std::env::var(ENV_FILE_VAR).unwrap_or_else(|_| ".env".to_string());
    match dotenvy::from_filename(&path) {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oidc() -> OidcConfig {
        OidcConfig::new(
            "https://example.okta.com/oauth2/default".to_string(),
            "client-id".to_string(),
            "client-secret".to_string(),
            "http://127.0.0.1:8080/auth".to_string(),
        )
    }

    fn server_config() -> ServerConfig {
        ServerConfig {
            listen_addr: default_listen_addr(),
            oidc: oidc(),
            session: SessionConfig::default(),
            routes: RouteConfig::default(),
        }
    }

    #[test]
    fn session_config_has_correct_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.cookie_name, "session");
        assert_eq!(config.max_age_seconds, 1_209_600);
        assert!(config.secure_cookies);
        assert!(config.secret.is_none());
    }

    #[test]
    fn route_config_has_correct_defaults() {
        let config = RouteConfig::default();
        assert_eq!(config.protected_path, "/app");
        assert_eq!(config.public_path, "/welcome");
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn default_listen_addr_is_local_8080() {
        assert_eq!(default_listen_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn route_config_rejects_relative_path() {
        let config = RouteConfig {
            protected_path: "app".to_string(),
            ..RouteConfig::default()
        };
        let err = config.validate().expect_err("relative path");
        assert!(err.contains("protected_path"));
    }

    #[test]
    fn route_config_rejects_gateway_paths() {
        let config = RouteConfig {
            public_path: "/login".to_string(),
            ..RouteConfig::default()
        };
        let err = config.validate().expect_err("reserved path");
        assert!(err.contains("reserved"));
    }

    #[test]
    fn route_config_rejects_identical_paths() {
        let config = RouteConfig {
            protected_path: "/pages".to_string(),
            public_path: "/pages".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn server_config_validates_oidc_settings() {
        let mut config = server_config();
        assert!(config.validate().is_ok());

        config.oidc = OidcConfig::new(
            "https://example.okta.com".to_string(),
            "client-id".to_string(),
            "".to_string(),
            "http://127.0.0.1:8080/auth".to_string(),
        );
        let err = config.validate().expect_err("missing secret");
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn server_config_rejects_non_positive_max_age() {
        let mut config = server_config();
        config.session.max_age_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn server_config_deserializes_nested_sections() {
        let json = r#"{
            "listen_addr": "0.0.0.0:9000",
            "oidc": {
                "issuer_url": "https://example.okta.com/oauth2/default",
                "client_id": "client-id",
                "client_secret": "client-secret",
                "redirect_uri": "http://127.0.0.1:9000/auth"
            },
            "session": { "secure_cookies": false }
        }"#;

        let config: ServerConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.listen_addr.port(), 9000);
        assert!(!config.session.secure_cookies);
        assert_eq!(config.session.cookie_name, "session");
        assert_eq!(config.routes.protected_path, "/app");
    }
}
