//! OIDC (OpenID Connect) client configuration.
//!
//! The provider's endpoints are derived from the issuer URL rather than
//! discovered, so the paths are configurable for providers whose layout
//! differs from the defaults (`/v1/authorize`, `/v1/token`, `/v1/keys`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for the OIDC identity provider.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// The OIDC issuer URL (e.g., "https://example.okta.com/oauth2/default").
    issuer_url: String,
    /// The OAuth2 client ID registered with the provider.
    client_id: String,
    /// The OAuth2 client secret.
    client_secret: String,
    /// The redirect URI for the OAuth2 callback (e.g., "http://127.0.0.1:8080/auth").
    redirect_uri: String,
    /// OAuth2 scopes to request as a comma-separated string.
    /// Default: "openid,email,profile"
    #[serde(default = "default_scopes")]
    scopes: String,
    /// Authorization endpoint path, relative to the issuer.
    #[serde(default = "default_authorize_path")]
    authorize_path: String,
    /// Token endpoint path, relative to the issuer.
    #[serde(default = "default_token_path")]
    token_path: String,
    /// JSON Web Key Set path, relative to the issuer.
    #[serde(default = "default_jwks_path")]
    jwks_path: String,
}

fn default_scopes() -> String {
    "openid,email,profile".to_string()
}

fn default_authorize_path() -> String {
    "/v1/authorize".to_string()
}

fn default_token_path() -> String {
    "/v1/token".to_string()
}

fn default_jwks_path() -> String {
    "/v1/keys".to_string()
}

impl OidcConfig {
    /// Creates a new OIDC configuration with defaults for optional fields.
    #[must_use]
    pub fn new(
        issuer_url: String,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Self {
        Self {
            issuer_url,
            client_id,
            client_secret,
            redirect_uri,
            scopes: default_scopes(),
            authorize_path: default_authorize_path(),
            token_path: default_token_path(),
            jwks_path: default_jwks_path(),
        }
    }

    /// Returns the OIDC issuer URL.
    #[must_use]
    pub fn issuer_url(&self) -> &str {
        &self.issuer_url
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the OAuth2 redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the OAuth2 scopes to request, parsed from comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns the authorization endpoint URL.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        self.endpoint(&self.authorize_path)
    }

    /// Returns the token endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> String {
        self.endpoint(&self.token_path)
    }

    /// Returns the JSON Web Key Set URL.
    #[must_use]
    pub fn jwks_url(&self) -> String {
        self.endpoint(&self.jwks_path)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.issuer_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Checks that every required value is present and plausible.
    ///
    /// URL syntax is checked again when the client is built; this catches
    /// the common mistakes (unset variables, missing scheme) with a clear
    /// field name.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), InvalidOidcConfig> {
        require_url("issuer_url", &self.issuer_url)?;
        require_value("client_id", &self.client_id)?;
        require_value("client_secret", &self.client_secret)?;
        require_url("redirect_uri", &self.redirect_uri)?;

        if !self.scopes().contains(&"openid") {
            return Err(InvalidOidcConfig {
                field: "scopes",
                reason: "must include \"openid\"",
            });
        }
        Ok(())
    }
}

fn require_value(field: &'static str, value: &str) -> Result<(), InvalidOidcConfig> {
    if value.trim().is_empty() {
        return Err(InvalidOidcConfig {
            field,
            reason: "must not be empty",
        });
    }
    Ok(())
}

fn require_url(field: &'static str, value: &str) -> Result<(), InvalidOidcConfig> {
    require_value(field, value)?;
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        return Err(InvalidOidcConfig {
            field,
            reason: "must be an http(s) URL",
        });
    }
    Ok(())
}

/// A configuration value that cannot be used to build a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOidcConfig {
    /// The offending field.
    pub field: &'static str,
    /// Why it was rejected.
    pub reason: &'static str,
}

impl fmt::Display for InvalidOidcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid OIDC setting '{}': {}", self.field, self.reason)
    }
}

impl std::error::Error for InvalidOidcConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OidcConfig {
        OidcConfig::new(
            "https://example.okta.com/oauth2/default".to_string(),
            "client-id".to_string(),
            "client-secret".to_string(),
            "http://127.0.0.1:8080/auth".to_string(),
        )
    }

    #[test]
    fn new_config_has_defaults() {
        let config = config();

        assert_eq!(config.issuer_url(), "https://example.okta.com/oauth2/default");
        assert_eq!(config.client_id(), "client-id");
        assert_eq!(config.client_secret(), "client-secret");
        assert_eq!(config.redirect_uri(), "http://127.0.0.1:8080/auth");
        assert_eq!(config.scopes(), vec!["openid", "email", "profile"]);
    }

    #[test]
    fn endpoints_derive_from_issuer() {
        let config = config();

        assert_eq!(
            config.authorize_url(),
            "https://example.okta.com/oauth2/default/v1/authorize"
        );
        assert_eq!(
            config.token_url(),
            "https://example.okta.com/oauth2/default/v1/token"
        );
        assert_eq!(
            config.jwks_url(),
            "https://example.okta.com/oauth2/default/v1/keys"
        );
    }

    #[test]
    fn endpoints_tolerate_trailing_slash_on_issuer() {
        let json = r#"{
            "issuer_url": "https://auth.example.com/realms/main/",
            "client_id": "client-id",
            "client_secret": "client-secret",
            "redirect_uri": "https://app.example.com/auth",
            "authorize_path": "protocol/openid-connect/auth",
            "token_path": "/protocol/openid-connect/token",
            "jwks_path": "/protocol/openid-connect/certs"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(
            config.authorize_url(),
            "https://auth.example.com/realms/main/protocol/openid-connect/auth"
        );
        assert_eq!(
            config.token_url(),
            "https://auth.example.com/realms/main/protocol/openid-connect/token"
        );
        assert_eq!(
            config.jwks_url(),
            "https://auth.example.com/realms/main/protocol/openid-connect/certs"
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let json = r#"{
            "issuer_url": "https://auth.example.com",
            "client_id": "my-client",
            "client_secret": "secret",
            "redirect_uri": "https://app.example.com/auth"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.client_id(), "my-client");
        assert_eq!(config.scopes(), vec!["openid", "email", "profile"]);
        assert_eq!(config.token_url(), "https://auth.example.com/v1/token");
    }

    #[test]
    fn scopes_parses_comma_separated() {
        let json = r#"{
            "issuer_url": "https://auth.example.com",
            "client_id": "my-client",
            "client_secret": "secret",
            "redirect_uri": "https://app.example.com/auth",
            "scopes": "openid, email, profile, "
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.scopes(), vec!["openid", "email", "profile"]);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn empty_client_id_fails_validation() {
        let config = OidcConfig::new(
            "https://auth.example.com".to_string(),
            "".to_string(),
            "secret".to_string(),
            "https://app.example.com/auth".to_string(),
        );

        let err = config.validate().expect_err("empty client id");
        assert_eq!(err.field, "client_id");
    }

    #[test]
    fn issuer_without_scheme_fails_validation() {
        let config = OidcConfig::new(
            "auth.example.com".to_string(),
            "client-id".to_string(),
            "secret".to_string(),
            "https://app.example.com/auth".to_string(),
        );

        let err = config.validate().expect_err("issuer without scheme");
        assert_eq!(err.field, "issuer_url");
        assert!(err.to_string().contains("http(s) URL"));
    }

    #[test]
    fn scopes_without_openid_fail_validation() {
        let json = r#"{
            "issuer_url": "https://auth.example.com",
            "client_id": "client-id",
            "client_secret": "secret",
            "redirect_uri": "https://app.example.com/auth",
            "scopes": "email"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        let err = config.validate().expect_err("no openid scope");
        assert_eq!(err.field, "scopes");
    }
}
