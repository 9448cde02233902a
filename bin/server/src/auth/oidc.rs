//! OIDC client implementation using the openidconnect crate.
//!
//! The gateway talks to the provider through the [`IdentityProvider`] trait
//! so that handlers can be exercised without a live provider. [`OidcClient`]
//! is the production implementation: endpoints are derived from the issuer
//! URL and the signing keys are fetched once when the client is built.

use async_trait::async_trait;
use gatehouse_access::{AuthenticationError, IdentityClaims, OidcConfig, PendingAuthorization};
use openidconnect::core::{CoreAuthenticationFlow, CoreClient, CoreJsonWebKeySet};
use openidconnect::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, JsonWebKeySetUrl,
    Nonce, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};

/// Where to send the visitor, and what to remember until they come back.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// The provider's authorization URL with all query parameters.
    pub url: String,
    /// State to keep in the session for the callback.
    pub pending: PendingAuthorization,
}

/// An OpenID Connect provider able to run the authorization-code flow.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Builds the authorization URL and fresh anti-forgery state.
    fn authorization_request(&self) -> AuthorizationRequest;

    /// Exchanges an authorization code for verified identity claims.
    async fn exchange_code(
        &self,
        code: &str,
        pending: &PendingAuthorization,
    ) -> Result<IdentityClaims, AuthenticationError>;
}

/// OIDC client for authenticating users.
pub struct OidcClient {
    issuer_url: IssuerUrl,
    client_id: ClientId,
    client_secret: ClientSecret,
    auth_url: AuthUrl,
    token_url: TokenUrl,
    redirect_url: RedirectUrl,
    scopes: Vec<Scope>,
    jwks: CoreJsonWebKeySet,
    http_client: reqwest::Client,
}

impl OidcClient {
    /// Creates a new OIDC client, fetching the provider's signing keys.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured value is invalid or the key set
    /// cannot be retrieved.
    pub async fn connect(config: &OidcConfig) -> Result<Self, OidcError> {
        config
            .validate()
            .map_err(|e| OidcError::Configuration(e.to_string()))?;

        let jwks_url = JsonWebKeySetUrl::new(config.jwks_url())
            .map_err(|e| OidcError::Configuration(format!("invalid key set URL: {}", e)))?;
        let http_client = build_http_client()?;

        let jwks = CoreJsonWebKeySet::fetch_async(&jwks_url, &http_client)
            .await
            .map_err(|e| OidcError::KeySet(format!("failed to fetch {}: {}", jwks_url.as_str(), e)))?;

        tracing::info!(
            jwks_url = %jwks_url.as_str(),
            keys = jwks.keys().len(),
            "Fetched provider signing keys"
        );

        Self::build(config, jwks, http_client)
    }

    /// Creates a client from an already known key set.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured value is invalid.
    pub fn with_key_set(config: &OidcConfig, jwks: CoreJsonWebKeySet) -> Result<Self, OidcError> {
        config
            .validate()
            .map_err(|e| OidcError::Configuration(e.to_string()))?;
        Self::build(config, jwks, build_http_client()?)
    }

    fn build(
        config: &OidcConfig,
        jwks: CoreJsonWebKeySet,
        http_client: reqwest::Client,
    ) -> Result<Self, OidcError> {
        let issuer_url = IssuerUrl::new(config.issuer_url().to_string())
            .map_err(|e| OidcError::Configuration(format!("invalid issuer URL: {}", e)))?;
        let auth_url = AuthUrl::new(config.authorize_url()).map_err(|e| {
            OidcError::Configuration(format!("invalid authorization URL: {}", e))
        })?;
        let token_url = TokenUrl::new(config.token_url())
            .map_err(|e| OidcError::Configuration(format!("invalid token URL: {}", e)))?;
        let redirect_url = RedirectUrl::new(config.redirect_uri().to_string())
            .map_err(|e| OidcError::Configuration(format!("invalid redirect URI: {}", e)))?;

        Ok(Self {
            issuer_url,
            client_id: ClientId::new(config.client_id().to_string()),
            client_secret: ClientSecret::new(config.client_secret().to_string()),
            auth_url,
            token_url,
            redirect_url,
            scopes: config
                .scopes()
                .into_iter()
                .map(|scope| Scope::new(scope.to_string()))
                .collect(),
            jwks,
            http_client,
        })
    }
}

fn build_http_client() -> Result<reqwest::Client, OidcError> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| OidcError::Configuration(format!("failed to create HTTP client: {}", e)))
}

#[async_trait]
impl IdentityProvider for OidcClient {
    fn authorization_request(&self) -> AuthorizationRequest {
        let client = CoreClient::new(
            self.client_id.clone(),
            self.issuer_url.clone(),
            self.jwks.clone(),
        )
        .set_client_secret(self.client_secret.clone())
        .set_auth_uri(self.auth_url.clone())
        .set_token_uri(self.token_url.clone())
        .set_redirect_uri(self.redirect_url.clone());

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .set_pkce_challenge(pkce_challenge);

        // `openid` is always sent by `authorize_url`.
        for scope in self.scopes.iter().filter(|s| s.as_str() != "openid") {
            auth_request = auth_request.add_scope(scope.clone());
        }

        let (auth_url, csrf_token, nonce) = auth_request.url();

        AuthorizationRequest {
            url: auth_url.to_string(),
            pending: PendingAuthorization::new(
                csrf_token.secret().clone(),
                pkce_verifier.secret().clone(),
                nonce.secret().clone(),
            ),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        pending: &PendingAuthorization,
    ) -> Result<IdentityClaims, AuthenticationError> {
        let client = CoreClient::new(
            self.client_id.clone(),
            self.issuer_url.clone(),
            self.jwks.clone(),
        )
        .set_client_secret(self.client_secret.clone())
        .set_auth_uri(self.auth_url.clone())
        .set_token_uri(self.token_url.clone())
        .set_redirect_uri(self.redirect_url.clone());

        let token_response = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pending.pkce_verifier().to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| AuthenticationError::TokenExchange {
                reason: e.to_string(),
            })?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| AuthenticationError::InvalidToken {
                reason: "no ID token in response".to_string(),
            })?;

        // Signature, issuer, audience, expiry and nonce are all checked here
        let nonce = Nonce::new(pending.nonce().to_string());
        let claims = id_token
            .claims(&client.id_token_verifier(), &nonce)
            .map_err(|e| AuthenticationError::InvalidToken {
                reason: e.to_string(),
            })?;

        let name = claims
            .name()
            .and_then(|n| n.get(None))
            .map(|n| n.as_str().to_string())
            .or_else(|| claims.preferred_username().map(|u| u.as_str().to_string()))
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AuthenticationError::MissingClaim {
                claim: "name".to_string(),
            })?;

        Ok(IdentityClaims::new(
            claims.subject().as_str().to_string(),
            claims.issuer().as_str().to_string(),
            name,
        )
        .with_email(claims.email().map(|e| e.as_str().to_string())))
    }
}

/// OIDC-related errors.
#[derive(Debug)]
pub enum OidcError {
    /// Configuration error (invalid URLs, etc.)
    Configuration(String),
    /// Failed to fetch the provider's JSON Web Key Set.
    KeySet(String),
}

impl std::fmt::Display for OidcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "OIDC configuration error: {}", msg),
            Self::KeySet(msg) => write!(f, "OIDC key set error: {}", msg),
        }
    }
}

impl std::error::Error for OidcError {}
