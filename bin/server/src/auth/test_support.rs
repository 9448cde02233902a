//! Test doubles for the identity provider.

use async_trait::async_trait;
use axum_extra::extract::cookie::Key;
use gatehouse_access::{AuthenticationError, IdentityClaims, OidcConfig, PendingAuthorization};
use openidconnect::core::CoreJsonWebKeySet;
use std::sync::{Arc, Mutex};

use super::oidc::{AuthorizationRequest, IdentityProvider, OidcClient};
use super::session::SessionStore;
use super::AppState;
use crate::config::{RouteConfig, SessionConfig};

pub const CLIENT_ID: &str = "test-client";
pub const REDIRECT_URI: &str = "http://127.0.0.1:8080/auth";

pub fn oidc_config() -> OidcConfig {
    OidcConfig::new(
        "https://idp.example.com/oauth2/default".to_string(),
        CLIENT_ID.to_string(),
        "test-secret".to_string(),
        REDIRECT_URI.to_string(),
    )
}

pub fn alice() -> IdentityClaims {
    IdentityClaims::new(
        "00u1alice".to_string(),
        "https://idp.example.com/oauth2/default".to_string(),
        "Alice Example".to_string(),
    )
    .with_email(Some("alice@example.com".to_string()))
}

/// Builds real authorization URLs but answers code exchanges with a canned outcome.
pub struct FakeProvider {
    urls: OidcClient,
    outcome: Result<IdentityClaims, AuthenticationError>,
    exchanged: Mutex<Vec<(String, PendingAuthorization)>>,
}

impl FakeProvider {
    pub fn new(outcome: Result<IdentityClaims, AuthenticationError>) -> Self {
        let urls = OidcClient::with_key_set(&oidc_config(), CoreJsonWebKeySet::new(Vec::new()))
            .expect("valid test config");
        Self {
            urls,
            outcome,
            exchanged: Mutex::new(Vec::new()),
        }
    }

    pub fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged
            .lock()
            .expect("lock")
            .iter()
            .map(|(code, _)| code.clone())
            .collect()
    }

    /// The pending authorization handed over with the most recent exchange.
    pub fn last_exchanged_pending(&self) -> Option<PendingAuthorization> {
        self.exchanged
            .lock()
            .expect("lock")
            .last()
            .map(|(_, pending)| pending.clone())
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn authorization_request(&self) -> AuthorizationRequest {
        self.urls.authorization_request()
    }

    async fn exchange_code(
        &self,
        code: &str,
        pending: &PendingAuthorization,
    ) -> Result<IdentityClaims, AuthenticationError> {
        self.exchanged
            .lock()
            .expect("lock")
            .push((code.to_string(), pending.clone()));
        self.outcome.clone()
    }
}

pub fn app_state(provider: Arc<FakeProvider>) -> AppState {
    let config = SessionConfig {
        secure_cookies: false,
        ..SessionConfig::default()
    };
    AppState::new(
        provider,
        SessionStore::with_key(Key::generate(), &config),
        RouteConfig::default(),
    )
}
