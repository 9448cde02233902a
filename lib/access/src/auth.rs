//! Types exchanged during the authorization-code round trip.
//!
//! - `PendingAuthorization`: issued at login, kept in the session until the
//!   provider redirects back
//! - `CallbackParams`: the provider's redirect parameters
//! - `IdentityClaims`: what a successful exchange yields

use serde::{Deserialize, Serialize};

use crate::error::AuthenticationError;

/// Claims extracted from a verified OIDC ID token.
///
/// Only the claims the gateway depends on are kept; anything else the
/// provider sends is dropped at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// The subject claim (unique user identifier from the provider).
    #[serde(rename = "sub")]
    pub subject: String,
    /// The issuer URL.
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Display name (from `name`, falling back to `preferred_username`).
    pub name: String,
    /// Email address (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl IdentityClaims {
    /// Creates a new set of identity claims.
    #[must_use]
    pub fn new(subject: String, issuer: String, name: String) -> Self {
        Self {
            subject,
            issuer,
            name,
            email: None,
        }
    }

    /// Sets the email claim.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Returns true if the claims carry a name that can be shown to the visitor.
    #[must_use]
    pub fn has_display_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Login state issued at `/login` and checked at the callback.
///
/// Holds the anti-forgery `state` value, the PKCE code verifier and the
/// ID token nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    csrf_token: String,
    pkce_verifier: String,
    nonce: String,
}

impl PendingAuthorization {
    /// Creates pending authorization data.
    #[must_use]
    pub fn new(csrf_token: String, pkce_verifier: String, nonce: String) -> Self {
        Self {
            csrf_token,
            pkce_verifier,
            nonce,
        }
    }

    /// Returns the anti-forgery state value sent to the provider.
    #[must_use]
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Returns the PKCE code verifier.
    #[must_use]
    pub fn pkce_verifier(&self) -> &str {
        &self.pkce_verifier
    }

    /// Returns the nonce expected in the ID token.
    #[must_use]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }
}

/// Query parameters the provider appends to the redirect URI.
///
/// Every field is optional so that a malformed callback is still routed
/// through the handler and ends in a redirect rather than a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    /// The authorization code.
    pub code: Option<String>,
    /// The state parameter (must match the one from login initiation).
    pub state: Option<String>,
    /// Error code when the provider denied the request.
    pub error: Option<String>,
    /// Human-readable detail accompanying `error`.
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Validates the callback against the login that was started and returns
    /// the authorization code to exchange.
    ///
    /// # Errors
    ///
    /// Fails if the provider reported an error, no login is pending, the
    /// state is missing or does not match, or no code was delivered.
    pub fn authorization_code(
        &self,
        pending: Option<&PendingAuthorization>,
    ) -> Result<&str, AuthenticationError> {
        if let Some(error) = &self.error {
            return Err(AuthenticationError::ProviderDenied {
                error: error.clone(),
                description: self.error_description.clone(),
            });
        }

        let pending = pending.ok_or(AuthenticationError::NoPendingLogin)?;
        let state = self
            .state
            .as_deref()
            .ok_or(AuthenticationError::MissingState)?;

        if state != pending.csrf_token() {
            return Err(AuthenticationError::StateMismatch);
        }

        match self.code.as_deref() {
            Some(code) if !code.is_empty() => Ok(code),
            _ => Err(AuthenticationError::MissingCode),
        }
    }
}
