//! Authentication module for the gatehouse server.
//!
//! This module provides:
//! - OIDC authentication against an external identity provider
//! - Signed-cookie session storage
//! - Authentication extractors for Axum routes
//!
//! # Access Model
//!
//! There is a single question: is the visitor authenticated? A session
//! carrying identity claims with a display name answers yes; anything else,
//! including a missing or tampered cookie, answers no.

pub mod middleware;
pub mod oidc;
pub mod routes;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

use crate::config::RouteConfig;

pub use middleware::{AuthRejection, CurrentUser, RequireUser};
pub use oidc::{AuthorizationRequest, IdentityProvider, OidcClient, OidcError};
pub use routes::{callback, login, logout};
pub use session::{SessionKeyError, SessionStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Identity provider used for login and code exchange.
    pub provider: Arc<dyn IdentityProvider>,
    /// Signed-cookie session storage.
    pub sessions: SessionStore,
    /// Mount points for the public and protected pages.
    pub routes: RouteConfig,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        sessions: SessionStore,
        routes: RouteConfig,
    ) -> Self {
        Self {
            provider,
            sessions,
            routes,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.key().clone()
    }
}
