//! The per-visitor session record.
//!
//! The session travels inside a signed cookie, so it only holds what the
//! gateway needs: the authenticated identity and, while a login is in
//! flight, the data required to complete it.

use serde::{Deserialize, Serialize};

use crate::auth::{IdentityClaims, PendingAuthorization};
use crate::error::AuthenticationError;

/// Session state for one visitor.
///
/// Either `user` is absent (anonymous) or it holds claims with a displayable
/// name (authenticated).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identity of the authenticated visitor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<IdentityClaims>,
    /// Login started at `/login` and not yet completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending: Option<PendingAuthorization>,
}

impl Session {
    /// Creates an empty (anonymous) session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored identity claims, if authenticated.
    #[must_use]
    pub fn user(&self) -> Option<&IdentityClaims> {
        self.user.as_ref().filter(|user| user.has_display_name())
    }

    /// Returns the display name of the authenticated visitor.
    ///
    /// This is the gateway's single authorization predicate.
    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        self.user().map(|user| user.name.as_str())
    }

    /// Stores the claims from a completed login, replacing any earlier identity.
    ///
    /// # Errors
    ///
    /// Returns `MissingClaim` if the claims have no displayable name; the
    /// session is left unchanged in that case.
    pub fn set_user(&mut self, claims: IdentityClaims) -> Result<(), AuthenticationError> {
        if !claims.has_display_name() {
            return Err(AuthenticationError::MissingClaim {
                claim: "name".to_string(),
            });
        }
        self.user = Some(claims);
        Ok(())
    }

    /// Removes the identity, returning it if one was present.
    pub fn clear_user(&mut self) -> Option<IdentityClaims> {
        self.user.take()
    }

    /// Records a login in flight, replacing any earlier one.
    pub fn begin_login(&mut self, pending: PendingAuthorization) {
        self.pending = Some(pending);
    }

    /// Returns the login in flight without consuming it.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingAuthorization> {
        self.pending.as_ref()
    }

    /// Removes and returns the login in flight.
    ///
    /// Pending data is single-use: a callback consumes it whether or not the
    /// exchange succeeds.
    pub fn take_pending(&mut self) -> Option<PendingAuthorization> {
        self.pending.take()
    }

    /// Returns true if there is nothing worth keeping in the cookie.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.pending.is_none()
    }
}
