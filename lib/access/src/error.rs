//! Error types for the access crate.
//!
//! `AuthenticationError` covers every way a login round trip can fail. The
//! gateway never surfaces these to the visitor; they are logged and the
//! visitor is sent back to the start of the flow.

use std::fmt;

/// Errors from authentication operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The provider redirected back with an `error` parameter.
    ProviderDenied {
        error: String,
        description: Option<String>,
    },
    /// The callback arrived without a login having been started.
    NoPendingLogin,
    /// The callback query string could not be parsed.
    MalformedCallback { reason: String },
    /// The callback did not carry a `state` parameter.
    MissingState,
    /// The `state` parameter does not match the one issued at login.
    StateMismatch,
    /// The callback did not carry an authorization code.
    MissingCode,
    /// The token endpoint rejected the exchange or could not be reached.
    TokenExchange { reason: String },
    /// ID token validation failed.
    InvalidToken { reason: String },
    /// Missing required claim in token.
    MissingClaim { claim: String },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderDenied { error, description } => match description {
                Some(description) => {
                    write!(f, "provider denied authorization: {error} ({description})")
                }
                None => write!(f, "provider denied authorization: {error}"),
            },
            Self::NoPendingLogin => {
                write!(f, "no login in progress for this session")
            }
            Self::MalformedCallback { reason } => {
                write!(f, "malformed callback: {reason}")
            }
            Self::MissingState => {
                write!(f, "callback is missing the state parameter")
            }
            Self::StateMismatch => {
                write!(f, "state parameter does not match the issued value")
            }
            Self::MissingCode => {
                write!(f, "callback is missing the authorization code")
            }
            Self::TokenExchange { reason } => {
                write!(f, "token exchange failed: {reason}")
            }
            Self::InvalidToken { reason } => {
                write!(f, "invalid token: {reason}")
            }
            Self::MissingClaim { claim } => {
                write!(f, "missing required claim: {claim}")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_denied_display_includes_description() {
        let err = AuthenticationError::ProviderDenied {
            error: "access_denied".to_string(),
            description: Some("User cancelled".to_string()),
        };
        assert!(err.to_string().contains("access_denied"));
        assert!(err.to_string().contains("User cancelled"));
    }

    #[test]
    fn provider_denied_display_without_description() {
        let err = AuthenticationError::ProviderDenied {
            error: "login_required".to_string(),
            description: None,
        };
        assert_eq!(
            err.to_string(),
            "provider denied authorization: login_required"
        );
    }

    #[test]
    fn token_exchange_display() {
        let err = AuthenticationError::TokenExchange {
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("token exchange failed"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn malformed_callback_display() {
        let err = AuthenticationError::MalformedCallback {
            reason: "duplicate field `code`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed callback: duplicate field `code`"
        );
    }

    #[test]
    fn missing_claim_display() {
        let err = AuthenticationError::MissingClaim {
            claim: "name".to_string(),
        };
        assert!(err.to_string().contains("name"));
    }
}
