//! Identity and session types for the gatehouse authentication gateway.
//!
//! This crate provides:
//! - OIDC client configuration (`OidcConfig`)
//! - Identity claims mapped from the provider's ID token (`IdentityClaims`)
//! - The per-visitor session record (`Session`) and the data carried across
//!   the authorization-code round trip (`PendingAuthorization`)
//! - Callback validation (`CallbackParams`) and authentication error types
//!
//! # Session Model
//!
//! A visitor is either anonymous (no `user` in the session) or authenticated
//! (a `user` with a displayable name). There is no partial state in between:
//! claims are only stored once the provider has issued a verified ID token.
//!
//! # Example
//!
//! ```
//! use gatehouse_access::{IdentityClaims, PendingAuthorization, Session};
//!
//! let mut session = Session::new();
//! session.begin_login(PendingAuthorization::new(
//!     "csrf".to_string(),
//!     "verifier".to_string(),
//!     "nonce".to_string(),
//! ));
//! assert!(session.current_user().is_none());
//!
//! let claims = IdentityClaims::new(
//!     "00u1abcd".to_string(),
//!     "https://example.okta.com/oauth2/default".to_string(),
//!     "Alice".to_string(),
//! );
//! session.take_pending();
//! session.set_user(claims).expect("claims have a name");
//! assert_eq!(session.current_user(), Some("Alice"));
//!
//! session.clear_user();
//! assert!(session.is_empty());
//! ```

pub mod auth;
pub mod error;
pub mod oidc;
pub mod session;

// Re-export main types at crate root
pub use auth::{CallbackParams, IdentityClaims, PendingAuthorization};
pub use error::AuthenticationError;
pub use oidc::{InvalidOidcConfig, OidcConfig};
pub use session::Session;
