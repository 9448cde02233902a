//! Signed-cookie session storage.
//!
//! The whole [`Session`] record is serialized to JSON, base64-encoded and
//! stored in one cookie signed with a per-process [`Key`]. A cookie that is
//! missing, fails signature verification, or does not decode is read as an
//! empty session.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use gatehouse_access::Session;
use std::fmt;
use time::Duration as TimeDuration;

use crate::config::SessionConfig;

/// Loads and stores visitor sessions in a signed cookie.
#[derive(Clone)]
pub struct SessionStore {
    key: Key,
    cookie_name: String,
    max_age: TimeDuration,
    secure: bool,
}

impl SessionStore {
    /// Creates a session store from configuration.
    ///
    /// Uses the configured secret when present, otherwise generates a fresh key.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured secret is not valid base64 or is
    /// too short to derive a signing key from.
    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionKeyError> {
        let key = match &config.secret {
            Some(secret) => decode_key(secret)?,
            None => {
                tracing::warn!(
                    "No session secret configured; sessions will not survive a restart"
                );
                Key::generate()
            }
        };
        Ok(Self::with_key(key, config))
    }

    /// Creates a session store with an explicit signing key.
    #[must_use]
    pub fn with_key(key: Key, config: &SessionConfig) -> Self {
        Self {
            key,
            cookie_name: config.cookie_name.clone(),
            max_age: TimeDuration::seconds(config.max_age_seconds),
            secure: config.secure_cookies,
        }
    }

    /// Returns the signing key.
    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Reads the visitor's session from a verified cookie jar.
    #[must_use]
    pub fn load(&self, jar: &SignedCookieJar) -> Session {
        let Some(cookie) = jar.get(&self.cookie_name) else {
            return Session::new();
        };

        let decoded = URL_SAFE_NO_PAD
            .decode(cookie.value())
            .map_err(|e| e.to_string())
            .and_then(|bytes| serde_json::from_slice(&bytes).map_err(|e| e.to_string()));

        match decoded {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!(error = %e, "Discarding undecodable session cookie");
                Session::new()
            }
        }
    }

    /// Writes the session back, deleting the cookie when nothing is left in it.
    #[must_use]
    pub fn save(&self, jar: SignedCookieJar, session: &Session) -> SignedCookieJar {
        if session.is_empty() {
            return jar.remove(Cookie::build((self.cookie_name.clone(), "")).path("/"));
        }

        let json = match serde_json::to_vec(session) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize session");
                return jar;
            }
        };

        let cookie = Cookie::build((self.cookie_name.clone(), URL_SAFE_NO_PAD.encode(json)))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(self.max_age);

        jar.add(cookie)
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("cookie_name", &self.cookie_name)
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

fn decode_key(secret: &str) -> Result<Key, SessionKeyError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(secret.trim())
        .map_err(|e| SessionKeyError::InvalidEncoding(e.to_string()))?;

    Key::try_from(bytes.as_slice()).map_err(|_| SessionKeyError::TooShort { len: bytes.len() })
}

/// Errors building the session signing key.
#[derive(Debug)]
pub enum SessionKeyError {
    /// The secret is not valid base64.
    InvalidEncoding(String),
    /// The decoded secret is shorter than 64 bytes.
    TooShort { len: usize },
}

impl fmt::Display for SessionKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEncoding(msg) => write!(f, "session secret is not valid base64: {}", msg),
            Self::TooShort { len } => write!(
                f,
                "session secret decodes to {} bytes, at least 64 are required",
                len
            ),
        }
    }
}

impl std::error::Error for SessionKeyError {}
