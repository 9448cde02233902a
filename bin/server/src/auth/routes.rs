//! Authentication routes for login, callback, and logout.

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use gatehouse_access::{AuthenticationError, CallbackParams, Session};

use super::AppState;
use super::oidc::IdentityProvider;

/// Builds a `302 Found` redirect.
///
/// `axum::response::Redirect` only offers 303, 307 and 308.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Initiates the OIDC login flow by redirecting to the identity provider.
pub async fn login(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let mut session = state.sessions.load(&jar);
    let request = state.provider.authorization_request();

    if session.pending().is_some() {
        tracing::debug!("Replacing unfinished login");
    }
    session.begin_login(request.pending);
    tracing::info!("Redirecting to identity provider");

    (state.sessions.save(jar, &session), found(&request.url))
}

/// Handles the OIDC callback after the user authenticates with the identity provider.
///
/// Always redirects to `/`. On failure the session keeps whatever identity
/// it had before; only the pending login is discarded. A query string that
/// cannot be parsed (a repeated parameter, say) counts as a failed callback.
pub async fn callback(
    State(state): State<AppState>,
    params: Result<Query<CallbackParams>, QueryRejection>,
    jar: SignedCookieJar,
) -> impl IntoResponse {
    let mut session = state.sessions.load(&jar);

    let result = match params {
        Ok(Query(params)) => complete_login(state.provider.as_ref(), &mut session, &params).await,
        Err(rejection) => {
            session.take_pending();
            Err(AuthenticationError::MalformedCallback {
                reason: rejection.body_text(),
            })
        }
    };

    match result {
        Ok(()) => {
            tracing::info!(
                subject = session.user().map(|u| u.subject.as_str()).unwrap_or_default(),
                "Login completed"
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
        }
    }

    (state.sessions.save(jar, &session), found("/"))
}

/// Validates the callback, exchanges the code and stores the claims.
///
/// The pending login is consumed in every case, so a callback URL cannot be
/// replayed.
async fn complete_login(
    provider: &dyn IdentityProvider,
    session: &mut Session,
    params: &CallbackParams,
) -> Result<(), AuthenticationError> {
    let pending = session.take_pending();
    let code = params.authorization_code(pending.as_ref())?;
    let pending = pending.ok_or(AuthenticationError::NoPendingLogin)?;

    let claims = provider.exchange_code(code, &pending).await?;
    session.set_user(claims)
}

/// Logs out the visitor by removing their identity from the session.
pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let mut session = state.sessions.load(&jar);

    if let Some(user) = session.clear_user() {
        tracing::info!(subject = %user.subject, "Logged out");
    }

    (state.sessions.save(jar, &session), found("/"))
}
