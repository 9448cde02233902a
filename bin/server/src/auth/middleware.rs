//! Authentication extractors for Axum.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

use super::{AppState, routes::found};

/// Extractor for the `current user` predicate.
///
/// Holds the authenticated visitor's display name, or `None` when the
/// request carries no valid session. Never rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Option<String>);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = SignedCookieJar::from_headers(&parts.headers, app_state.sessions.key().clone());
        let session = app_state.sessions.load(&jar);

        Ok(CurrentUser(session.current_user().map(str::to_string)))
    }
}

/// Extractor for requiring an authenticated visitor.
///
/// Anonymous visitors are redirected to `/`, which routes them to the
/// public page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireUser(pub String);

impl<S> FromRequestParts<S> for RequireUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(CurrentUser(Some(name))) => Ok(RequireUser(name)),
            _ => Err(AuthRejection::NotAuthenticated),
        }
    }
}

/// Rejection type for authentication extractors.
#[derive(Debug)]
pub enum AuthRejection {
    NotAuthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated => found("/"),
        }
    }
}
