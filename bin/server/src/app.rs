//! HTTP routing for the gateway.
//!
//! `/` is the only decision point: it sends authenticated visitors to the
//! protected page and everyone else to the public page.

use axum::{Router, extract::State, response::Response, routing::get};
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState, CurrentUser, routes::found};
use crate::pages::{protected_page, public_page};

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let protected_path = state.routes.protected_path.clone();
    let public_path = state.routes.public_path.clone();

    Router::new()
        .route("/", get(root))
        // Auth routes
        .route("/login", get(auth::login))
        .route("/auth", get(auth::callback))
        .route("/logout", get(auth::logout))
        // Pages
        .route(&protected_path, get(protected_page))
        .route(&public_path, get(public_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes the visitor to the protected or public page.
pub async fn root(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Response {
    match user {
        Some(_) => found(&state.routes.protected_path),
        None => found(&state.routes.public_path),
    }
}
