use gatehouse_server::{
    app,
    auth::{AppState, OidcClient, SessionStore},
    config::{self, ServerConfig},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match config::load_env_file() {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "Loaded env file"),
        Ok(None) => {}
        Err(e) => panic!("failed to load env file: {e}"),
    }

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!(
        issuer = config.oidc.issuer_url(),
        client_id = config.oidc.client_id(),
        "Loaded configuration"
    );

    // Initialize OIDC client
    tracing::info!("Fetching OIDC provider keys...");
    let oidc_client = OidcClient::connect(&config.oidc)
        .await
        .expect("failed to initialize OIDC client");

    let sessions =
        SessionStore::from_config(&config.session).expect("failed to initialize session store");

    // Create application state
    let app_state = AppState::new(Arc::new(oidc_client), sessions, config.routes);
    let app = app::router(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
