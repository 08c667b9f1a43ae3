pub mod handlers;
pub mod middleware;
pub mod rejection;
pub mod routes;
pub mod state;
pub mod tls;

pub use handlers::*;
pub use middleware::*;
pub use rejection::*;
pub use routes::*;
pub use state::*;
pub use tls::*;

use axum_server::Handle;
use std::net::SocketAddr;
use tower_auth_models::AuthError;
use tracing::info;

/// Resolves `bind:port` from the settings to a socket address.
pub async fn resolve_bind_address(bind: &str) -> Result<SocketAddr, AuthError> {
    tokio::net::lookup_host(bind)
        .await
        .map_err(|e| AuthError::ConfigError { reason: format!("cannot resolve {}: {}", bind, e) })?
        .next()
        .ok_or_else(|| AuthError::ConfigError { reason: format!("{} resolved to no address", bind) })
}

/// Serves the API over HTTPS until `handle` is told to shut down.
///
/// The certificate and key are loaded before binding, so a missing or
/// malformed pair fails here without ever opening the port.
pub async fn start_server(state: AppState, handle: Handle) -> Result<(), AuthError> {
    let settings = state.settings.clone();
    let tls = load_tls_config(&settings.server.tls_cert_file, &settings.server.tls_key_file)?;
    let addr = resolve_bind_address(&settings.bind_address()).await?;

    let app = build_router(state);

    info!("Tower Auth listening on https://{}", addr);
    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| AuthError::InternalError { reason: format!("server error: {}", e) })
}

/// Runs [`start_server`] and closes the database pool once it stops, whether
/// it was shut down through `handle` or failed.
pub async fn run_server(state: AppState, handle: Handle) -> Result<(), AuthError> {
    let store = state.store.clone();
    let result = start_server(state, handle).await;
    store.close().await;
    info!("Database pool closed");
    result
}
