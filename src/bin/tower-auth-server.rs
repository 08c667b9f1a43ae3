use anyhow::Result;
use axum_server::Handle;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_auth_api::{run_server, AppState};
use tower_auth_metrics::{MetricsService, TracingService};
use tower_auth_models::Settings;
use tower_auth_store::{SessionCache, UserStore, DEFAULT_MAX_CONNECTIONS};
use tracing::{error, info, warn};

/// Time in-flight requests get to finish once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Unable to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Unable to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;
    TracingService::init(settings.debug, settings.log_json)?;
    TracingService::log_startup(&settings);

    let store = UserStore::connect(&settings.database.url()?, DEFAULT_MAX_CONNECTIONS).await?;
    store.migrate().await?;
    info!("Database connected");

    let cache = SessionCache::new(&settings.redis.url()?)?;
    let metrics = Arc::new(MetricsService::new()?);
    let state = AppState::new(settings, store, cache, metrics);

    let handle = Handle::new();
    {
        let handle = handle.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            info!("Received shutdown signal");
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });
    }

    let result = run_server(state, handle).await;
    if let Err(e) = &result {
        error!("Server error: {}", e);
    }
    result?;

    info!("Tower Auth shutdown complete");
    Ok(())
}
