use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tower_auth_models::{AuthError, Platform, Settings};

pub struct TracingService;

impl TracingService {
    /// Installs the global subscriber. `RUST_LOG` overrides the default level,
    /// which is `debug` in debug mode and `info` otherwise.
    pub fn init(debug: bool, json: bool) -> Result<(), AuthError> {
        let default_level = if debug { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let result = if json {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_timer(fmt::time::UtcTime::rfc_3339()))
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .try_init()
        };

        result.map_err(|e| AuthError::InternalError { reason: e.to_string() })
    }

    pub fn log_startup(settings: &Settings) {
        info!(
            bind = %settings.bind_address(),
            debug = settings.debug,
            token_expire_hours = settings.token_expire_hours,
            tls_cert = %settings.server.tls_cert_file.display(),
            "Tower Auth starting"
        );
        if settings.debug {
            warn!("Debug mode is on: test tokens can be issued");
        }
    }

    pub fn log_token_issued(username: &str, platform: Platform, ttl_hours: i64) {
        info!(
            username = %username,
            platform = %platform,
            ttl_hours = ttl_hours,
            "Token issued"
        );
    }

    pub fn log_request_refused(route: &str, username: &str, error: &AuthError) {
        warn!(
            route = %route,
            username = %username,
            error_type = error.error_type(),
            status = error.http_status(),
            reason = %error,
            "Request refused"
        );
    }

    pub fn log_character_created(username: &str, character_name: &str) {
        info!(
            username = %username,
            character_name = %character_name,
            "Character created"
        );
    }
}
