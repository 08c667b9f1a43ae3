use anyhow::{bail, Context, Result};
use axum_server::Handle;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tower_auth_api::{run_server, AppState};
use tower_auth_metrics::MetricsService;
use tower_auth_models::{
    AuthError, DatabaseSettings, Platform, RedisSettings, ServerSettings, Settings, User, UserStatus,
};
use tower_auth_store::{SessionCache, UserStore};

pub const TEST_TOKEN_KEY: &str = "testsupport-signing-key";

/// Nothing listens here, so readiness reports the cache as down.
pub const UNREACHABLE_REDIS: &str = "redis://127.0.0.1:1";

#[derive(Debug, Default)]
pub struct ConfigOverride {
    pub debug: Option<bool>,
    pub token_expire_hours: Option<i64>,
}

pub fn user(id: i64, username: &str, platform: Platform, status: UserStatus) -> User {
    User {
        id,
        username: username.to_string(),
        platform,
        status,
    }
}

/// The accounts most tests expect to find.
pub fn default_users() -> Vec<User> {
    vec![
        user(1, "steam_player", Platform::Steam, UserStatus::Active),
        user(2, "sleepy_player", Platform::Steam, UserStatus::Inactive),
        user(3, "test_player", Platform::Test, UserStatus::Active),
    ]
}

/// Settings for a loopback server on an ephemeral port.
pub fn test_settings(
    tls_cert_file: PathBuf,
    tls_key_file: PathBuf,
    config_override: ConfigOverride,
) -> Settings {
    Settings {
        debug: config_override.debug.unwrap_or(true),
        log_json: false,
        token_expire_hours: config_override.token_expire_hours.unwrap_or(24),
        token_key: TEST_TOKEN_KEY.to_string(),
        server: ServerSettings {
            bind: "127.0.0.1".to_string(),
            port: 0,
            tls_key_file,
            tls_cert_file,
        },
        database: DatabaseSettings {
            host: "localhost".to_string(),
            port: 3306,
            user: "tower".to_string(),
            password: String::new(),
            name: "tower".to_string(),
            url: Some("sqlite::memory:".to_string()),
        },
        redis: RedisSettings {
            host: "127.0.0.1:1".to_string(),
            password: String::new(),
        },
    }
}

/// Writes a self-signed `localhost`/`127.0.0.1` certificate and key into `dir`.
pub fn write_self_signed(dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let certified = rcgen::generate_simple_self_signed(vec![
        "localhost".to_string(),
        "127.0.0.1".to_string(),
    ])?;

    let cert_path = dir.join("tls.crt");
    let key_path = dir.join("tls.key");
    std::fs::write(&cert_path, certified.cert.pem())?;
    std::fs::write(&key_path, certified.key_pair.serialize_pem())?;
    Ok((cert_path, key_path))
}

/// Builds application state over a migrated in-memory store holding `users`.
pub async fn test_state(settings: Settings, users: &[User]) -> Result<AppState> {
    let store = UserStore::connect_in_memory().await?;
    store.migrate().await?;
    for user in users {
        store.insert_user(user).await?;
    }

    let cache = SessionCache::with_timeout(UNREACHABLE_REDIS, Duration::from_millis(200))?;
    let metrics = Arc::new(MetricsService::new()?);
    Ok(AppState::new(settings, store, cache, metrics))
}

pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    handle: Handle,
    task: JoinHandle<Result<(), AuthError>>,
    _tls_dir: TempDir,
}

impl TestServer {
    pub async fn shutdown(self) -> Result<()> {
        self.handle.graceful_shutdown(Some(Duration::from_secs(1)));
        self.task.await??;
        Ok(())
    }
}

/// Starts the HTTPS server in-process through the same `run_server` the
/// binary uses, and waits until it accepts connections.
pub async fn spawn_server(
    users: &[User],
    config_override: Option<ConfigOverride>,
) -> Result<TestServer> {
    let tls_dir = tempfile::tempdir()?;
    let (cert_path, key_path) = write_self_signed(tls_dir.path())?;

    let settings = test_settings(cert_path, key_path, config_override.unwrap_or_default());
    let state = test_state(settings, users).await?;

    let handle = Handle::new();
    let mut task = tokio::spawn(run_server(state.clone(), handle.clone()));

    let addr = tokio::select! {
        addr = handle.listening() => addr.context("server failed to bind")?,
        result = &mut task => bail!("server exited before listening: {:?}", result),
    };

    Ok(TestServer {
        base_url: format!("https://127.0.0.1:{}", addr.port()),
        state,
        handle,
        task,
        _tls_dir: tls_dir,
    })
}
