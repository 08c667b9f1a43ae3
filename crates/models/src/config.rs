//! Service settings.
//!
//! Settings are layered with figment: an optional TOML file named by
//! `TOWER_AUTH_CONFIG`, then `TOWER_*` environment variables. Keys ending in
//! `_file` name secret mounts whose trimmed contents become the value.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use url::Url;

use crate::AuthError;

pub const CONFIG_PATH_ENV: &str = "TOWER_AUTH_CONFIG";
pub const ENV_PREFIX: &str = "TOWER_";

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TLS_KEY_FILE: &str = "/run/secrets/tower_auth_tls_key";
pub const DEFAULT_TLS_CERT_FILE: &str = "/run/secrets/tower_auth_tls_cert";

/// Lifetime of tokens minted by `/token/test`.
pub const TEST_TOKEN_TTL_HOURS: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
struct RawSettings {
    #[serde(default, deserialize_with = "deserialize_flag")]
    debug: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    log_json: bool,

    auth_token_expire_hours: i64,
    auth_jwt_key_file: PathBuf,

    #[serde(default = "default_bind")]
    auth_bind: String,
    #[serde(default = "default_port")]
    auth_port: u16,
    #[serde(default = "default_tls_key_file")]
    auth_tls_key_file: PathBuf,
    #[serde(default = "default_tls_cert_file")]
    auth_tls_cert_file: PathBuf,

    db_host: String,
    db_port: u16,
    db_user: String,
    db_password_file: PathBuf,
    db_name: String,
    #[serde(default)]
    db_url: Option<String>,

    redis_host: String,
    redis_password_file: PathBuf,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_tls_key_file() -> PathBuf {
    PathBuf::from(DEFAULT_TLS_KEY_FILE)
}

fn default_tls_cert_file() -> PathBuf {
    PathBuf::from(DEFAULT_TLS_CERT_FILE)
}

/// Only an explicit `true` turns a flag on.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Number(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Text(value) => value == "true",
        Flag::Number(_) => false,
    })
}

#[derive(Clone, PartialEq)]
pub struct Settings {
    pub debug: bool,
    pub log_json: bool,
    pub token_expire_hours: i64,
    pub token_key: String,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
    pub tls_key_file: PathBuf,
    pub tls_cert_file: PathBuf,
}

#[derive(Clone, PartialEq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Full connection URL that replaces the MySQL parts when set.
    pub url: Option<String>,
}

#[derive(Clone, PartialEq)]
pub struct RedisSettings {
    pub host: String,
    pub password: String,
}

impl Settings {
    /// Loads settings from the process environment (and the optional TOML file).
    pub fn load() -> Result<Self, AuthError> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::new();
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, AuthError> {
        let raw: RawSettings = figment
            .extract()
            .map_err(|e| AuthError::ConfigError { reason: e.to_string() })?;

        if raw.auth_token_expire_hours <= 0 {
            return Err(AuthError::ConfigError {
                reason: format!(
                    "token expiry must be positive, got {} hours",
                    raw.auth_token_expire_hours
                ),
            });
        }

        Ok(Self {
            debug: raw.debug,
            log_json: raw.log_json,
            token_expire_hours: raw.auth_token_expire_hours,
            token_key: read_secret(&raw.auth_jwt_key_file)?,
            server: ServerSettings {
                bind: raw.auth_bind,
                port: raw.auth_port,
                tls_key_file: raw.auth_tls_key_file,
                tls_cert_file: raw.auth_tls_cert_file,
            },
            database: DatabaseSettings {
                host: raw.db_host,
                port: raw.db_port,
                user: raw.db_user,
                password: read_secret(&raw.db_password_file)?,
                name: raw.db_name,
                url: raw.db_url,
            },
            redis: RedisSettings {
                host: raw.redis_host,
                password: read_secret(&raw.redis_password_file)?,
            },
        })
    }

    /// `bind:port`, with IPv6 literals bracketed so the pair still resolves.
    pub fn bind_address(&self) -> String {
        match self.server.bind.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("[{}]:{}", ip, self.server.port),
            _ => format!("{}:{}", self.server.bind, self.server.port),
        }
    }
}

impl DatabaseSettings {
    pub fn url(&self) -> Result<String, AuthError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let mut url = Url::parse(&format!("mysql://{}:{}", self.host, self.port))
            .map_err(|e| AuthError::ConfigError { reason: format!("invalid database host: {}", e) })?;
        url.set_username(&self.user)
            .and_then(|_| url.set_password(Some(&self.password)))
            .map_err(|_| AuthError::ConfigError { reason: "database URL cannot carry credentials".into() })?;
        url.set_path(&self.name);
        Ok(url.to_string())
    }
}

impl RedisSettings {
    pub fn url(&self) -> Result<String, AuthError> {
        let mut url = Url::parse(&format!("redis://{}", self.host))
            .map_err(|e| AuthError::ConfigError { reason: format!("invalid redis host: {}", e) })?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| AuthError::ConfigError { reason: "redis URL cannot carry credentials".into() })?;
        }
        Ok(url.to_string())
    }
}

/// Reads a mounted secret, trimming surrounding whitespace.
pub fn read_secret(path: &Path) -> Result<String, AuthError> {
    std::fs::read_to_string(path)
        .map(|contents| contents.trim().to_string())
        .map_err(|e| AuthError::ConfigError {
            reason: format!("cannot read secret file {}: {}", path.display(), e),
        })
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("debug", &self.debug)
            .field("log_json", &self.log_json)
            .field("token_expire_hours", &self.token_expire_hours)
            .field("token_key", &"<redacted>")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("redis", &self.redis)
            .finish()
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("url", &self.url.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl fmt::Debug for RedisSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSettings")
            .field("host", &self.host)
            .field("password", &"<redacted>")
            .finish()
    }
}
