#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use tower_auth_api::{build_router, AppState};
use tower_auth_metrics::MetricsService;
use tower_auth_models::{
    DatabaseSettings, Platform, RedisSettings, ServerSettings, Settings, User, UserStatus,
};
use tower_auth_store::{SessionCache, UserStore};

pub const TOKEN_KEY: &str = "router-test-signing-key";

pub fn settings(debug: bool) -> Settings {
    Settings {
        debug,
        log_json: false,
        token_expire_hours: 24,
        token_key: TOKEN_KEY.to_string(),
        server: ServerSettings {
            bind: "127.0.0.1".to_string(),
            port: 0,
            tls_key_file: PathBuf::from("/nonexistent/tls.key"),
            tls_cert_file: PathBuf::from("/nonexistent/tls.crt"),
        },
        database: DatabaseSettings {
            host: "localhost".to_string(),
            port: 3306,
            user: "tower".to_string(),
            password: "unused".to_string(),
            name: "tower".to_string(),
            url: Some("sqlite::memory:".to_string()),
        },
        redis: RedisSettings {
            host: "127.0.0.1:1".to_string(),
            password: "unused".to_string(),
        },
    }
}

fn user(id: i64, username: &str, platform: Platform, status: UserStatus) -> User {
    User {
        id,
        username: username.to_string(),
        platform,
        status,
    }
}

/// State backed by a seeded in-memory store and a cache nothing listens on.
pub async fn state(debug: bool) -> AppState {
    let store = UserStore::connect_in_memory().await.unwrap();
    store.migrate().await.unwrap();
    store.insert_user(&user(1, "steam_player", Platform::Steam, UserStatus::Active)).await.unwrap();
    store.insert_user(&user(2, "sleepy_player", Platform::Steam, UserStatus::Inactive)).await.unwrap();
    store.insert_user(&user(3, "test_player", Platform::Test, UserStatus::Active)).await.unwrap();

    let cache = SessionCache::with_timeout("redis://127.0.0.1:1", Duration::from_millis(200)).unwrap();
    let metrics = Arc::new(MetricsService::new().unwrap());
    AppState::new(settings(debug), store, cache, metrics)
}

pub async fn app(debug: bool) -> (Router, AppState) {
    let state = state(debug).await;
    (build_router(state.clone()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}
