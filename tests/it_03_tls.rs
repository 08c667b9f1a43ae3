use axum_server::Handle;
use std::path::PathBuf;
use tower_auth_api::start_server;
use tower_auth_models::AuthError;
use tower_auth_testsupport::*;

async fn start_with(cert: PathBuf, key: PathBuf) -> Result<(), AuthError> {
    let settings = test_settings(cert, key, ConfigOverride::default());
    let state = test_state(settings, &[]).await.unwrap();
    start_server(state, Handle::new()).await
}

#[tokio::test]
async fn missing_certificate_stops_startup() {
    let dir = tempfile::tempdir().unwrap();
    let (_cert, key) = write_self_signed(dir.path()).unwrap();

    let err = start_with(dir.path().join("absent.crt"), key).await.unwrap_err();
    assert!(matches!(err, AuthError::TlsError { .. }));
    assert!(err.to_string().contains("absent.crt"));
}

#[tokio::test]
async fn missing_key_stops_startup() {
    let dir = tempfile::tempdir().unwrap();
    let (cert, _key) = write_self_signed(dir.path()).unwrap();

    let err = start_with(cert, dir.path().join("absent.key")).await.unwrap_err();
    assert!(matches!(err, AuthError::TlsError { .. }));
}

#[tokio::test]
async fn malformed_certificate_stops_startup() {
    let dir = tempfile::tempdir().unwrap();
    let (_cert, key) = write_self_signed(dir.path()).unwrap();
    let garbage = dir.path().join("garbage.crt");
    std::fs::write(&garbage, "not a certificate\n").unwrap();

    let err = start_with(garbage, key).await.unwrap_err();
    assert!(matches!(err, AuthError::TlsError { .. }));
}
