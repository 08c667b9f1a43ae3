use reqwest::StatusCode;
use serde_json::json;
use tower_auth_testsupport::*;

#[tokio::test(flavor = "multi_thread")]
async fn smoke_test() -> anyhow::Result<()> {
    let server = spawn_server(&default_users(), None).await?;
    let client = AuthClient::new(server.base_url.clone())?;

    assert_eq!(client.healthcheck().await?, json!({ "status": "OK" }));

    let (status, readiness) = client.readiness().await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(readiness.database);
    assert!(!readiness.cache);

    let metrics = client.metrics().await?;
    assert!(metrics.contains("tower_auth_tokens_issued_total"));

    server.shutdown().await
}

#[tokio::test(flavor = "multi_thread")]
async fn plain_http_is_refused() -> anyhow::Result<()> {
    let server = spawn_server(&default_users(), None).await?;
    let plain_url = server.base_url.replacen("https://", "http://", 1);

    let result = reqwest::Client::new()
        .get(format!("{}/healthcheck", plain_url))
        .send()
        .await;
    assert!(result.is_err(), "plain HTTP unexpectedly answered: {:?}", result);

    server.shutdown().await
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_closes_database_pool() -> anyhow::Result<()> {
    let server = spawn_server(&default_users(), None).await?;
    let client = AuthClient::new(server.base_url.clone())?;
    let store = server.state.store.clone();

    assert!(client.healthcheck().await.is_ok());
    assert!(store.ping().await.is_ok());

    server.shutdown().await?;

    assert!(store.ping().await.is_err());
    assert!(client.healthcheck().await.is_err());
    Ok(())
}
