use std::time::Duration;
use tokio::time::timeout;
use tower_auth_models::AuthError;
use tracing::debug;

pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_secs(2);

/// Handle on the shared Redis instance.
///
/// Building the handle only parses the URL; connections are opened per call.
#[derive(Clone)]
pub struct SessionCache {
    client: redis::Client,
    timeout: Duration,
}

impl SessionCache {
    pub fn new(url: &str) -> Result<Self, AuthError> {
        Self::with_timeout(url, DEFAULT_CACHE_TIMEOUT)
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, AuthError> {
        let client = redis::Client::open(url)
            .map_err(|e| AuthError::ConfigError { reason: format!("invalid redis url: {}", e) })?;
        Ok(Self { client, timeout })
    }

    pub async fn ping(&self) -> Result<(), AuthError> {
        let attempt = async {
            let mut conn = self.client.get_multiplexed_async_connection().await?;
            redis::cmd("PING").query_async::<_, String>(&mut conn).await
        };

        match timeout(self.timeout, attempt).await {
            Ok(Ok(reply)) => {
                debug!(reply = %reply, "Redis answered ping");
                Ok(())
            }
            Ok(Err(e)) => Err(AuthError::CacheError { reason: e.to_string() }),
            Err(_) => Err(AuthError::CacheError { reason: "redis timeout".to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        assert!(matches!(
            SessionCache::new("not a url"),
            Err(AuthError::ConfigError { .. })
        ));
    }

    #[tokio::test]
    async fn ping_reports_unreachable_server() {
        // Nothing listens on port 1.
        let cache = SessionCache::with_timeout("redis://127.0.0.1:1", Duration::from_millis(500)).unwrap();
        let err = cache.ping().await.unwrap_err();
        assert_eq!(err.http_status(), 503);
    }
}
