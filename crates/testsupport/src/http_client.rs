use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tower_auth_models::{
    Character, CharactersResponse, CreateCharacterRequest, CreatedCharacter, Platform,
    ReadinessResponse, RequestBase, TokenRequest, TokenResponse,
};

pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Client for a server presenting a self-signed certificate.
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client, base_url })
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B, what: &str) -> Result<T> {
        let response = self
            .client
            .post(&format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            anyhow::bail!("{} failed ({}): {}", what, status, error_text);
        }

        Ok(response.json().await?)
    }

    /// Sends `body` as-is and returns the status with whatever JSON came back.
    pub async fn post_raw(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        let response = self
            .client
            .post(&format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn healthcheck(&self) -> Result<Value> {
        let response = self
            .client
            .get(&format!("{}/healthcheck", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            anyhow::bail!("Healthcheck failed: {}", error_text);
        }

        Ok(response.json().await?)
    }

    pub async fn readiness(&self) -> Result<(StatusCode, ReadinessResponse)> {
        let response = self
            .client
            .get(&format!("{}/readiness", self.base_url))
            .send()
            .await?;

        let status = response.status();
        Ok((status, response.json().await?))
    }

    pub async fn metrics(&self) -> Result<String> {
        let response = self
            .client
            .get(&format!("{}/metrics", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            anyhow::bail!("Metrics failed: {}", error_text);
        }

        Ok(response.text().await?)
    }

    pub async fn test_token(&self, username: &str) -> Result<String> {
        let request = TokenRequest { username: username.to_string() };
        let response: TokenResponse = self.post("/token/test", &request, "Test token").await?;
        Ok(response.jwt)
    }

    pub async fn steam_token(&self, username: &str) -> Result<String> {
        let response = self
            .client
            .post(&format!("{}/token/steam", self.base_url))
            .query(&[("username", username)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            anyhow::bail!("Steam token failed ({}): {}", status, error_text);
        }

        let response: TokenResponse = response.json().await?;
        Ok(response.jwt)
    }

    pub async fn characters(&self, platform: Platform, username: &str, jwt: &str) -> Result<Vec<Character>> {
        let request = RequestBase {
            platform,
            username: username.to_string(),
            jwt: jwt.to_string(),
        };
        let response: CharactersResponse = self.post("/characters", &request, "List characters").await?;
        Ok(response.characters)
    }

    pub async fn create_character(&self, request: &CreateCharacterRequest) -> Result<CreatedCharacter> {
        let path = match request.base.platform {
            Platform::Test => "/character/create/test",
            Platform::Steam => "/character/create/steam",
        };
        self.post(path, request, "Create character").await
    }
}
