use serde::{Deserialize, Serialize};

use crate::{Character, Platform, Race};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub username: String,
}

/// Query string of `POST /token/steam`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteamTokenQuery {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub jwt: String,
}

/// Fields every authenticated player request carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBase {
    pub platform: Platform,
    pub username: String,
    pub jwt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCharacterRequest {
    #[serde(flatten)]
    pub base: RequestBase,
    pub character_name: String,
    pub race: Race,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharactersResponse {
    #[serde(default)]
    pub characters: Vec<Character>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "OK".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: bool,
    pub cache: bool,
}
