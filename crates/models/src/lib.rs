pub mod config;
pub mod error;
pub mod user;
pub mod character;
pub mod wire;

pub use config::*;
pub use error::*;
pub use user::*;
pub use character::*;
pub use wire::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("TEST".parse::<Platform>().unwrap(), Platform::Test);
        assert_eq!("STEAM".parse::<Platform>().unwrap(), Platform::Steam);
        assert!("steam".parse::<Platform>().is_err());
        assert!("Invalid".parse::<Platform>().is_err());
    }

    #[test]
    fn test_user_status_from_str() {
        assert_eq!("ACTIVE".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert_eq!("INACTIVE".parse::<UserStatus>().unwrap(), UserStatus::Inactive);
        assert_eq!("BLOCKED".parse::<UserStatus>().unwrap(), UserStatus::Blocked);
        assert!("DELETED".parse::<UserStatus>().is_err());
    }

    #[test]
    fn test_race_from_str() {
        assert_eq!("HUMAN".parse::<Race>().unwrap(), Race::Human);
        assert!("ORC".parse::<Race>().is_err());
    }

    #[test]
    fn test_enums_serialize_upper_case() {
        assert_eq!(serde_json::to_string(&Platform::Steam).unwrap(), r#""STEAM""#);
        assert_eq!(serde_json::to_string(&UserStatus::Inactive).unwrap(), r#""INACTIVE""#);
        assert_eq!(serde_json::to_string(&Race::Human).unwrap(), r#""HUMAN""#);
        assert_eq!(Platform::Test.to_string(), "TEST");
        assert_eq!(Platform::Steam.as_str(), "STEAM");
    }

    #[test]
    fn test_create_character_request_deserialize() {
        let json = r#"{
            "platform": "TEST",
            "username": "player_one",
            "jwt": "a.b.c",
            "character_name": "hero_of_tower",
            "race": "HUMAN"
        }"#;

        let request: CreateCharacterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.base.platform, Platform::Test);
        assert_eq!(request.base.username, "player_one");
        assert_eq!(request.character_name, "hero_of_tower");
        assert_eq!(request.race, Race::Human);
    }

    #[test]
    fn test_request_rejects_unknown_platform() {
        let json = r#"{"platform": "EPIC", "username": "player_one", "jwt": "x"}"#;
        let result: Result<RequestBase, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_characters_response_defaults_to_empty() {
        let response: CharactersResponse = serde_json::from_str("{}").unwrap();
        assert!(response.characters.is_empty());

        let json = serde_json::to_value(CharactersResponse::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "characters": [] }));
    }

    #[test]
    fn test_error_shape_serde() {
        let error = AuthError::InactiveUser;
        let json = serde_json::to_value(error.to_error_shape()).unwrap();
        assert_eq!(json, serde_json::json!({ "detail": "Inactive user" }));
    }
}
