use tower_auth_models::{AuthError, Character, CreatedCharacter, Platform, Race, User, UserStatus};
use tower_auth_store::UserStore;

fn user(id: i64, username: &str, platform: Platform, status: UserStatus) -> User {
    User {
        id,
        username: username.to_string(),
        platform,
        status,
    }
}

async fn seeded_store() -> UserStore {
    let store = UserStore::connect_in_memory().await.unwrap();
    store.migrate().await.unwrap();

    store.insert_user(&user(1, "steam_player", Platform::Steam, UserStatus::Active)).await.unwrap();
    store.insert_user(&user(2, "sleepy_player", Platform::Steam, UserStatus::Inactive)).await.unwrap();
    store.insert_user(&user(3, "test_player", Platform::Test, UserStatus::Active)).await.unwrap();
    store
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let store = seeded_store().await;
    store.migrate().await.unwrap();
    assert!(store.get_user("steam_player", Platform::Steam).await.unwrap().is_some());
}

#[tokio::test]
async fn get_user_matches_username_and_platform() {
    let store = seeded_store().await;

    let found = store.get_user("steam_player", Platform::Steam).await.unwrap();
    assert_eq!(found, Some(user(1, "steam_player", Platform::Steam, UserStatus::Active)));

    assert!(store.get_user("steam_player", Platform::Test).await.unwrap().is_none());
    assert!(store.get_user("nobody_here", Platform::Steam).await.unwrap().is_none());
}

#[tokio::test]
async fn get_active_user_rejects_unknown_and_inactive() {
    let store = seeded_store().await;

    let active = store.get_active_user("steam_player", Platform::Steam).await.unwrap();
    assert_eq!(active.id, 1);

    let err = store.get_active_user("nobody_here", Platform::Steam).await.unwrap_err();
    assert!(matches!(err, AuthError::UnknownUser));

    let err = store.get_active_user("sleepy_player", Platform::Steam).await.unwrap_err();
    assert!(matches!(err, AuthError::InactiveUser));
    assert_eq!(err.http_status(), 401);
}

#[tokio::test]
async fn create_and_list_characters() {
    let store = seeded_store().await;
    let owner = store.get_user("steam_player", Platform::Steam).await.unwrap().unwrap();

    assert!(store.list_characters("steam_player").await.unwrap().is_empty());

    let created = store.create_character(&owner, "zeta_knight", Race::Human).await.unwrap();
    assert_eq!(created, CreatedCharacter { name: "zeta_knight".into(), race: Race::Human });
    store.create_character(&owner, "alpha_mage", Race::Human).await.unwrap();

    let characters = store.list_characters("steam_player").await.unwrap();
    assert_eq!(
        characters,
        vec![
            Character { name: "alpha_mage".into() },
            Character { name: "zeta_knight".into() },
        ]
    );
    assert!(store.character_exists("alpha_mage").await.unwrap());
    assert!(!store.character_exists("never_made").await.unwrap());

    // Other players see only their own characters.
    assert!(store.list_characters("test_player").await.unwrap().is_empty());
}

#[tokio::test]
async fn character_names_are_globally_unique() {
    let store = seeded_store().await;
    let first = store.get_user("steam_player", Platform::Steam).await.unwrap().unwrap();
    let second = store.get_user("test_player", Platform::Test).await.unwrap().unwrap();

    store.create_character(&first, "unique_hero", Race::Human).await.unwrap();

    let err = store.create_character(&second, "unique_hero", Race::Human).await.unwrap_err();
    assert!(matches!(err, AuthError::NameTaken));
    assert_eq!(err.to_error_shape().detail, "Name already exist");

    // The failed attempt left nothing behind for the second player.
    assert!(store.list_characters("test_player").await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_user_insert_fails() {
    let store = seeded_store().await;
    let err = store
        .insert_user(&user(1, "steam_player", Platform::Steam, UserStatus::Active))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SqlxError(_)));
}
