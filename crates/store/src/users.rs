use sqlx::any::{install_default_drivers, AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use std::time::Duration;
use tower_auth_models::{AuthError, Character, CreatedCharacter, Platform, Race, User};
use tracing::{debug, info, instrument, warn};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Players and their characters, backed by MySQL in production.
///
/// Queries stick to SQL that MySQL and SQLite both accept so the same store
/// runs against an in-memory database in tests.
#[derive(Clone)]
pub struct UserStore {
    pool: AnyPool,
}

impl UserStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AuthError> {
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await
            .map_err(|e| AuthError::DatabaseError { reason: format!("connect failed: {}", e) })?;

        Ok(Self { pool })
    }

    /// Private SQLite database living as long as the store.
    pub async fn connect_in_memory() -> Result<Self, AuthError> {
        install_default_drivers();

        // One connection that never recycles, otherwise the database vanishes.
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), AuthError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError { reason: e.to_string() })?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), AuthError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Adds an account. Accounts normally come from the account service; this
    /// exists for provisioning scripts and tests.
    #[instrument(skip(self))]
    pub async fn insert_user(&self, user: &User) -> Result<(), AuthError> {
        sqlx::query("INSERT INTO users (id, username, platform, status) VALUES (?, ?, ?, ?)")
            .bind(user.id)
            .bind(&user.username)
            .bind(user.platform.as_str())
            .bind(user.status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, username: &str, platform: Platform) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(
            "SELECT id, username, platform, status FROM users WHERE username = ? AND platform = ?",
        )
        .bind(username)
        .bind(platform.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Like [`get_user`](Self::get_user) but the account must exist and be active.
    #[instrument(skip(self))]
    pub async fn get_active_user(&self, username: &str, platform: Platform) -> Result<User, AuthError> {
        let user = self
            .get_user(username, platform)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        if !user.is_active() {
            warn!(username = %username, status = user.status.as_str(), "Refusing inactive user");
            return Err(AuthError::InactiveUser);
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn list_characters(&self, username: &str) -> Result<Vec<Character>, AuthError> {
        let rows = sqlx::query(
            r#"
            SELECT c.name
            FROM characters c
            JOIN users u ON c.user_id = u.id
            WHERE u.username = ?
            ORDER BY c.name
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<Character, AuthError> { Ok(Character { name: row.try_get("name")? }) })
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn character_exists(&self, name: &str) -> Result<bool, AuthError> {
        let row = sqlx::query("SELECT name FROM characters WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Creates a character for `user`. Names are unique across all players.
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn create_character(
        &self,
        user: &User,
        name: &str,
        race: Race,
    ) -> Result<CreatedCharacter, AuthError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT name FROM characters WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Err(AuthError::NameTaken);
        }

        let inserted = sqlx::query("INSERT INTO characters (user_id, name, race) VALUES (?, ?, ?)")
            .bind(user.id)
            .bind(name)
            .bind(race.as_str())
            .execute(&mut *tx)
            .await;
        match inserted {
            Ok(_) => {}
            // Lost a race with a concurrent insert of the same name.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => return Err(AuthError::NameTaken),
            Err(e) => return Err(e.into()),
        }

        let stored = sqlx::query("SELECT name, race FROM characters WHERE name = ? AND user_id = ?")
            .bind(name)
            .bind(user.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AuthError::CreationFailed)?;

        let race: String = stored.try_get("race")?;
        let created = CreatedCharacter {
            name: stored.try_get("name")?,
            race: race.parse().map_err(|reason| AuthError::DatabaseError { reason })?,
        };

        tx.commit().await?;
        debug!(character = %created.name, race = created.race.as_str(), "Character row stored");
        Ok(created)
    }
}

fn row_to_user(row: &AnyRow) -> Result<User, AuthError> {
    let platform: String = row.try_get("platform")?;
    let status: String = row.try_get("status")?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        platform: platform
            .parse()
            .map_err(|reason| AuthError::DatabaseError { reason })?,
        status: status
            .parse()
            .map_err(|reason| AuthError::DatabaseError { reason })?,
    })
}
