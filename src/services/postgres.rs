use crate::models::{NewUser, Role, Secret, User, UserChanges};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for PostgresError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PostgresError::Conflict(db.constraint().unwrap_or("unique").to_string())
            }
            _ => PostgresError::SqlxError(err),
        }
    }
}

const USER_COLUMNS: &str = "id, username, first_name, last_name, email, password_hash, role, \
     preferences, bio, verified, picture_path, picture_content_type, created_at";

/// PostgreSQL store for users and their secrets
///
/// Listing queries order by `created_at, id` so the matcher always sees
/// participants in a stable order.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Build a client whose pool connects on first use
    ///
    /// No migrations are run. Useful when the database may not be up yet.
    pub fn connect_lazy(database_url: &str, acquire_timeout: Duration) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    pub async fn insert_user(&self, new_user: NewUser) -> Result<User, PostgresError> {
        let query = format!(
            r#"
            INSERT INTO users (id, username, first_name, last_name, email, password_hash, role, preferences, bio)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&new_user.username)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(new_user.role)
            .bind(&new_user.preferences)
            .bind(&new_user.bio)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Inserted user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn find_user(&self, id: Uuid) -> Result<Option<User>, PostgresError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, PostgresError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Apply a partial update and return the updated row
    pub async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, PostgresError> {
        let query = format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                password_hash = COALESCE($6, password_hash),
                role = COALESCE($7, role),
                preferences = COALESCE($8, preferences),
                bio = COALESCE($9, bio)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(changes.username)
            .bind(changes.first_name)
            .bind(changes.last_name)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(changes.role)
            .bind(changes.preferences)
            .bind(changes.bio)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Delete a user (secrets cascade) and return the removed row
    pub async fn delete_user(&self, id: Uuid) -> Result<Option<User>, PostgresError> {
        let query = format!("DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(user) = &user {
            tracing::info!("Deleted user {} ({})", user.username, user.id);
        }
        Ok(user)
    }

    pub async fn set_picture(
        &self,
        id: Uuid,
        path: &str,
        content_type: &str,
    ) -> Result<Option<User>, PostgresError> {
        let query = format!(
            r#"
            UPDATE users SET picture_path = $2, picture_content_type = $3
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(path)
            .bind(content_type)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, PostgresError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
        let users = sqlx::query_as::<_, User>(&query).fetch_all(&self.pool).await?;
        Ok(users)
    }

    pub async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, PostgresError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at, id");
        let users = sqlx::query_as::<_, User>(&query)
            .bind(role)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Loaded {} users with role {}", users.len(), role);
        Ok(users)
    }

    pub async fn insert_secret(&self, user_id: Uuid, message: &str) -> Result<Secret, PostgresError> {
        let query = r#"
            INSERT INTO secrets (id, user_id, message, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, user_id, message, created_at
        "#;

        let secret = sqlx::query_as::<_, Secret>(query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(message)
            .fetch_one(&self.pool)
            .await?;
        Ok(secret)
    }

    /// Most recent secrets of a user, newest first
    pub async fn recent_secrets(&self, user_id: Uuid, limit: i64) -> Result<Vec<Secret>, PostgresError> {
        let query = r#"
            SELECT id, user_id, message, created_at
            FROM secrets
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
        "#;

        let secrets = sqlx::query_as::<_, Secret>(query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(secrets)
    }

    /// Delete a secret if it belongs to `user_id`
    pub async fn delete_secret(&self, user_id: Uuid, secret_id: Uuid) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM secrets WHERE id = $1 AND user_id = $2")
            .bind(secret_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
