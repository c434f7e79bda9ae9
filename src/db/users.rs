use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::User;
use crate::error::AppError;

pub struct UserRepository;

impl UserRepository {
    /// Insert a new user. Username uniqueness is enforced by the store's
    /// UNIQUE constraint; a violation surfaces as `Conflict`.
    pub async fn create(
        pool: &Pool<Sqlite>,
        username: &str,
        profile_name: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let result = sqlx::query_as::<_, User>(
            r#"
INSERT INTO users (id, username, profile_name, password_hash, created_at)
VALUES (?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(profile_name)
        .bind(password_hash)
        .bind(created_at)
        .fetch_one(pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_by_username(
        pool: &Pool<Sqlite>,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = ?"
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Case-insensitive substring search over profile names. LIKE wildcards in
    /// the needle are escaped so they match literally.
    pub async fn search_by_profile_name(
        pool: &Pool<Sqlite>,
        needle: &str,
        limit: i64,
    ) -> Result<Vec<User>, AppError> {
        let escaped = needle
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{}%", escaped);

        let users = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE profile_name LIKE ? ESCAPE '\' ORDER BY profile_name LIMIT ?"#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
