use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::auth::generate_token;
use crate::db::models::Session;
use crate::error::AppError;

/// Outcome of resolving a presented session token.
#[derive(Debug)]
pub enum TokenResolution {
    /// Token matched a live session.
    Active(Session),
    /// No session record carries this token.
    NotFound,
    /// The session had passed its expiry; the record has been purged.
    Expired,
}

pub struct SessionRepository;

impl SessionRepository {
    /// Create a session for `user_id` expiring `ttl_secs` from now.
    ///
    /// Token uniqueness is enforced by the store; on the (cryptographically
    /// negligible) collision the insert retries with a fresh token.
    pub async fn create(
        pool: &Pool<Sqlite>,
        user_id: &str,
        ttl_secs: i64,
    ) -> Result<Session, AppError> {
        let created_at = chrono::Utc::now().timestamp();
        let expires_at = created_at + ttl_secs;

        loop {
            let id = Uuid::new_v4().to_string();
            let token = generate_token();

            let result = sqlx::query_as::<_, Session>(
                r#"
INSERT INTO sessions (id, user_id, token, created_at, expires_at)
VALUES (?, ?, ?, ?, ?)
RETURNING *
                "#,
            )
            .bind(&id)
            .bind(user_id)
            .bind(&token)
            .bind(created_at)
            .bind(expires_at)
            .fetch_one(pool)
            .await;

            match result {
                Ok(session) => return Ok(session),
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Look up a token. Expired records are purged on the way out; losing the
    /// purge race to a concurrent request is harmless (the second delete is a
    /// no-op).
    pub async fn resolve(
        pool: &Pool<Sqlite>,
        token: &str,
    ) -> Result<TokenResolution, AppError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE token = ?"
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        let Some(session) = session else {
            return Ok(TokenResolution::NotFound);
        };

        if session.is_expired_at(chrono::Utc::now().timestamp()) {
            Self::revoke(pool, token).await?;
            return Ok(TokenResolution::Expired);
        }

        Ok(TokenResolution::Active(session))
    }

    /// Delete the session carrying `token`. Idempotent: revoking an unknown or
    /// already-revoked token is a no-op.
    pub async fn revoke(pool: &Pool<Sqlite>, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Bulk purge for the background sweep. Expiry is lazy on access; this
    /// just reaps sessions nobody presented again.
    pub async fn delete_expired(pool: &Pool<Sqlite>) -> Result<(), AppError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(pool)
            .await?;

        Ok(())
    }
}
