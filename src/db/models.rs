use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub profile_name: String,
    pub password_hash: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl Session {
    /// A session at or past its expiry timestamp no longer exists for any
    /// purpose.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    pub created_at: i64,
}

/// One conversation partner with the timestamp of the latest exchanged message.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationSummary {
    pub user_id: String,
    pub username: String,
    pub profile_name: String,
    pub last_message_at: i64,
}
