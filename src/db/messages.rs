use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::{ConversationSummary, Message};
use crate::error::AppError;

pub struct MessageRepository;

impl MessageRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        sender_id: &str,
        recipient_id: &str,
        content: &str,
    ) -> Result<Message, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let message = sqlx::query_as::<_, Message>(
            r#"
INSERT INTO messages (id, sender_id, recipient_id, content, created_at)
VALUES (?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(sender_id)
        .bind(recipient_id)
        .bind(content)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    /// Latest messages between two users, newest first.
    pub async fn get_conversation(
        pool: &Pool<Sqlite>,
        user_id: &str,
        partner_id: &str,
        limit: i64,
    ) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
SELECT * FROM messages
WHERE (sender_id = ?1 AND recipient_id = ?2)
   OR (sender_id = ?2 AND recipient_id = ?1)
ORDER BY created_at DESC
LIMIT ?3
            "#,
        )
        .bind(user_id)
        .bind(partner_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// Conversation page older than the `before` cursor, newest first.
    pub async fn get_conversation_before(
        pool: &Pool<Sqlite>,
        user_id: &str,
        partner_id: &str,
        before: i64,
        limit: i64,
    ) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
SELECT * FROM messages
WHERE ((sender_id = ?1 AND recipient_id = ?2)
    OR (sender_id = ?2 AND recipient_id = ?1))
  AND created_at < ?3
ORDER BY created_at DESC
LIMIT ?4
            "#,
        )
        .bind(user_id)
        .bind(partner_id)
        .bind(before)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// Every conversation partner of `user_id` with the timestamp of the most
    /// recent exchanged message, newest conversation first.
    pub async fn list_conversations(
        pool: &Pool<Sqlite>,
        user_id: &str,
    ) -> Result<Vec<ConversationSummary>, AppError> {
        let conversations = sqlx::query_as::<_, ConversationSummary>(
            r#"
SELECT u.id AS user_id, u.username, u.profile_name, c.last_message_at
FROM (
    SELECT
        CASE WHEN sender_id = ?1 THEN recipient_id ELSE sender_id END AS partner_id,
        MAX(created_at) AS last_message_at
    FROM messages
    WHERE sender_id = ?1 OR recipient_id = ?1
    GROUP BY partner_id
) c
JOIN users u ON u.id = c.partner_id
ORDER BY c.last_message_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(conversations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, UserRepository};

    async fn seeded_pair(pool: &Pool<Sqlite>) -> (String, String) {
        let alice = UserRepository::create(pool, "alice", "Alice", "h")
            .await
            .unwrap();
        let bob = UserRepository::create(pool, "bob", "Bob", "h")
            .await
            .unwrap();
        (alice.id, bob.id)
    }

    #[tokio::test]
    async fn test_conversation_spans_both_directions() {
        let pool = test_pool().await;
        let (alice, bob) = seeded_pair(&pool).await;

        MessageRepository::create(&pool, &alice, &bob, "hi bob")
            .await
            .unwrap();
        MessageRepository::create(&pool, &bob, &alice, "hi alice")
            .await
            .unwrap();

        let from_alice = MessageRepository::get_conversation(&pool, &alice, &bob, 50)
            .await
            .unwrap();
        assert_eq!(from_alice.len(), 2);

        // Same thread regardless of which side asks.
        let from_bob = MessageRepository::get_conversation(&pool, &bob, &alice, 50)
            .await
            .unwrap();
        assert_eq!(from_bob.len(), 2);
    }

    #[tokio::test]
    async fn test_conversation_excludes_third_parties() {
        let pool = test_pool().await;
        let (alice, bob) = seeded_pair(&pool).await;
        let carol = UserRepository::create(&pool, "carol", "Carol", "h")
            .await
            .unwrap();

        MessageRepository::create(&pool, &alice, &bob, "for bob")
            .await
            .unwrap();
        MessageRepository::create(&pool, &alice, &carol.id, "for carol")
            .await
            .unwrap();

        let thread = MessageRepository::get_conversation(&pool, &alice, &bob, 50)
            .await
            .unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].content, "for bob");
    }

    #[tokio::test]
    async fn test_before_cursor_pages_older_messages() {
        let pool = test_pool().await;
        let (alice, bob) = seeded_pair(&pool).await;

        let first = MessageRepository::create(&pool, &alice, &bob, "first")
            .await
            .unwrap();

        let older =
            MessageRepository::get_conversation_before(&pool, &alice, &bob, first.created_at, 50)
                .await
                .unwrap();
        assert!(older.is_empty());

        let later =
            MessageRepository::get_conversation_before(&pool, &alice, &bob, first.created_at + 1, 50)
                .await
                .unwrap();
        assert_eq!(later.len(), 1);
    }

    #[tokio::test]
    async fn test_list_conversations_one_row_per_partner() {
        let pool = test_pool().await;
        let (alice, bob) = seeded_pair(&pool).await;

        MessageRepository::create(&pool, &alice, &bob, "one")
            .await
            .unwrap();
        MessageRepository::create(&pool, &bob, &alice, "two")
            .await
            .unwrap();

        let conversations = MessageRepository::list_conversations(&pool, &alice)
            .await
            .unwrap();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].username, "bob");

        // Bob sees the mirror image.
        let conversations = MessageRepository::list_conversations(&pool, &bob)
            .await
            .unwrap();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].username, "alice");
    }
}
