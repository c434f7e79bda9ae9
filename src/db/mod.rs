pub mod models;
pub mod users;
pub mod sessions;
pub mod messages;

pub use models::{ConversationSummary, Message, Session, User};
pub use sessions::{SessionRepository, TokenResolution};
pub use users::UserRepository;
pub use messages::MessageRepository;

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::Pool<sqlx::Sqlite> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}
