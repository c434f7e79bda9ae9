use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::db::{ConversationSummary, Message, MessageRepository, UserRepository};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    /// The other participant of the conversation.
    #[serde(rename = "with")]
    pub with_user: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Cursor for pagination: only messages older than this timestamp.
    pub before: Option<i64>,
}

fn default_limit() -> i64 {
    50
}

/// POST /api/chat/send (requires auth)
pub async fn send_message(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let content = req.content.trim();
    if content.is_empty() || content.chars().count() > 5000 {
        return Err(AppError::validation(
            "content",
            "Message must be 1-5000 characters",
        ));
    }

    UserRepository::get_by_id(&state.db, &req.recipient_id)
        .await?
        .ok_or(AppError::NotFound("Recipient"))?;

    let message =
        MessageRepository::create(&state.db, &user.id, &req.recipient_id, content).await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/chat/messages?with=<user_id> (requires auth)
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    let limit = query.limit.clamp(1, 100); // Cap at 100

    let messages = if let Some(before) = query.before {
        MessageRepository::get_conversation_before(
            &state.db,
            &user.id,
            &query.with_user,
            before,
            limit,
        )
        .await?
    } else {
        MessageRepository::get_conversation(&state.db, &user.id, &query.with_user, limit).await?
    };

    Ok(Json(messages))
}

/// GET /api/chat/conversations (requires auth)
pub async fn conversations(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    let conversations = MessageRepository::list_conversations(&state.db, &user.id).await?;

    Ok(Json(conversations))
}
