use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::auth::UserResponse;
use crate::api::state::AppState;
use crate::db::UserRepository;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

const SEARCH_LIMIT: i64 = 20;

/// GET /api/users/search?q=<needle> (requires auth)
///
/// Case-insensitive substring match over profile names.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let needle = query.q.trim();

    if needle.is_empty() || needle.chars().count() > 30 {
        return Err(AppError::validation(
            "q",
            "Search query must be 1-30 characters",
        ));
    }

    let users = UserRepository::search_by_profile_name(&state.db, needle, SEARCH_LIMIT).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
