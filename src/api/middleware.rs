use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::cookie::extract_session_token;
use crate::api::state::AppState;
use crate::db::{SessionRepository, TokenResolution, User, UserRepository};
use crate::error::AppError;

/// The authenticated user, made available to downstream handlers via request
/// extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication middleware - resolves the session cookie to a user.
///
/// A missing cookie, an unknown token, and an expired token all answer with
/// the same `Unauthenticated`, so a caller cannot tell which case it hit.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_session_token(request.headers())
        .ok_or(AppError::Unauthenticated)?
        .to_owned();

    let session = match SessionRepository::resolve(&state.db, &token).await? {
        TokenResolution::Active(session) => session,
        TokenResolution::NotFound | TokenResolution::Expired => {
            return Err(AppError::Unauthenticated)
        }
    };

    // A session whose user row is gone is as good as no session.
    let user = UserRepository::get_by_id(&state.db, &session.user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
