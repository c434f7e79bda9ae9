use axum::http::{header, HeaderMap};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Set-Cookie value handing the token to the client. HttpOnly keeps it away
/// from page scripts, Secure restricts it to encrypted transport, SameSite=Lax
/// keeps it off cross-site subrequests, and Max-Age matches the session TTL.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

/// Set-Cookie value discarding the session cookie immediately.
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Pull the session token out of the request's Cookie header, if any.
pub fn extract_session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then_some(value)
        })
}
