//! Session transport
//!
//! The session token travels in the HTTP-only `taskboard_session` cookie.
//! API clients that don't keep cookies can send it as
//! `Authorization: Bearer <token>` instead. When both are present the cookie
//! is used if it verifies, the header otherwise.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use taskboard_shared::auth::session::{Identity, SessionKeys};
use tower_cookies::{
    cookie::{time::Duration, SameSite},
    Cookie, Cookies,
};

use crate::error::ApiError;

/// Session cookie name
pub const SESSION_COOKIE: &str = "taskboard_session";

/// Raw token of the session cookie
pub fn cookie_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Token of an `Authorization: Bearer` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn verified(keys: &SessionKeys, token: &str, source: &'static str) -> Option<Identity> {
    match keys.verify(token) {
        Ok(identity) => Some(identity),
        Err(err) => {
            tracing::debug!(source, error = %err, "Ignoring invalid session token");
            None
        }
    }
}

/// Verified identity of the request, if any
///
/// The cookie is tried first; a cookie that fails verification (stale,
/// malformed, foreign signature) falls through to the Bearer header.
pub fn resolve_identity(keys: &SessionKeys, cookies: &Cookies, headers: &HeaderMap) -> Option<Identity> {
    cookie_token(cookies)
        .and_then(|token| verified(keys, &token, "cookie"))
        .or_else(|| bearer_token(headers).and_then(|token| verified(keys, token, "bearer")))
}

pub fn set_session_cookie(cookies: &Cookies, token: String, ttl_days: i64, secure: bool) {
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(ttl_days))
        .build();
    cookies.add(cookie);
}

pub fn clear_session_cookie(cookies: &Cookies, secure: bool) {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .build();
    cookies.add(cookie);
}

/// Extractor for the authenticated caller
///
/// Reads the [`Identity`] the route guard put in the request extensions and
/// rejects with `401` when there is none.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
    }
}
