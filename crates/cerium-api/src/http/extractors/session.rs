//! Session cookie extractors.
//!
//! The session credential travels in the `token` cookie. [`Caller`] yields
//! `Identity::Anonymous` for a missing or invalid cookie; [`RequiredCaller`]
//! rejects the request with 401 instead.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;

use cerium_types::identity::Identity;

use crate::http::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Caller identity where login is optional.
pub struct Caller(pub Identity);

/// Caller identity where login is mandatory.
pub struct RequiredCaller(pub Identity);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = state.resolver.resolve(session_cookie(parts).as_deref(), false)?;
        Ok(Caller(identity))
    }
}

impl FromRequestParts<AppState> for RequiredCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = state.resolver.resolve(session_cookie(parts).as_deref(), true)?;
        Ok(RequiredCaller(identity))
    }
}

/// Find the session cookie across all `Cookie` headers.
fn session_cookie(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

/// `Set-Cookie` value carrying a fresh session.
pub fn session_set_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that clears the session.
pub fn session_clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}
