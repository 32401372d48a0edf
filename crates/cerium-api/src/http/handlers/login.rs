//! Login, profile and logout handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use serde_json::json;

use cerium_types::identity::{AuthCode, UserProfile};

use crate::http::error::AppError;
use crate::http::extractors::session::{RequiredCaller, session_clear_cookie, session_set_cookie};
use crate::state::AppState;

/// POST /api/login - Exchange an OAuth code, store the profile and set the
/// session cookie.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<AuthCode>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(code) = body?;
    let (profile, session) = state.login_service.login(&code).await?;

    let max_age = state.login_service.session_ttl().num_seconds();
    let cookie = session_set_cookie(&session.token, max_age);
    Ok(([(SET_COOKIE, cookie)], Json(profile)))
}

/// GET /api/login - The logged-in caller's stored profile.
pub async fn current_profile(
    State(state): State<AppState>,
    RequiredCaller(identity): RequiredCaller,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.login_service.profile(&identity).await?;
    Ok(Json(profile))
}

/// POST /api/logout - Clear the session cookie.
pub async fn logout() -> impl IntoResponse {
    (
        [(SET_COOKIE, session_clear_cookie())],
        Json(json!({"status": true, "message": "Logged out"})),
    )
}
