//! Axum router configuration with middleware.
//!
//! Routes live under `/api/`, plus `/health`.
//! Middleware: CORS (credentials allowed for the session cookie), tracing,
//! per-request timeout.

use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    let api_routes = Router::new()
        // Forms
        .route("/form", post(handlers::form::create_form))
        .route(
            "/form/{id}",
            get(handlers::form::get_form)
                .put(handlers::form::update_form)
                .delete(handlers::form::delete_form),
        )
        .route("/forms", get(handlers::form::list_forms))
        // Responses
        .route(
            "/response/{formid}",
            post(handlers::response::submit_response).get(handlers::response::list_responses),
        )
        // Login
        .route(
            "/login",
            post(handlers::login::login).get(handlers::login::current_profile),
        )
        .route("/logout", post(handlers::login::logout));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
