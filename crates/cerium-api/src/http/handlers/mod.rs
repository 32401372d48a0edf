//! REST API handlers.

pub mod form;
pub mod login;
pub mod response;

use axum::Json;
use serde_json::{Value, json};

use cerium_types::form::FormId;

use crate::http::error::AppError;

/// GET /health - Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

/// Parse a path form id. Malformed ids cannot name a stored form.
pub(crate) fn parse_form_id(raw: &str) -> Result<FormId, AppError> {
    raw.parse::<FormId>()
        .map_err(|_| AppError::Form(cerium_types::error::FormError::NotFound))
}
