//! Form lifecycle handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use cerium_types::form::{CreatedForm, FormDraft, FormSummary, FormView};

use super::parse_form_id;
use crate::http::error::AppError;
use crate::http::extractors::session::{Caller, RequiredCaller};
use crate::state::AppState;

/// POST /api/form - Create a form owned by the caller.
pub async fn create_form(
    State(state): State<AppState>,
    RequiredCaller(identity): RequiredCaller,
    body: Result<Json<FormDraft>, JsonRejection>,
) -> Result<Json<CreatedForm>, AppError> {
    let Json(draft) = body?;
    let created = state.form_service.create_form(&identity, draft).await?;
    Ok(Json(created))
}

/// PUT /api/form/{id} - Replace a form's content.
pub async fn update_form(
    State(state): State<AppState>,
    RequiredCaller(identity): RequiredCaller,
    Path(id): Path<String>,
    body: Result<Json<FormDraft>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(draft) = body?;
    let id = parse_form_id(&id)?;
    let id = state.form_service.update_form(&identity, &id, draft).await?;
    Ok(Json(json!({"id": id})))
}

/// GET /api/form/{id} - View a form.
pub async fn get_form(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> Result<Json<FormView>, AppError> {
    let id = parse_form_id(&id)?;
    let view = state.form_service.get_form(&identity, &id).await?;
    Ok(Json(view))
}

/// DELETE /api/form/{id} - Delete a form and its responses.
pub async fn delete_form(
    State(state): State<AppState>,
    RequiredCaller(identity): RequiredCaller,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_form_id(&id)?;
    state.form_service.delete_form(&identity, &id).await?;
    Ok(Json(json!({"status": true, "message": "Form deleted"})))
}

/// GET /api/forms - The caller's forms, newest first.
pub async fn list_forms(
    State(state): State<AppState>,
    RequiredCaller(identity): RequiredCaller,
) -> Result<Json<Vec<FormSummary>>, AppError> {
    let forms = state.form_service.list_forms(&identity).await?;
    Ok(Json(forms))
}
