//! Response submission and export handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use cerium_core::service::response::export_refusal;
use cerium_types::form::FormId;
use cerium_types::response::{ExportFormat, SubmitResponse};

use super::parse_form_id;
use crate::export::to_csv;
use crate::http::error::AppError;
use crate::http::extractors::session::Caller;
use crate::state::AppState;

/// Header carrying the export secret as an alternative to `?token=`.
pub const RESPONSE_TOKEN_HEADER: &str = "x-response-token";

/// Query parameters for GET /api/response/{formid}.
#[derive(Debug, Default, Deserialize)]
pub struct ResponsesQuery {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// POST /api/response/{formid} - Submit a response.
pub async fn submit_response(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(form_id): Path<String>,
    body: Result<Json<SubmitResponse>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body?;
    let form_id = parse_form_id(&form_id)?;
    let id = state
        .response_service
        .submit(&identity, &form_id, body)
        .await?;
    Ok(Json(json!({"id": id})))
}

/// GET /api/response/{formid} - List or export responses.
///
/// `?type=array` returns the projected table, `?type=csv` the same table as
/// CSV, anything else the stored documents.
pub async fn list_responses(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(form_id): Path<String>,
    headers: HeaderMap,
    query: Result<Query<ResponsesQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let format: ExportFormat = query
        .kind
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(AppError::BadRequest)?;

    let token = query.token.or_else(|| {
        headers
            .get(RESPONSE_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    });

    // Malformed ids are refused like any other inaccessible form.
    let form_id: FormId = form_id
        .parse()
        .map_err(|_| export_refusal(&identity, token.as_deref()))?;

    let service = &state.response_service;
    match format {
        ExportFormat::Raw => {
            let responses = service
                .list_responses(&identity, &form_id, token.as_deref())
                .await?;
            Ok(Json(responses).into_response())
        }
        ExportFormat::Array => {
            let table = service
                .export_table(&identity, &form_id, token.as_deref())
                .await?;
            Ok(Json(table).into_response())
        }
        ExportFormat::Csv => {
            let table = service
                .export_table(&identity, &form_id, token.as_deref())
                .await?;
            let body = to_csv(&table).map_err(|e| AppError::Internal(e.to_string()))?;
            Ok((
                [
                    (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{form_id}.csv\""),
                    ),
                ],
                body,
            )
                .into_response())
        }
    }
}
