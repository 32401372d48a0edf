//! SQLite response repository implementation.
//!
//! Responses are append-only; `seq` preserves submission order.

use cerium_core::repository::response::ResponseRepository;
use cerium_types::error::RepositoryError;
use cerium_types::form::FormId;
use cerium_types::response::{FormResponse, ResponseId};
use serde_json::{Map, Value};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `ResponseRepository`.
#[derive(Clone)]
pub struct SqliteResponseRepository {
    pool: DatabasePool,
}

impl SqliteResponseRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn response_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<FormResponse, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let form_id: String = row.try_get("form_id").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;
    let body: String = row.try_get("responses").map_err(query_error)?;

    let id = id
        .parse()
        .map(ResponseId)
        .map_err(|e| RepositoryError::Query(format!("invalid response id: {e}")))?;
    let form_id = form_id
        .parse::<FormId>()
        .map_err(|e| RepositoryError::Query(format!("invalid form id: {e}")))?;
    let responses: Map<String, Value> = serde_json::from_str(&body)
        .map_err(|e| RepositoryError::Query(format!("invalid responses JSON: {e}")))?;

    Ok(FormResponse {
        id,
        form_id,
        timestamp: parse_datetime(&created_at)?,
        filler: row.try_get("filler").map_err(query_error)?,
        responses,
    })
}

impl ResponseRepository for SqliteResponseRepository {
    async fn create(&self, response: &FormResponse) -> Result<(), RepositoryError> {
        let body = serde_json::to_string(&response.responses)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO responses (id, form_id, filler, responses, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(response.id.to_string())
        .bind(response.form_id.to_string())
        .bind(&response.filler)
        .bind(&body)
        .bind(format_datetime(&response.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn list_for_form(&self, form_id: &FormId) -> Result<Vec<FormResponse>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM responses WHERE form_id = ? ORDER BY seq ASC")
            .bind(form_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(response_from_row).collect()
    }

    async fn delete_for_form(&self, form_id: &FormId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM responses WHERE form_id = ?")
            .bind(form_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }
}
