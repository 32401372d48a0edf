//! SQLite filler marker repository implementation.
//!
//! `record` is a single `INSERT OR IGNORE` against the UNIQUE(form_id,
//! filler) constraint, so concurrent submissions for the same pair see
//! exactly one `Recorded`.

use chrono::Utc;

use cerium_core::repository::filler::{FillerRepository, MarkerOutcome};
use cerium_types::error::RepositoryError;
use cerium_types::form::FormId;

use super::pool::DatabasePool;
use super::{format_datetime, query_error};

/// SQLite-backed implementation of `FillerRepository`.
#[derive(Clone)]
pub struct SqliteFillerRepository {
    pool: DatabasePool,
}

impl SqliteFillerRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl FillerRepository for SqliteFillerRepository {
    async fn has_filled(&self, form_id: &FormId, filler: &str) -> Result<bool, RepositoryError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM fillers WHERE form_id = ? AND filler = ?")
                .bind(form_id.to_string())
                .bind(filler)
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(query_error)?;

        Ok(row.is_some())
    }

    async fn record(&self, form_id: &FormId, filler: &str) -> Result<MarkerOutcome, RepositoryError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO fillers (form_id, filler, created_at) VALUES (?, ?, ?)",
        )
        .bind(form_id.to_string())
        .bind(filler)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(if result.rows_affected() == 1 {
            MarkerOutcome::Recorded
        } else {
            MarkerOutcome::AlreadyRecorded
        })
    }

    async fn delete_for_form(&self, form_id: &FormId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM fillers WHERE form_id = ?")
            .bind(form_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }
}
