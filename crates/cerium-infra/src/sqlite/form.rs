//! SQLite form repository implementation.
//!
//! Implements `FormRepository` from `cerium-core`. Ownership-scoped queries
//! match `id` and `creator` in the same WHERE clause.

use cerium_core::repository::form::FormRepository;
use cerium_types::error::RepositoryError;
use cerium_types::form::{Form, FormId, FormSummary, Page};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `FormRepository`.
#[derive(Clone)]
pub struct SqliteFormRepository {
    pool: DatabasePool,
}

impl SqliteFormRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Form.
struct FormRow {
    id: String,
    creator: String,
    name: String,
    response_token: String,
    require_login: bool,
    collect_email: bool,
    single_response: bool,
    is_closed: bool,
    close_on: Option<String>,
    pages: String,
    created_at: String,
}

impl FormRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            creator: row.try_get("creator")?,
            name: row.try_get("name")?,
            response_token: row.try_get("response_token")?,
            require_login: row.try_get("require_login")?,
            collect_email: row.try_get("collect_email")?,
            single_response: row.try_get("single_response")?,
            is_closed: row.try_get("is_closed")?,
            close_on: row.try_get("close_on")?,
            pages: row.try_get("pages")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_form(self) -> Result<Form, RepositoryError> {
        let id = parse_form_id(&self.id)?;
        let pages: Vec<Page> = serde_json::from_str(&self.pages)
            .map_err(|e| RepositoryError::Query(format!("invalid pages JSON: {e}")))?;

        Ok(Form {
            id,
            name: self.name,
            creator: self.creator,
            timestamp: parse_datetime(&self.created_at)?,
            pages,
            require_login: self.require_login,
            collect_email: self.collect_email,
            single_response: self.single_response,
            is_closed: self.is_closed,
            close_on: self.close_on.as_deref().map(parse_datetime).transpose()?,
            response_token: self.response_token,
        })
    }
}

fn parse_form_id(s: &str) -> Result<FormId, RepositoryError> {
    s.parse::<FormId>()
        .map_err(|e| RepositoryError::Query(format!("invalid form id: {e}")))
}

fn pages_json(form: &Form) -> Result<String, RepositoryError> {
    serde_json::to_string(&form.pages).map_err(|e| RepositoryError::Query(e.to_string()))
}

impl FormRepository for SqliteFormRepository {
    async fn create(&self, form: &Form) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO forms (id, creator, name, response_token, require_login, collect_email, single_response, is_closed, close_on, pages, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(form.id.to_string())
        .bind(&form.creator)
        .bind(&form.name)
        .bind(&form.response_token)
        .bind(form.require_login)
        .bind(form.collect_email)
        .bind(form.single_response)
        .bind(form.is_closed)
        .bind(form.close_on.as_ref().map(format_datetime))
        .bind(pages_json(form)?)
        .bind(format_datetime(&form.timestamp))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("form '{}' already exists", form.id)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &FormId) -> Result<Option<Form>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM forms WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let form_row = FormRow::from_row(&row).map_err(query_error)?;
                Ok(Some(form_row.into_form()?))
            }
            None => Ok(None),
        }
    }

    async fn find_owned(&self, id: &FormId, creator: &str) -> Result<Option<Form>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM forms WHERE id = ? AND creator = ?")
            .bind(id.to_string())
            .bind(creator)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let form_row = FormRow::from_row(&row).map_err(query_error)?;
                Ok(Some(form_row.into_form()?))
            }
            None => Ok(None),
        }
    }

    async fn replace_owned(
        &self,
        id: &FormId,
        creator: &str,
        form: &Form,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE forms SET name = ?, require_login = ?, collect_email = ?, single_response = ?,
                    is_closed = ?, close_on = ?, pages = ?
             WHERE id = ? AND creator = ?",
        )
        .bind(&form.name)
        .bind(form.require_login)
        .bind(form.collect_email)
        .bind(form.single_response)
        .bind(form.is_closed)
        .bind(form.close_on.as_ref().map(format_datetime))
        .bind(pages_json(form)?)
        .bind(id.to_string())
        .bind(creator)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &FormId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM forms WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_by_creator(&self, creator: &str) -> Result<Vec<FormSummary>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, response_token, created_at FROM forms
             WHERE creator = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(creator)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(query_error)?;
                let created_at: String = row.try_get("created_at").map_err(query_error)?;
                Ok(FormSummary {
                    id: parse_form_id(&id)?,
                    name: row.try_get("name").map_err(query_error)?,
                    token: row.try_get("response_token").map_err(query_error)?,
                    timestamp: parse_datetime(&created_at)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn make_form(creator: &str, name: &str) -> Form {
        let page: Page = serde_json::from_value(json!({
            "title": name,
            "description": "",
            "widgets": [
                {"type": "short_answer", "uid": "w1", "props": {"question": "Name?"}}
            ]
        }))
        .unwrap();
        Form {
            id: FormId::new(),
            name: name.to_string(),
            creator: creator.to_string(),
            timestamp: Utc::now(),
            pages: vec![page],
            require_login: true,
            collect_email: false,
            single_response: true,
            is_closed: false,
            close_on: Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
            response_token: "secret-token".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);
        let form = make_form("A", "Survey");
        repo.create(&form).await.unwrap();

        let fetched = repo.get_by_id(&form.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, form.id);
        assert_eq!(fetched.name, "Survey");
        assert_eq!(fetched.creator, "A");
        assert_eq!(fetched.pages, form.pages);
        assert_eq!(fetched.response_token, "secret-token");
        assert_eq!(fetched.close_on, form.close_on);
        assert_eq!(fetched.timestamp, form.timestamp);
        assert!(fetched.require_login);
        assert!(fetched.single_response);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);
        assert!(repo.get_by_id(&FormId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_owned_requires_matching_creator() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);
        let form = make_form("A", "Survey");
        repo.create(&form).await.unwrap();

        assert!(repo.find_owned(&form.id, "A").await.unwrap().is_some());
        assert!(repo.find_owned(&form.id, "B").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_owned_keeps_server_fields() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);
        let form = make_form("A", "Survey");
        repo.create(&form).await.unwrap();

        let mut edited = make_form("A", "Edited");
        edited.response_token = "other".to_string();
        edited.timestamp = form.timestamp + Duration::days(3);
        edited.close_on = None;
        edited.is_closed = true;

        assert!(!repo.replace_owned(&form.id, "B", &edited).await.unwrap());
        assert!(repo.replace_owned(&form.id, "A", &edited).await.unwrap());

        let fetched = repo.get_by_id(&form.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Edited");
        assert!(fetched.is_closed);
        assert!(fetched.close_on.is_none());
        assert_eq!(fetched.response_token, "secret-token");
        assert_eq!(fetched.timestamp, form.timestamp);
        assert_eq!(fetched.creator, "A");
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);
        let form = make_form("A", "Survey");
        repo.create(&form).await.unwrap();

        repo.delete(&form.id).await.unwrap();
        assert!(repo.get_by_id(&form.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&form.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_by_creator_newest_first() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);
        let mut older = make_form("A", "Older");
        older.timestamp = Utc::now() - Duration::hours(2);
        let newer = make_form("A", "Newer");
        let other = make_form("B", "Other");
        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();
        repo.create(&other).await.unwrap();

        let listed = repo.list_by_creator("A").await.unwrap();
        let names: Vec<&str> = listed.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Newer", "Older"]);
        assert_eq!(listed[0].token, "secret-token");
        assert!(repo.list_by_creator("C").await.unwrap().is_empty());
    }
}
