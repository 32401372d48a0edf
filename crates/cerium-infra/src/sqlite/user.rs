//! SQLite user profile repository implementation.

use chrono::Utc;

use cerium_core::repository::user::UserRepository;
use cerium_types::error::RepositoryError;
use cerium_types::identity::UserProfile;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, query_error};

/// SQLite-backed implementation of `UserRepository`.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn upsert(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO users (roll_number, id, first_name, last_name, profile_picture, email, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(roll_number) DO UPDATE SET
                id = excluded.id,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                profile_picture = excluded.profile_picture,
                email = excluded.email,
                updated_at = excluded.updated_at",
        )
        .bind(&profile.roll_number)
        .bind(profile.id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.profile_picture)
        .bind(&profile.email)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn get(&self, roll_number: &str) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE roll_number = ?")
            .bind(roll_number)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(UserProfile {
            id: row.try_get("id").map_err(query_error)?,
            first_name: row.try_get("first_name").map_err(query_error)?,
            last_name: row.try_get("last_name").map_err(query_error)?,
            roll_number: row.try_get("roll_number").map_err(query_error)?,
            profile_picture: row.try_get("profile_picture").map_err(query_error)?,
            email: row.try_get("email").map_err(query_error)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;

    fn profile(email: &str) -> UserProfile {
        UserProfile {
            id: 42,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            roll_number: "170070001".to_string(),
            profile_picture: String::new(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_replaces() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.upsert(&profile("old@example.com")).await.unwrap();
        repo.upsert(&profile("new@example.com")).await.unwrap();

        let stored = repo.get("170070001").await.unwrap().unwrap();
        assert_eq!(stored, profile("new@example.com"));
        assert!(repo.get("unknown").await.unwrap().is_none());
    }
}
