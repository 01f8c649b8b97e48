use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::core::error::Result;
use crate::features::users::models::User;
use crate::shared::validation::normalize_email;

/// Service for user registration and lookup
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the user for `email`, creating it on first sight
    ///
    /// Idempotent: concurrent or repeated calls for the same email resolve to
    /// the same row because the insert yields to the unique constraint.
    pub async fn get_or_create_user(&self, email: &str) -> Result<User> {
        let email = normalize_email(email);

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (email, is_validated, created_at)
            VALUES (?1, TRUE, ?2)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(&email)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, is_validated, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(&email)
        .fetch_one(&self.pool)
        .await?;

        if inserted > 0 {
            info!("User registered: id={}, email={}", user.id, user.email);
        } else {
            debug!("User already registered: id={}", user.id);
        }

        Ok(user)
    }

    /// Look up a user by email without creating it
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, is_validated, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Number of registered users
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_pool;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (_dir, pool) = test_pool().await;
        let service = UserService::new(pool);

        let first = service.get_or_create_user("john@gmail.com").await.unwrap();
        let second = service.get_or_create_user("john@gmail.com").await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(first.is_validated);
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_normalizes_email() {
        let (_dir, pool) = test_pool().await;
        let service = UserService::new(pool);

        let a = service
            .get_or_create_user("  User.Name+tag@Gmail.com ")
            .await
            .unwrap();
        let b = service
            .get_or_create_user("user.name+tag@gmail.com")
            .await
            .unwrap();

        assert_eq!(a.id, b.id);
        assert_eq!(a.email, "user.name+tag@gmail.com");
    }

    #[tokio::test]
    async fn test_concurrent_get_or_create_yields_one_row() {
        let (_dir, pool) = test_pool().await;
        let service = std::sync::Arc::new(UserService::new(pool));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.get_or_create_user("race@gmail.com").await.unwrap().id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.dedup();

        assert_eq!(ids.len(), 1);
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let (_dir, pool) = test_pool().await;
        let service = UserService::new(pool);

        assert!(service.find_by_email("nobody@gmail.com").await.unwrap().is_none());

        let created = service.get_or_create_user("somebody@gmail.com").await.unwrap();
        let found = service
            .find_by_email("SOMEBODY@gmail.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.id, found.id);
    }
}
