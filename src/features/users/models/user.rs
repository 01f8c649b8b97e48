use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    /// Unique, always stored lowercased
    pub email: String,
    pub is_validated: bool,
    pub created_at: DateTime<Utc>,
}
