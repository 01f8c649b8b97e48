use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for files
#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: i64,
    /// Generated storage name (`<uuid>.<ext>`)
    pub filename: String,
    /// Client-supplied name, display only
    pub original_filename: String,
    /// Where the payload lives on disk; never exposed through the API
    pub file_path: String,
    pub file_size: i64,
    pub content_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub user_id: i64,
}
