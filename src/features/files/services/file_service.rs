use chrono::Utc;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::NewUpload;
use crate::features::files::models::File;
use crate::features::users::models::User;
use crate::features::users::UserService;
use crate::modules::storage::LocalStorage;
use crate::shared::constants::{
    MAX_FILE_SIZE, MSG_EMAIL_NOT_VALIDATED, MSG_FILE_TOO_LARGE, MSG_INVALID_GMAIL, MSG_NO_FILE,
};
use crate::shared::validation::{is_valid_gmail, normalize_email};

/// Result of a delete request
///
/// "Does not exist" and "belongs to someone else" are deliberately the same
/// outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFoundOrForbidden,
}

/// Service for file operations
pub struct FileService {
    pool: SqlitePool,
    storage: Arc<LocalStorage>,
    user_service: Arc<UserService>,
}

impl FileService {
    pub fn new(pool: SqlitePool, storage: Arc<LocalStorage>, user_service: Arc<UserService>) -> Self {
        Self {
            pool,
            storage,
            user_service,
        }
    }

    /// Resolve the registered owner of an upload
    ///
    /// Fails with a client error if the email is not Gmail or was never validated.
    pub async fn resolve_uploader(&self, email: &str) -> Result<User> {
        let email = normalize_email(email);
        if !is_valid_gmail(&email) {
            return Err(AppError::BadRequest(MSG_INVALID_GMAIL.to_string()));
        }

        self.user_service
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::BadRequest(MSG_EMAIL_NOT_VALIDATED.to_string()))
    }

    /// Persist the payload to disk, then record it for `owner`
    ///
    /// The payload is written and synced before the row is inserted. If the
    /// insert fails the payload is removed again; a crash between the two steps
    /// can still leave an orphaned file in the upload directory.
    pub async fn save_file(&self, owner: &User, upload: NewUpload) -> Result<File> {
        if upload.original_filename.trim().is_empty() {
            return Err(AppError::BadRequest(MSG_NO_FILE.to_string()));
        }

        if upload.data.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation(MSG_FILE_TOO_LARGE.to_string()));
        }

        let stored = self
            .storage
            .store(&upload.original_filename, &upload.data)
            .await?;

        let file_path = stored.path.to_string_lossy().to_string();
        let file_size = stored.size as i64;

        let inserted = sqlx::query_as::<_, File>(
            r#"
            INSERT INTO files (filename, original_filename, file_path, file_size, content_type, uploaded_at, user_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, filename, original_filename, file_path, file_size, content_type, uploaded_at, user_id
            "#,
        )
        .bind(&stored.name)
        .bind(&upload.original_filename)
        .bind(&file_path)
        .bind(file_size)
        .bind(&upload.content_type)
        .bind(Utc::now())
        .bind(owner.id)
        .fetch_one(&self.pool)
        .await;

        let file = match inserted {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&stored.path).await {
                    warn!(
                        "Failed to remove orphaned payload {}: {}",
                        stored.path.display(),
                        cleanup
                    );
                }
                return Err(AppError::Database(e));
            }
        };

        info!(
            "File saved: id={}, name={}, size={}, user_id={}",
            file.id, file.filename, file.file_size, file.user_id
        );

        Ok(file)
    }

    /// All files of the user owning `email`, newest first
    ///
    /// An unknown email is not an error: it simply has no files.
    pub async fn list_files(&self, email: &str) -> Result<Vec<File>> {
        let Some(user) = self.user_service.find_by_email(email).await? else {
            debug!("No registered user for listing, returning empty list");
            return Ok(Vec::new());
        };

        let files = sqlx::query_as::<_, File>(
            r#"
            SELECT id, filename, original_filename, file_path, file_size, content_type, uploaded_at, user_id
            FROM files
            WHERE user_id = ?1
            ORDER BY uploaded_at DESC, id DESC
            "#,
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    /// Delete a file owned by the user behind `email`
    ///
    /// Ownership is checked before anything is touched. The payload goes first
    /// (already absent counts as removed), then the row.
    pub async fn delete_file(&self, file_id: i64, email: &str) -> Result<DeleteOutcome> {
        let Some(user) = self.user_service.find_by_email(email).await? else {
            return Ok(DeleteOutcome::NotFoundOrForbidden);
        };

        let file = sqlx::query_as::<_, File>(
            r#"
            SELECT id, filename, original_filename, file_path, file_size, content_type, uploaded_at, user_id
            FROM files
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(file_id)
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(file) = file else {
            return Ok(DeleteOutcome::NotFoundOrForbidden);
        };

        self.storage.remove(Path::new(&file.file_path)).await?;

        sqlx::query("DELETE FROM files WHERE id = ?1 AND user_id = ?2")
            .bind(file.id)
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        info!("File deleted: id={}, user_id={}", file.id, user.id);

        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_pool, test_storage};

    struct Fixture {
        _dir: tempfile::TempDir,
        users: Arc<UserService>,
        files: FileService,
    }

    async fn fixture() -> Fixture {
        let (dir, pool) = test_pool().await;
        let storage = Arc::new(test_storage(&dir).await);
        let users = Arc::new(UserService::new(pool.clone()));
        let files = FileService::new(pool, storage, Arc::clone(&users));
        Fixture {
            _dir: dir,
            users,
            files,
        }
    }

    fn upload(name: &str, data: &[u8]) -> NewUpload {
        NewUpload {
            data: data.to_vec(),
            original_filename: name.to_string(),
            content_type: Some("application/pdf".to_string()),
        }
    }

    #[tokio::test]
    async fn test_resolve_uploader_requires_validation() {
        let fx = fixture().await;

        let err = fx.files.resolve_uploader("new@gmail.com").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == MSG_EMAIL_NOT_VALIDATED));

        let err = fx.files.resolve_uploader("new@yahoo.com").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == MSG_INVALID_GMAIL));

        fx.users.get_or_create_user("new@gmail.com").await.unwrap();
        let user = fx.files.resolve_uploader(" NEW@gmail.com ").await.unwrap();
        assert_eq!(user.email, "new@gmail.com");
    }

    #[tokio::test]
    async fn test_save_file_persists_bytes_and_row() {
        let fx = fixture().await;
        let user = fx.users.get_or_create_user("owner@gmail.com").await.unwrap();

        let file = fx
            .files
            .save_file(&user, upload("report.pdf", b"hello"))
            .await
            .unwrap();

        assert_eq!(file.original_filename, "report.pdf");
        assert_eq!(file.file_size, 5);
        assert_eq!(file.user_id, user.id);
        assert!(file.filename.ends_with(".pdf"));
        assert_ne!(file.filename, "report.pdf");
        assert_eq!(std::fs::read(&file.file_path).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_save_file_size_limit() {
        let fx = fixture().await;
        let user = fx.users.get_or_create_user("big@gmail.com").await.unwrap();

        let exact = vec![0u8; MAX_FILE_SIZE];
        let file = fx.files.save_file(&user, upload("exact.bin", &exact)).await;
        assert!(file.is_ok());

        let over = vec![0u8; MAX_FILE_SIZE + 1];
        let err = fx
            .files
            .save_file(&user, upload("over.bin", &over))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("10MB")),
            other => panic!("unexpected error: {:?}", other),
        }

        assert_eq!(fx.files.list_files("big@gmail.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_file_rejects_empty_filename() {
        let fx = fixture().await;
        let user = fx.users.get_or_create_user("x@gmail.com").await.unwrap();

        let err = fx.files.save_file(&user, upload("", b"abc")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == MSG_NO_FILE));
    }

    #[tokio::test]
    async fn test_list_files_newest_first() {
        let fx = fixture().await;
        let user = fx.users.get_or_create_user("list@gmail.com").await.unwrap();

        let first = fx.files.save_file(&user, upload("a.txt", b"a")).await.unwrap();
        let second = fx.files.save_file(&user, upload("b.txt", b"bb")).await.unwrap();

        let files = fx.files.list_files("list@gmail.com").await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].id, second.id);
        assert_eq!(files[1].id, first.id);
    }

    #[tokio::test]
    async fn test_list_files_unknown_user_is_empty() {
        let fx = fixture().await;
        let files = fx.files.list_files("ghost@gmail.com").await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_delete_checks_ownership() {
        let fx = fixture().await;
        let owner = fx.users.get_or_create_user("owner@gmail.com").await.unwrap();
        fx.users.get_or_create_user("other@gmail.com").await.unwrap();

        let file = fx.files.save_file(&owner, upload("a.txt", b"a")).await.unwrap();

        let outcome = fx.files.delete_file(file.id, "other@gmail.com").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFoundOrForbidden);
        assert!(Path::new(&file.file_path).exists());

        let outcome = fx.files.delete_file(file.id, "nobody@gmail.com").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFoundOrForbidden);

        let outcome = fx.files.delete_file(file.id, "owner@gmail.com").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(!Path::new(&file.file_path).exists());
        assert!(fx.files.list_files("owner@gmail.com").await.unwrap().is_empty());

        let outcome = fx.files.delete_file(file.id, "owner@gmail.com").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFoundOrForbidden);
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_payload() {
        let fx = fixture().await;
        let owner = fx.users.get_or_create_user("owner@gmail.com").await.unwrap();
        let file = fx.files.save_file(&owner, upload("a.txt", b"a")).await.unwrap();

        std::fs::remove_file(&file.file_path).unwrap();

        let outcome = fx.files.delete_file(file.id, "owner@gmail.com").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
    }
}
