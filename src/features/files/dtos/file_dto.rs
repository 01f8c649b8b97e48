use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::files::models::File;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload (max 10MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Gmail address of a previously validated user
    #[schema(example = "user.name+tag@gmail.com")]
    pub email: String,
}

/// An upload as received from the client, before it is stored
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub data: Vec<u8>,
    pub original_filename: String,
    pub content_type: Option<String>,
}

/// Response DTO for a completed upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileUploadResponseDto {
    pub id: i64,
    /// Generated storage name
    pub filename: String,
    /// Filename as uploaded
    pub original_filename: String,
    /// Size of the file in bytes
    pub file_size: i64,
    pub content_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub message: String,
}

/// Per-file metadata in listings (the storage path stays internal)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileMetadataDto {
    pub id: i64,
    pub filename: String,
    pub original_filename: String,
    pub file_size: i64,
    pub content_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// All files of one user, newest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserFilesResponseDto {
    pub email: String,
    pub total_files: usize,
    pub files: Vec<FileMetadataDto>,
}

/// Form body of the delete endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileFormDto {
    /// Owner's Gmail address
    pub email: String,
}

impl From<File> for FileMetadataDto {
    fn from(f: File) -> Self {
        Self {
            id: f.id,
            filename: f.filename,
            original_filename: f.original_filename,
            file_size: f.file_size,
            content_type: f.content_type,
            uploaded_at: f.uploaded_at,
        }
    }
}

impl FileUploadResponseDto {
    pub fn from_file(f: File, message: impl Into<String>) -> Self {
        Self {
            id: f.id,
            filename: f.filename,
            original_filename: f.original_filename,
            file_size: f.file_size,
            content_type: f.content_type,
            uploaded_at: f.uploaded_at,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_omits_storage_path() {
        let file = File {
            id: 1,
            filename: "abc.pdf".to_string(),
            original_filename: "report.pdf".to_string(),
            file_path: "uploads/abc.pdf".to_string(),
            file_size: 5,
            content_type: Some("application/pdf".to_string()),
            uploaded_at: Utc::now(),
            user_id: 1,
        };

        let json = serde_json::to_value(FileMetadataDto::from(file)).unwrap();
        assert!(json.get("file_path").is_none());
        assert_eq!(json["original_filename"], "report.pdf");
        assert_eq!(json["file_size"], 5);
    }
}
