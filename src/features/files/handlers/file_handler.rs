use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{FormRejection, PathRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    Form, Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::files::dtos::{
    DeleteFileFormDto, FileMetadataDto, FileUploadResponseDto, NewUpload, UploadFileDto,
    UserFilesResponseDto,
};
use crate::features::files::services::{DeleteOutcome, FileService};
use crate::shared::constants::{
    MSG_FILE_DELETED, MSG_FILE_NOT_FOUND, MSG_FILE_TOO_LARGE, MSG_FILE_UPLOADED, MSG_INVALID_GMAIL, MSG_NO_FILE,
};
use crate::shared::types::{ErrorResponse, MessageResponse};
use crate::shared::validation::{is_valid_gmail, normalize_email};

/// Body-limit overruns carry the size-limit message; other read failures are 400
fn multipart_error(e: MultipartError, context: &str) -> AppError {
    debug!("{}: {}", context, e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(MSG_FILE_TOO_LARGE.to_string())
    } else {
        AppError::BadRequest(format!("{}: {}", context, e))
    }
}

/// Upload a file
///
/// Accepts multipart/form-data with:
/// - `file`: The file to upload (required, max 10MB)
/// - `email`: Gmail address that was validated before (required)
#[utoipa::path(
    post,
    path = "/api/v1/upload-file",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File plus the owner's validated Gmail address",
    ),
    responses(
        (status = 200, description = "File uploaded successfully", body = FileUploadResponseDto),
        (status = 400, description = "Invalid or unregistered email, missing file, or file too large", body = ErrorResponse),
        (status = 500, description = "Unexpected error", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<Json<FileUploadResponseDto>, AppError> {
    let mut upload: Option<NewUpload> = None;
    let mut email = String::new();

    // Process multipart fields
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to read multipart data"))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let content_type = field.content_type().map(|s| s.to_string());
                let original_filename = field.file_name().unwrap_or("").to_string();

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "Failed to read file data"))?;

                upload = Some(NewUpload {
                    data: data.to_vec(),
                    original_filename,
                    content_type,
                });
            }
            "email" => {
                email = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read email field: {}", e))
                })?;
            }
            _ => {
                // Ignore unknown fields
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let owner = service.resolve_uploader(&email).await?;

    let upload = upload.ok_or_else(|| AppError::BadRequest(MSG_NO_FILE.to_string()))?;

    let file = service.save_file(&owner, upload).await?;

    Ok(Json(FileUploadResponseDto::from_file(file, MSG_FILE_UPLOADED)))
}

/// List a user's files
///
/// Files are ordered newest first. An email with no registered user yields an
/// empty list.
#[utoipa::path(
    get,
    path = "/api/v1/files/{gmail}",
    tag = "files",
    params(
        ("gmail" = String, Path, description = "Owner's Gmail address")
    ),
    responses(
        (status = 200, description = "Files of the user", body = UserFilesResponseDto),
        (status = 400, description = "Invalid Gmail format", body = ErrorResponse),
        (status = 500, description = "Unexpected error", body = ErrorResponse)
    )
)]
pub async fn list_files(
    State(service): State<Arc<FileService>>,
    Path(gmail): Path<String>,
) -> Result<Json<UserFilesResponseDto>, AppError> {
    let email = normalize_email(&gmail);
    if !is_valid_gmail(&email) {
        return Err(AppError::BadRequest(MSG_INVALID_GMAIL.to_string()));
    }

    let files: Vec<FileMetadataDto> = service
        .list_files(&email)
        .await?
        .into_iter()
        .map(FileMetadataDto::from)
        .collect();

    Ok(Json(UserFilesResponseDto {
        email,
        total_files: files.len(),
        files,
    }))
}

/// Delete one of the user's files
///
/// Answers 404 both when the file does not exist and when it belongs to
/// someone else.
#[utoipa::path(
    delete,
    path = "/api/v1/files/{file_id}",
    tag = "files",
    params(
        ("file_id" = i64, Path, description = "File identifier")
    ),
    request_body(
        content = DeleteFileFormDto,
        content_type = "application/x-www-form-urlencoded",
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 400, description = "Invalid Gmail format", body = ErrorResponse),
        (status = 404, description = "File not found or access denied", body = ErrorResponse),
        (status = 422, description = "Malformed file id or form", body = ErrorResponse)
    )
)]
pub async fn delete_file(
    State(service): State<Arc<FileService>>,
    file_id: Result<Path<i64>, PathRejection>,
    form: Result<Form<DeleteFileFormDto>, FormRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(file_id) = file_id.map_err(|e| AppError::UnprocessableEntity(e.body_text()))?;
    let Form(dto) = form.map_err(|e| AppError::UnprocessableEntity(e.body_text()))?;

    let email = normalize_email(&dto.email);
    if !is_valid_gmail(&email) {
        return Err(AppError::BadRequest(MSG_INVALID_GMAIL.to_string()));
    }

    match service.delete_file(file_id, &email).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageResponse::new(MSG_FILE_DELETED))),
        DeleteOutcome::NotFoundOrForbidden => {
            Err(AppError::NotFound(MSG_FILE_NOT_FOUND.to_string()))
        }
    }
}

/// Stand-in for `delete_file` while deletion is switched off
pub async fn delete_file_disabled() -> Result<Json<MessageResponse>, AppError> {
    Err(AppError::NotFound(MSG_FILE_NOT_FOUND.to_string()))
}
