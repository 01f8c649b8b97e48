use utoipa::{Modify, OpenApi};

use crate::core::app;
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        users_handlers::validate_email,
        // Files
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::delete_file,
        // Service
        app::health_check,
        app::api_info,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            MessageResponse,
            // Users
            users_dtos::ValidateEmailRequestDto,
            users_dtos::EmailValidationResponseDto,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileUploadResponseDto,
            files_dtos::FileMetadataDto,
            files_dtos::UserFilesResponseDto,
            files_dtos::DeleteFileFormDto,
            // Service
            app::HealthResponse,
            app::ApiInfoResponse,
        )
    ),
    tags(
        (name = "users", description = "Gmail validation and registration"),
        (name = "files", description = "File upload and listing"),
        (name = "service", description = "Liveness and API information"),
    ),
    info(
        title = "Gmail File Upload API",
        version = "1.0.0",
        description = "Backend API for Gmail-based file upload and storage system",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
