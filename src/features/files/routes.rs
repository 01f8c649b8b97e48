use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers;
use crate::features::files::services::FileService;
use crate::shared::constants::{MAX_FILE_SIZE, MULTIPART_OVERHEAD};

/// Create routes for the files feature (mounted under `/api/v1`)
///
/// `GET /files/{gmail}` and `DELETE /files/{file_id}` share one path pattern;
/// the handlers interpret the segment differently.
pub fn routes(file_service: Arc<FileService>, deletion_enabled: bool) -> Router {
    let files_route = get(handlers::list_files);
    let files_route = if deletion_enabled {
        files_route.delete(handlers::delete_file)
    } else {
        files_route.delete(handlers::delete_file_disabled)
    };

    Router::new()
        .route(
            "/upload-file",
            // Allow body size up to MAX_FILE_SIZE + buffer for multipart overhead
            post(handlers::upload_file).layer(DefaultBodyLimit::max(
                MAX_FILE_SIZE + MULTIPART_OVERHEAD,
            )),
        )
        .route("/files/{key}", files_route)
        .with_state(file_service)
}
