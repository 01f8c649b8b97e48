use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use minijinja::context;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::files::dtos::FileMetadataDto;
use crate::frontend::client::{BackendClient, BackendReply, ProxyError};
use crate::frontend::flash::{self, redirect_with_flash, FlashMessage};
use crate::frontend::templates::Templates;
use crate::shared::constants::MSG_FILE_TOO_LARGE;
use crate::shared::validation::{is_valid_gmail, normalize_email};

pub const MSG_EMPTY_EMAIL: &str = "Please enter an email address";
pub const MSG_GMAIL_ONLY: &str = "Only Gmail addresses are allowed";
pub const MSG_BACKEND_DOWN: &str = "Backend server is not running. Please start the API server.";
pub const MSG_NO_FILE_SELECTED: &str = "No file selected";
pub const MSG_UPLOAD_OK: &str = "File uploaded successfully!";
pub const MSG_UPLOAD_FAILED: &str = "File upload failed";
pub const MSG_DELETE_OK: &str = "File deleted successfully!";
pub const MSG_DELETE_FAILED: &str = "File deletion failed";

const FRONTEND_NAME: &str = "gmail-upload-frontend";

/// Shared state of the frontend handlers
#[derive(Clone)]
pub struct FrontendState {
    pub client: Arc<BackendClient>,
    pub templates: Arc<Templates>,
    pub deletion_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    #[serde(default)]
    pub email: String,
}

fn dashboard_path(email: &str) -> String {
    format!("/dashboard/{}", urlencoding::encode(email))
}

/// Message for a call the backend refused, preferring its `detail`
fn rejection_message(prefix: &str, detail: Option<String>, fallback: &str) -> String {
    match detail {
        Some(detail) => format!("{}: {}", prefix, detail),
        None => fallback.to_string(),
    }
}

/// Flash for a browser upload that could not be read; oversized bodies get the size-limit message
fn upload_read_error(e: MultipartError) -> FlashMessage {
    debug!("Failed to read upload form: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        FlashMessage::error(format!("Upload failed: {}", MSG_FILE_TOO_LARGE))
    } else {
        FlashMessage::error(MSG_UPLOAD_FAILED)
    }
}

/// Render a page and expire the flash cookie its messages came from
fn render_page(
    state: &FrontendState,
    name: &str,
    ctx: minijinja::Value,
) -> Result<Response, AppError> {
    let html = state.templates.render(name, ctx).map_err(|e| {
        tracing::error!("Failed to render {}: {}", name, e);
        AppError::Internal(e.to_string())
    })?;

    let mut response = Html(html).into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, flash::clear_cookie());
    Ok(response)
}

/// `GET /` - email form
pub async fn index(
    State(state): State<FrontendState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let flashes = flash::read_flashes(&headers);
    render_page(&state, "index.html", context! { flashes })
}

/// `POST /validate-email`
pub async fn validate_email(
    State(state): State<FrontendState>,
    Form(form): Form<EmailForm>,
) -> Response {
    let email = normalize_email(&form.email);

    if email.is_empty() {
        return redirect_with_flash("/", FlashMessage::error(MSG_EMPTY_EMAIL));
    }
    if !is_valid_gmail(&email) {
        return redirect_with_flash("/", FlashMessage::error(MSG_GMAIL_ONLY));
    }

    match state.client.validate_email(&email).await {
        Ok(BackendReply::Ok(result)) if result.is_valid => {
            tracing::info!("Email validated, opening dashboard");
            Redirect::to(&dashboard_path(&result.email)).into_response()
        }
        Ok(BackendReply::Ok(result)) => redirect_with_flash(
            "/",
            FlashMessage::error(format!("Validation failed: {}", result.message)),
        ),
        Ok(BackendReply::Rejected { detail, .. }) => redirect_with_flash(
            "/",
            FlashMessage::error(rejection_message(
                "Validation failed",
                detail,
                "Email validation failed",
            )),
        ),
        Err(ProxyError::Unreachable(_)) => {
            redirect_with_flash("/", FlashMessage::error(MSG_BACKEND_DOWN))
        }
        Err(ProxyError::Unexpected(e)) => {
            debug!("Validation proxy error: {}", e);
            redirect_with_flash("/", FlashMessage::error("Email validation failed"))
        }
    }
}

/// `GET /dashboard/{email}` - upload form and file list
pub async fn dashboard(
    State(state): State<FrontendState>,
    Path(email): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let email = normalize_email(&email);
    let mut flashes = flash::read_flashes(&headers);

    let files: Vec<FileMetadataDto> = match state.client.list_files(&email).await {
        Ok(BackendReply::Ok(listing)) => listing.files,
        Ok(BackendReply::Rejected { status, detail }) => {
            debug!("Listing rejected with {}: {:?}", status, detail);
            Vec::new()
        }
        Err(ProxyError::Unreachable(_)) => {
            flashes.push(FlashMessage::error(MSG_BACKEND_DOWN));
            Vec::new()
        }
        Err(ProxyError::Unexpected(e)) => {
            debug!("Listing proxy error: {}", e);
            Vec::new()
        }
    };

    let email_path = urlencoding::encode(&email).into_owned();

    render_page(
        &state,
        "dashboard.html",
        context! {
            email,
            email_path,
            flashes,
            files,
            deletion_enabled => state.deletion_enabled,
        },
    )
}

/// `POST /upload-file/{email}` - forward the chosen file to the backend
pub async fn upload_file(
    State(state): State<FrontendState>,
    Path(email): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let email = normalize_email(&email);
    let back = dashboard_path(&email);

    let mut selected: Option<(String, Option<String>, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return redirect_with_flash(&back, upload_read_error(e)),
        };

        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let data = match field.bytes().await {
            Ok(data) => data.to_vec(),
            Err(e) => return redirect_with_flash(&back, upload_read_error(e)),
        };
        selected = Some((filename, content_type, data));
    }

    let (filename, content_type, data) = match selected {
        Some(file) if !file.0.is_empty() => file,
        _ => return redirect_with_flash(&back, FlashMessage::error(MSG_NO_FILE_SELECTED)),
    };

    let message = match state
        .client
        .upload_file(&email, &filename, data, content_type.as_deref())
        .await
    {
        Ok(BackendReply::Ok(uploaded)) => {
            tracing::info!("Uploaded file {} ({} bytes)", uploaded.id, uploaded.file_size);
            FlashMessage::success(MSG_UPLOAD_OK)
        }
        Ok(BackendReply::Rejected { detail, .. }) => FlashMessage::error(rejection_message(
            "Upload failed",
            detail,
            MSG_UPLOAD_FAILED,
        )),
        Err(ProxyError::Unreachable(_)) => FlashMessage::error(MSG_BACKEND_DOWN),
        Err(ProxyError::Unexpected(e)) => {
            debug!("Upload proxy error: {}", e);
            FlashMessage::error(MSG_UPLOAD_FAILED)
        }
    };

    redirect_with_flash(&back, message)
}

/// `POST /delete-file/{email}/{file_id}`
pub async fn delete_file(
    State(state): State<FrontendState>,
    Path((email, file_id)): Path<(String, i64)>,
) -> Response {
    let email = normalize_email(&email);
    let back = dashboard_path(&email);

    let message = match state.client.delete_file(&email, file_id).await {
        Ok(BackendReply::Ok(_)) => FlashMessage::success(MSG_DELETE_OK),
        Ok(BackendReply::Rejected { detail, .. }) => FlashMessage::error(rejection_message(
            "Delete failed",
            detail,
            MSG_DELETE_FAILED,
        )),
        Err(ProxyError::Unreachable(_)) => FlashMessage::error(MSG_BACKEND_DOWN),
        Err(ProxyError::Unexpected(e)) => {
            debug!("Delete proxy error: {}", e);
            FlashMessage::error(MSG_DELETE_FAILED)
        }
    };

    redirect_with_flash(&back, message)
}

/// `GET /health` - frontend liveness plus backend reachability
pub async fn health(State(state): State<FrontendState>) -> Response {
    if state.client.is_healthy().await {
        Json(json!({
            "status": "healthy",
            "frontend": FRONTEND_NAME,
            "backend": "connected",
        }))
        .into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "frontend": FRONTEND_NAME,
                "backend": "disconnected",
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message() {
        assert_eq!(
            rejection_message("Upload failed", Some("No file provided".to_string()), "x"),
            "Upload failed: No file provided"
        );
        assert_eq!(
            rejection_message("Upload failed", None, MSG_UPLOAD_FAILED),
            MSG_UPLOAD_FAILED
        );
    }

    #[test]
    fn test_dashboard_path_encodes_email() {
        assert_eq!(
            dashboard_path("user+tag@gmail.com"),
            "/dashboard/user%2Btag%40gmail.com"
        );
    }
}
