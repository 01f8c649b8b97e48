use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::users::dtos::{EmailValidationResponseDto, ValidateEmailRequestDto};
use crate::features::users::services::UserService;
use crate::shared::constants::{MSG_INVALID_GMAIL, MSG_VALID_GMAIL};
use crate::shared::types::ErrorResponse;
use crate::shared::validation::{is_valid_gmail, normalize_email};

/// Validate a Gmail address
///
/// A valid address is registered (get-or-create) as a side effect.
/// An invalid format is not an error: it answers 200 with `is_valid = false`.
#[utoipa::path(
    post,
    path = "/api/v1/validate-email",
    request_body = ValidateEmailRequestDto,
    responses(
        (status = 200, description = "Validation result", body = EmailValidationResponseDto),
        (status = 400, description = "Malformed JSON", body = ErrorResponse),
        (status = 422, description = "Request does not match the schema", body = ErrorResponse),
        (status = 500, description = "Unexpected error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn validate_email(
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<ValidateEmailRequestDto>,
) -> Result<Json<EmailValidationResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let email = normalize_email(&dto.email);

    if !is_valid_gmail(&email) {
        tracing::debug!("Rejected non-Gmail address");
        return Ok(Json(EmailValidationResponseDto {
            email,
            is_valid: false,
            message: MSG_INVALID_GMAIL.to_string(),
        }));
    }

    let user = service.get_or_create_user(&email).await?;

    Ok(Json(EmailValidationResponseDto {
        email: user.email,
        is_valid: true,
        message: MSG_VALID_GMAIL.to_string(),
    }))
}
