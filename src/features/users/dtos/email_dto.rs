use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request DTO for Gmail validation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ValidateEmailRequestDto {
    /// Address to check; surrounding whitespace and case are ignored
    #[schema(example = "User.Name+tag@gmail.com")]
    #[validate(length(min = 1, max = 254, message = "email must be 1-254 characters"))]
    pub email: String,
}

/// Result of a Gmail validation
///
/// Returned with 200 for both accepted and rejected addresses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailValidationResponseDto {
    /// Normalized (trimmed, lowercased) email
    pub email: String,
    pub is_valid: bool,
    pub message: String,
}
