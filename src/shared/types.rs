use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every non-2xx API response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Short error category
    pub error: String,
    /// Human-readable detail safe to show to the caller
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            error: error.into(),
            detail,
        }
    }
}

/// Plain confirmation body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
