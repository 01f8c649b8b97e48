/// API route prefix for the versioned endpoints
pub const API_PREFIX: &str = "/api/v1";

/// Maximum upload size in bytes (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Slack allowed on top of MAX_FILE_SIZE for multipart framing and text fields
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

pub const MSG_INVALID_GMAIL: &str = "Invalid Gmail format";
pub const MSG_VALID_GMAIL: &str = "Valid Gmail address";
pub const MSG_EMAIL_NOT_VALIDATED: &str = "Email not validated. Please validate email first.";
pub const MSG_NO_FILE: &str = "No file provided";
pub const MSG_FILE_TOO_LARGE: &str = "File size exceeds maximum limit of 10MB";
pub const MSG_FILE_UPLOADED: &str = "File uploaded successfully";
pub const MSG_FILE_DELETED: &str = "File deleted successfully";
pub const MSG_FILE_NOT_FOUND: &str = "File not found or access denied";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_message_matches_limit() {
        let megabytes = MAX_FILE_SIZE / (1024 * 1024);
        assert!(MSG_FILE_TOO_LARGE.ends_with(&format!("{}MB", megabytes)));
    }
}
