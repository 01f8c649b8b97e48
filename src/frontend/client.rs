//! HTTP client for the backend API
//!
//! Every frontend action maps to exactly one call here. Transport failures are
//! reported as [`ProxyError::Unreachable`] so pages can degrade to a notice.

use reqwest::{multipart, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::core::config::FrontendConfig;
use crate::core::error::AppError;
use crate::features::files::dtos::{FileUploadResponseDto, UserFilesResponseDto};
use crate::features::users::dtos::EmailValidationResponseDto;
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Unexpected backend response: {0}")]
    Unexpected(String),
}

/// What the backend answered, when it answered at all
#[derive(Debug)]
pub enum BackendReply<T> {
    Ok(T),
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
}

/// Client for the `/api/v1` backend
pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: String,
    health_url: Url,
}

impl BackendClient {
    pub fn new(config: &FrontendConfig) -> Result<Self, AppError> {
        let base = Url::parse(&config.backend_url)
            .map_err(|e| AppError::Internal(format!("Invalid BACKEND_URL: {}", e)))?;
        // Health lives at the backend root, outside the API prefix
        let health_url = base
            .join("/health")
            .map_err(|e| AppError::Internal(format!("Invalid BACKEND_URL: {}", e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(config.backend_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            health_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /validate-email`
    pub async fn validate_email(
        &self,
        email: &str,
    ) -> Result<BackendReply<EmailValidationResponseDto>, ProxyError> {
        let url = format!("{}/validate-email", self.base_url);

        tracing::debug!("Forwarding email validation to {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(send_error)?;

        into_reply(response).await
    }

    /// `GET /files/{gmail}`
    pub async fn list_files(
        &self,
        email: &str,
    ) -> Result<BackendReply<UserFilesResponseDto>, ProxyError> {
        let url = format!("{}/files/{}", self.base_url, urlencoding::encode(email));

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(send_error)?;

        into_reply(response).await
    }

    /// `POST /upload-file` as multipart
    pub async fn upload_file(
        &self,
        email: &str,
        filename: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<BackendReply<FileUploadResponseDto>, ProxyError> {
        let url = format!("{}/upload-file", self.base_url);

        let mut part = multipart::Part::bytes(data).file_name(filename.to_string());
        if let Some(ct) = content_type {
            part = match part.mime_str(ct) {
                Ok(part) => part,
                Err(e) => {
                    tracing::debug!("Unparseable content type '{}': {}", ct, e);
                    return Err(ProxyError::Unexpected(format!(
                        "Invalid content type: {}",
                        ct
                    )));
                }
            };
        }

        let form = multipart::Form::new()
            .text("email", email.to_string())
            .part("file", part);

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;

        into_reply(response).await
    }

    /// `DELETE /files/{file_id}` with the owner email as form data
    pub async fn delete_file(
        &self,
        email: &str,
        file_id: i64,
    ) -> Result<BackendReply<MessageResponse>, ProxyError> {
        let url = format!("{}/files/{}", self.base_url, file_id);

        let response = self
            .http_client
            .delete(&url)
            .form(&[("email", email)])
            .send()
            .await
            .map_err(send_error)?;

        into_reply(response).await
    }

    /// Best-effort probe of the backend's `/health`
    pub async fn is_healthy(&self) -> bool {
        match self.http_client.get(self.health_url.clone()).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                tracing::warn!("Backend health probe failed: {}", e);
                false
            }
        }
    }
}

fn send_error(e: reqwest::Error) -> ProxyError {
    if e.is_builder() {
        ProxyError::Unexpected(e.to_string())
    } else {
        tracing::warn!("Backend request failed: {}", e);
        ProxyError::Unreachable(e.to_string())
    }
}

async fn into_reply<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<BackendReply<T>, ProxyError> {
    let status = response.status();

    if status.is_success() {
        let body = response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse backend response: {}", e);
            ProxyError::Unexpected(format!("Failed to parse backend response: {}", e))
        })?;
        return Ok(BackendReply::Ok(body));
    }

    let detail = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|e| e.detail);

    tracing::debug!("Backend rejected request: HTTP {} ({:?})", status, detail);

    Ok(BackendReply::Rejected { status, detail })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(url: &str) -> FrontendConfig {
        FrontendConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            backend_url: url.to_string(),
            backend_timeout: Duration::from_secs(2),
            deletion_enabled: false,
        }
    }

    #[test]
    fn test_health_url_is_at_backend_root() {
        let client = BackendClient::new(&config("http://backend-service:8000/api/v1/")).unwrap();
        assert_eq!(client.health_url.as_str(), "http://backend-service:8000/health");
        assert_eq!(client.base_url(), "http://backend-service:8000/api/v1");
    }

    #[test]
    fn test_invalid_backend_url() {
        assert!(BackendClient::new(&config("not a url")).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Nothing listens on a port we just released
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = BackendClient::new(&config(&format!("http://{}/api/v1", addr))).unwrap();

        let result = client.validate_email("x@gmail.com").await;
        assert!(matches!(result, Err(ProxyError::Unreachable(_))));
        assert!(!client.is_healthy().await);
    }
}
