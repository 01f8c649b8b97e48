//! HTML frontend that proxies every user action to the API.
//!
//! ## Pages
//!
//! | Method | Path | Backend call |
//! |--------|------|--------------|
//! | GET | `/` | none |
//! | POST | `/validate-email` | `POST /validate-email` |
//! | GET | `/dashboard/{email}` | `GET /files/{gmail}` |
//! | POST | `/upload-file/{email}` | `POST /upload-file` |
//! | POST | `/delete-file/{email}/{file_id}` | `DELETE /files/{file_id}` |
//! | GET | `/health` | `GET /health` |

pub mod client;
pub mod flash;
pub mod handlers;
pub mod routes;
pub mod templates;

use std::sync::Arc;

use crate::core::config::FrontendConfig;
use crate::core::error::AppError;

pub use client::BackendClient;
pub use handlers::FrontendState;
pub use routes::routes;
pub use templates::Templates;

impl FrontendState {
    pub fn from_config(config: &FrontendConfig) -> Result<Self, AppError> {
        let client = BackendClient::new(config)?;
        tracing::info!("Backend client targeting {}", client.base_url());

        let templates =
            Templates::new().map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            templates: Arc::new(templates),
            deletion_enabled: config.deletion_enabled,
        })
    }
}
