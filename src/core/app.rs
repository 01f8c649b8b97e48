//! Assembly of the API router from its services.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::{AppConfig, StorageConfig, SwaggerConfig};
use crate::core::error::AppError;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::files::{routes as files_routes, FileService};
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::storage::LocalStorage;
use crate::shared::constants::API_PREFIX;

/// Services shared by the API handlers
#[derive(Clone)]
pub struct ApiServices {
    pub user_service: Arc<UserService>,
    pub file_service: Arc<FileService>,
}

impl ApiServices {
    /// Wire the services on top of a migrated pool and the upload directory
    pub async fn init(pool: SqlitePool, storage: StorageConfig) -> Result<Self, AppError> {
        let storage = Arc::new(LocalStorage::new(storage).await?);

        let user_service = Arc::new(UserService::new(pool.clone()));
        tracing::info!(
            "User service initialized ({} registered users)",
            user_service.count().await?
        );

        let file_service = Arc::new(FileService::new(
            pool,
            storage,
            Arc::clone(&user_service),
        ));
        tracing::info!("File service initialized");

        Ok(Self {
            user_service,
            file_service,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiInfoResponse {
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running", body = HealthResponse)),
    tag = "service"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Gmail File Upload API is running".to_string(),
    })
}

/// API information
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "API name, version and endpoints", body = ApiInfoResponse)),
    tag = "service"
)]
pub async fn api_info() -> Json<ApiInfoResponse> {
    let endpoints = [
        ("validate_email", format!("{}/validate-email", API_PREFIX)),
        ("upload_file", format!("{}/upload-file", API_PREFIX)),
        ("get_files", format!("{}/files/{{gmail}}", API_PREFIX)),
        ("docs", "/docs".to_string()),
        ("redoc", "/redoc".to_string()),
        ("health", "/health".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    Json(ApiInfoResponse {
        message: "Gmail File Upload API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

/// Build the full API router with docs, tracing and CORS
pub fn router(services: ApiServices, app: &AppConfig, swagger: &SwaggerConfig) -> Router {
    let mut openapi = ApiDoc::openapi();
    SwaggerInfoModifier {
        title: swagger.title.clone(),
        version: swagger.version.clone(),
        description: swagger.description.clone(),
    }
    .modify(&mut openapi);

    if app.file_deletion_enabled {
        tracing::info!("File deletion endpoint enabled");
    }

    let api_routes = Router::new()
        .merge(users_routes(Arc::clone(&services.user_service)))
        .merge(files_routes(
            Arc::clone(&services.file_service),
            app.file_deletion_enabled,
        ));

    Router::new()
        .merge(Redoc::with_url("/redoc", openapi.clone()))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi))
        .nest(API_PREFIX, api_routes)
        .route("/health", get(health_check))
        .route("/", get(api_info))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(middleware::cors_layer(&app.cors_allowed_origins))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
