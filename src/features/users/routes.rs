use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

/// Create routes for the users feature (mounted under `/api/v1`)
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/validate-email", post(handlers::validate_email))
        .with_state(service)
}
