use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::middleware;
use crate::frontend::handlers::{self, FrontendState};
use crate::shared::constants::{MAX_FILE_SIZE, MULTIPART_OVERHEAD};

/// Pages and form actions of the frontend
pub fn routes(state: FrontendState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/validate-email", post(handlers::validate_email))
        .route("/dashboard/{email}", get(handlers::dashboard))
        .route(
            "/upload-file/{email}",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(
                MAX_FILE_SIZE + MULTIPART_OVERHEAD,
            )),
        )
        .route(
            "/delete-file/{email}/{file_id}",
            post(handlers::delete_file),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
