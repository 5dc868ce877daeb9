use axum::{
    extract::Request,
    http::{StatusCode, Uri},
    routing::get,
    Json, Router,
};
use tower_http::trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};
use utoipa::OpenApi;

use common::types::Health;
use common::utils::logging::SERVICE_NAME;

use crate::errors::{self, AppError};
use crate::metrics;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod auth;

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Liveness text", body = String)))]
pub async fn root() -> &'static str {
    "Okay!"
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service healthy", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Always fails; exercises the error path end to end.
async fn handle_error() -> Result<(), AppError> {
    Err(AppError::Internal("Simulated server error".into()))
}

async fn metrics_endpoint() -> (StatusCode, String) {
    metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Span wrapping every record emitted while serving `req`.
pub fn request_span(req: &Request) -> Span {
    tracing::info_span!(
        "request",
        service = SERVICE_NAME,
        method = %req.method(),
        uri = %req.uri(),
        version = ?req.version(),
    )
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let policy = state.errors;

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/handle-error", get(handle_error))
        .route("/metrics", get(metrics_endpoint))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/auth", auth::router())
        .fallback(not_found)
        .with_state(state);

    errors::with_error_handling(app, policy).layer(
        TraceLayer::new_for_http()
            .make_span_with(request_span)
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            // 5xx are also logged by the error handler with their correlation id
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
