use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};
use service::auth::errors::AuthError;

use crate::errors::AppError;

// Prometheus metrics (default registry)
pub static REGISTRATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "auth_register_requests_total",
        "Registration requests by outcome",
        &["outcome"]
    )
    .expect("register auth_register_requests_total")
});

pub static HTTP_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "auth_http_errors_total",
        "Error responses rendered by the global error handler",
        &["status"]
    )
    .expect("register auth_http_errors_total")
});

/// Label for a finished registration request.
pub fn registration_outcome<T>(result: &Result<T, AppError>) -> &'static str {
    match result {
        Ok(_) => "created",
        Err(AppError::Payload(_)) => "invalid_body",
        Err(AppError::Auth(AuthError::Validation(_))) => "invalid",
        Err(AppError::Auth(AuthError::Conflict)) => "conflict",
        Err(_) => "error",
    }
}

pub fn record_registration<T>(result: &Result<T, AppError>) {
    REGISTRATIONS_TOTAL.with_label_values(&[registration_outcome(result)]).inc();
}

pub fn record_http_error(status: StatusCode) {
    HTTP_ERRORS_TOTAL.with_label_values(&[status.as_str()]).inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
