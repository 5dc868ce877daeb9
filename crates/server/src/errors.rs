//! Error values for handlers and the global error handler.
//!
//! Handlers return `Result<_, AppError>`. `AppError::into_response` does not
//! write a body: it attaches an [`ErrorReport`] to the response extensions.
//! [`global_error_handler`] is the only place that renders error bodies. It
//! turns the report, or any bare framework error response (unknown route,
//! wrong method, caught panic), into an [`ErrorEnvelope`], logs it, and
//! redacts messages and stacks in production.

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use configs::Environment;
use serde::{Deserialize, Serialize};
use service::auth::errors::AuthError;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::metrics;

/// Client-facing message for every error in production.
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Invalid request body: {0}")]
    Payload(#[from] JsonRejection),
    #[error("Route {0} not found")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(AuthError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Auth(AuthError::Conflict) => StatusCode::CONFLICT,
            AppError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Payload(rejection) => rejection.status(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let report = ErrorReport::from_error(status, &self);
        let mut res = status.into_response();
        res.extensions_mut().insert(report);
        res
    }
}

/// What the error handler needs to know about a failure.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
    /// Rendered error chain, the closest thing to a stack trace we have.
    pub chain: String,
}

impl ErrorReport {
    pub fn from_error(status: StatusCode, err: &(dyn std::error::Error + 'static)) -> Self {
        let kind = error_type_name(status);
        let message = err.to_string();
        let mut chain = format!("{kind}: {message}");
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push_str("\n    caused by: ");
            chain.push_str(&cause.to_string());
            source = cause.source();
        }
        Self { status, kind, message, chain }
    }

    /// Report for an error response produced outside our handlers.
    pub fn from_status(status: StatusCode) -> Self {
        let kind = error_type_name(status);
        let message = status.canonical_reason().unwrap_or("Unknown error").to_string();
        let chain = format!("{kind}: {message}");
        Self { status, kind, message, chain }
    }
}

/// Class name for the `type` field of the envelope.
pub fn error_type_name(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BadRequestError",
        StatusCode::NOT_FOUND => "NotFoundError",
        StatusCode::METHOD_NOT_ALLOWED => "MethodNotAllowedError",
        StatusCode::CONFLICT => "ConflictError",
        StatusCode::PAYLOAD_TOO_LARGE => "PayloadTooLargeError",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UnsupportedMediaTypeError",
        StatusCode::UNPROCESSABLE_ENTITY => "UnprocessableEntityError",
        StatusCode::INTERNAL_SERVER_ERROR => "InternalServerError",
        _ => "HttpError",
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorItem {
    /// Correlation id, also present in the server log.
    #[serde(rename = "ref")]
    pub reference: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub msg: String,
    pub path: String,
    pub location: String,
    /// Error chain; `null` in production.
    pub stack: Option<String>,
}

/// Redaction policy, fixed at startup. When set, every envelope carries
/// [`GENERIC_MESSAGE`] and no stack, whatever the status.
#[derive(Debug, Clone, Copy)]
pub struct ErrorPolicy {
    pub redact_details: bool,
}

impl ErrorPolicy {
    pub fn for_environment(env: Environment) -> Self {
        Self { redact_details: env.is_production() }
    }
}

/// Wraps a router with panic recovery and the global error handler.
pub fn with_error_handling(router: Router, policy: ErrorPolicy) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(policy, global_error_handler))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

pub async fn global_error_handler(State(policy): State<ErrorPolicy>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let method = req.method().clone();

    let mut res = next.run(req).await;
    let status = res.status();
    let report = match res.extensions_mut().remove::<ErrorReport>() {
        Some(report) => report,
        None if status.is_client_error() || status.is_server_error() => ErrorReport::from_status(status),
        None => return res,
    };

    let allow = res.headers().get(header::ALLOW).cloned();
    let mut rendered = render(report, policy, &path, &method);
    if let Some(allow) = allow {
        rendered.headers_mut().insert(header::ALLOW, allow);
    }
    rendered
}

fn render(report: ErrorReport, policy: ErrorPolicy, path: &str, method: &Method) -> Response {
    let reference = Uuid::new_v4();
    let status = report.status;

    error!(error_id = %reference, status = status.as_u16(), %method, path, stack = %report.chain, "{}", report.message);
    metrics::record_http_error(status);

    let (msg, stack) = if policy.redact_details {
        (GENERIC_MESSAGE.to_string(), None)
    } else {
        (report.message, Some(report.chain))
    };

    let body = ErrorEnvelope {
        errors: vec![ErrorItem {
            reference,
            kind: report.kind.to_string(),
            msg,
            path: path.to_string(),
            location: "server".to_string(),
            stack,
        }],
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::auth::validation::{PasswordRule, ValidationError};

    #[test]
    fn auth_errors_map_to_statuses() {
        let validation = AppError::from(AuthError::from(ValidationError::WeakPassword(PasswordRule::TooShort)));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::from(AuthError::Conflict).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::from(AuthError::HashError("x".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::NotFound("/nope".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_message_passes_through_verbatim() {
        let err = AppError::from(AuthError::from(ValidationError::Required("email")));
        assert_eq!(err.to_string(), "email is required");
    }

    #[test]
    fn into_response_attaches_report_without_body() {
        let res = AppError::Internal("boom".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let report = res.extensions().get::<ErrorReport>().expect("report attached");
        assert_eq!(report.kind, "InternalServerError");
        assert_eq!(report.message, "boom");
        assert_eq!(report.chain, "InternalServerError: boom");
    }

    #[test]
    fn report_from_status_uses_canonical_reason() {
        let report = ErrorReport::from_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(report.kind, "MethodNotAllowedError");
        assert_eq!(report.message, "Method Not Allowed");
    }

    #[test]
    fn unknown_statuses_get_generic_type_name() {
        assert_eq!(error_type_name(StatusCode::IM_A_TEAPOT), "HttpError");
    }

    #[test]
    fn policy_follows_environment() {
        assert!(ErrorPolicy::for_environment(Environment::Production).redact_details);
        assert!(!ErrorPolicy::for_environment(Environment::Development).redact_details);
        assert!(!ErrorPolicy::for_environment(Environment::Test).redact_details);
    }
}
