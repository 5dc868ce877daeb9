use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use service::auth::domain::{AuthUser, RegisterInput};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::metrics;
use crate::state::AppState;

pub const REGISTERED_MESSAGE: &str = "User registered successfully.";

/// Public view of a user. Never carries credentials.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<AuthUser> for UserView {
    fn from(u: AuthUser) -> Self {
        Self { id: u.id, name: u.name, email: u.email }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterOutput {
    pub success: bool,
    pub user: UserView,
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = RegisterOutput),
        (status = 400, description = "Missing field, malformed email or weak password", body = crate::errors::ErrorEnvelope),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorEnvelope),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorEnvelope)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterOutput>), AppError> {
    let result = match payload {
        Ok(Json(input)) => state.auth.register(input).await.map_err(AppError::from),
        Err(rejection) => Err(AppError::from(rejection)),
    };
    metrics::record_registration(&result);

    let user = result?;
    let out = RegisterOutput {
        success: true,
        user: user.into(),
        message: REGISTERED_MESSAGE.to_string(),
    };
    Ok((StatusCode::CREATED, Json(out)))
}
