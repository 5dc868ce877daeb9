use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Registration body. Fields beyond these are ignored.
#[derive(ToSchema)]
pub struct RegisterRequest { pub name: String, pub email: String, pub password: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root,
        crate::routes::health,
        crate::routes::auth::register,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            crate::routes::auth::RegisterOutput,
            crate::routes::auth::UserView,
            crate::errors::ErrorEnvelope,
            crate::errors::ErrorItem,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth")
    )
)]
pub struct ApiDoc;
