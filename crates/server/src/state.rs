use std::sync::Arc;

use configs::Environment;
use service::auth::{password::Argon2Hasher, repository::AuthRepository, AuthService};

use crate::errors::ErrorPolicy;

/// Shared, immutable request state. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
    pub errors: ErrorPolicy,
}

impl AppState {
    pub fn new(repo: Arc<dyn AuthRepository>, hasher: Argon2Hasher, environment: Environment) -> Self {
        Self {
            auth: Arc::new(AuthService::new(repo, hasher)),
            errors: ErrorPolicy::for_environment(environment),
        }
    }
}
