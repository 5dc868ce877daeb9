use models::errors::ModelError;
use thiserror::Error;

use super::validation::ValidationError;

/// Business errors for the registration workflow
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("User with this email already exists.")]
    Conflict,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict => 1002,
            AuthError::HashError(_) => 1101,
            AuthError::Repository(_) => 1200,
        }
    }

    /// True when the caller is at fault and the message is safe to show.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AuthError::Validation(_) | AuthError::Conflict)
    }
}

impl From<ModelError> for AuthError {
    fn from(e: ModelError) -> Self {
        match e {
            // Unique index fired: a concurrent registration won the race.
            ModelError::Duplicate(_) => AuthError::Conflict,
            other => AuthError::Repository(other.to_string()),
        }
    }
}
