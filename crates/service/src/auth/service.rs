use std::sync::Arc;

use models::user::Role;
use tracing::{error, info, instrument, warn};

use super::domain::{AuthUser, NewAccount, RegisterInput};
use super::errors::AuthError;
use super::password::Argon2Hasher;
use super::repository::AuthRepository;
use super::validation::{validate_registration, ValidRegistration};

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    hasher: Argon2Hasher,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, hasher: Argon2Hasher) -> Self { Self { repo, hasher } }

    /// Register a new user with a hashed password.
    ///
    /// Input is validated first (required fields, email shape, password
    /// policy); nothing is written unless every check passes. New users always
    /// get the `customer` role.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, password::Argon2Hasher, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, Argon2Hasher::new(1024, 1, 1).unwrap());
    /// let input = RegisterInput { name: Some("Test".into()), email: Some("user@example.com".into()), password: Some("Secret#123".into()) };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip_all, fields(email = input.email.as_deref().unwrap_or_default()))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        info!(event = "register_attempt", "registration attempt");
        match self.try_register(input).await {
            Ok(user) => {
                info!(event = "user_registered", user_id = %user.id, email = %user.email, "user registered");
                Ok(user)
            }
            Err(e) if e.is_client_error() => {
                warn!(event = "register_rejected", code = e.code(), reason = %e, "registration rejected");
                Err(e)
            }
            Err(e) => {
                error!(event = "register_failed", code = e.code(), error = %e, "registration failed");
                Err(e)
            }
        }
    }

    async fn try_register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let ValidRegistration { name, email, password } = validate_registration(&input)?;

        // Fast path only; the unique index decides under concurrency.
        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::HashError(e.to_string()))??;

        self.repo
            .create_user(NewAccount { name, email, password_hash, role: Role::Customer })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;
    use crate::auth::validation::{PasswordRule, ValidationError};

    fn service(repo: Arc<MockAuthRepository>) -> AuthService<MockAuthRepository> {
        AuthService::new(repo, Argon2Hasher::new(1024, 1, 1).unwrap())
    }

    fn john(password: &str) -> RegisterInput {
        RegisterInput {
            name: Some("John Doe".into()),
            email: Some("johndoe@gmail.com".into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn registers_user_with_hashed_password_and_default_role() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = service(repo.clone());

        let user = svc.register(john("StrongP@ssw0rd")).await.unwrap();
        assert_eq!(user.name, "John Doe");
        assert_eq!(user.email, "johndoe@gmail.com");
        assert_eq!(user.role, Role::Customer);

        let stored = repo.stored("johndoe@gmail.com").expect("stored");
        assert_ne!(stored.password_hash, "StrongP@ssw0rd");
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert!(svc.hasher.verify("StrongP@ssw0rd", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = service(repo.clone());

        svc.register(john("StrongP@ssw0rd")).await.unwrap();
        let err = svc.register(john("StrongP@ssw0rd")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert!(err.to_string().contains("already exists"));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn email_case_does_not_bypass_uniqueness() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = service(repo.clone());

        svc.register(john("StrongP@ssw0rd")).await.unwrap();
        let mut shouting = john("StrongP@ssw0rd");
        shouting.email = Some("JohnDoe@Gmail.COM".into());
        assert!(matches!(svc.register(shouting).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn conflict_from_write_is_reported_when_lookup_misses() {
        let repo = Arc::new(MockAuthRepository::blind_lookups());
        let svc = service(repo.clone());

        svc.register(john("StrongP@ssw0rd")).await.unwrap();
        let err = svc.register(john("StrongP@ssw0rd")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(repo.write_attempts(), 2);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = service(repo.clone());

        let err = svc.register(john("weak")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(ValidationError::WeakPassword(PasswordRule::TooShort))));

        let err = svc.register(RegisterInput::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "name is required");

        assert_eq!(repo.write_attempts(), 0);
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn repository_failure_surfaces_as_repository_error() {
        let repo = Arc::new(MockAuthRepository::failing_writes());
        let svc = service(repo);

        let err = svc.register(john("StrongP@ssw0rd")).await.unwrap_err();
        assert!(matches!(err, AuthError::Repository(_)));
        assert!(!err.is_client_error());
    }
}
