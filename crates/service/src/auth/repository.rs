use async_trait::async_trait;

use super::domain::{AuthUser, NewAccount};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
///
/// `create_user` must return `AuthError::Conflict` when the email is already
/// taken, even if a preceding `find_user_by_email` saw no match.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, account: NewAccount) -> Result<AuthUser, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockAuthRepository {
        accounts: Mutex<HashMap<String, (AuthUser, NewAccount)>>, // key: email
        fail_writes: bool,
        blind_lookups: bool,
        writes: AtomicUsize,
    }

    impl MockAuthRepository {
        /// Every `create_user` call fails with a repository error.
        pub fn failing_writes() -> Self {
            Self { fail_writes: true, ..Default::default() }
        }

        /// Lookups never find anything, as if a concurrent request had not
        /// committed yet. Uniqueness is still enforced on write.
        pub fn blind_lookups() -> Self {
            Self { blind_lookups: true, ..Default::default() }
        }

        /// Stored account for the email, including the password hash.
        pub fn stored(&self, email: &str) -> Option<NewAccount> {
            let accounts = self.accounts.lock().ok()?;
            accounts.get(email).map(|(_, account)| account.clone())
        }

        pub fn len(&self) -> usize {
            self.accounts.lock().map(|a| a.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Number of `create_user` calls, successful or not.
        pub fn write_attempts(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            if self.blind_lookups {
                return Ok(None);
            }
            let accounts = self.accounts.lock().map_err(|_| AuthError::Repository("mock store poisoned".into()))?;
            Ok(accounts.get(email).map(|(user, _)| user.clone()))
        }

        async fn create_user(&self, account: NewAccount) -> Result<AuthUser, AuthError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(AuthError::Repository("connection refused".into()));
            }
            let mut accounts = self.accounts.lock().map_err(|_| AuthError::Repository("mock store poisoned".into()))?;
            if accounts.contains_key(&account.email) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                name: account.name.clone(),
                email: account.email.clone(),
                role: account.role,
            };
            accounts.insert(account.email.clone(), (user.clone(), account));
            Ok(user)
        }
    }
}
