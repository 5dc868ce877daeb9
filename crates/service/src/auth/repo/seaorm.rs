use models::user::{self, NewUser};
use sea_orm::DatabaseConnection;

use crate::auth::domain::{AuthUser, NewAccount};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::find_by_email(&self.db, email).await?;
        Ok(res.map(AuthUser::from))
    }

    async fn create_user(&self, account: NewAccount) -> Result<AuthUser, AuthError> {
        let new = NewUser {
            name: &account.name,
            email: &account.email,
            password_hash: &account.password_hash,
            role: account.role,
        };
        // A unique-index violation comes back as AuthError::Conflict.
        let created = user::create(&self.db, new).await?;
        Ok(AuthUser::from(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;

    fn account(email: &str) -> NewAccount {
        NewAccount {
            name: "Jane Roe".into(),
            email: email.into(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".into(),
            role: Role::Customer,
        }
    }

    #[tokio::test]
    async fn create_and_find_round_trip() -> anyhow::Result<()> {
        let repo = SeaOrmAuthRepository { db: models::db::connect_in_memory().await? };

        let created = repo.create_user(account("jane@example.com")).await?;
        let found = repo.find_user_by_email("jane@example.com").await?;
        assert_eq!(found, Some(created));
        Ok(())
    }

    #[tokio::test]
    async fn second_insert_with_same_email_is_a_conflict() -> anyhow::Result<()> {
        let repo = SeaOrmAuthRepository { db: models::db::connect_in_memory().await? };

        repo.create_user(account("jane@example.com")).await?;
        let err = repo.create_user(account("jane@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict), "got {err:?}");
        Ok(())
    }
}
