//! Unique index on `user.email`.
//!
//! The registration flow checks for an existing email before inserting, but
//! two concurrent requests can both pass that check. This index is what
//! actually rejects the second insert.
use sea_orm_migration::prelude::*;

use crate::m20251001_000001_create_user::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_user_email")
                    .table(User::Table)
                    .col(User::Email)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_user_email").table(User::Table).to_owned())
            .await
    }
}
