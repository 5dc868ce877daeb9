//! Migrator for the auth schema. Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20251001_000001_create_user;
mod m20251001_000002_add_user_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_user::Migration),
            // Indexes should always be applied last
            Box::new(m20251001_000002_add_user_indexes::Migration),
        ]
    }
}
